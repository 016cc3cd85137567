//! Binding between the editor text and one external host field.
//!
//! Every edit becomes a [`WriteRequest`] carrying a monotonically increasing sequence number.
//! Requests go through a single-consumer queue drained by one writer task, so at most one write
//! is in flight and writes reach the host in edit order. When several requests are queued behind
//! an in-flight write, only the newest is sent: the older values are already stale.

use crate::config::SessionConfig;
use crate::error::{SessionError, WriteFailure};
use crate::host::FieldStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Counters describing a binding's write traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStats {
    /// Writes issued by edits.
    pub issued: u64,
    /// Writes the host accepted.
    pub applied: u64,
    /// Writes the host rejected.
    pub failed: u64,
    /// Writes skipped because a newer value was queued behind them.
    pub superseded: u64,
}

#[derive(Debug)]
struct WriteRequest {
    seq: u64,
    value: String,
}

#[derive(Debug, Default)]
struct SyncShared {
    issued: AtomicU64,
    applied: AtomicU64,
    failed: AtomicU64,
    superseded: AtomicU64,
    last_failure: Mutex<Option<WriteFailure>>,
}

impl SyncShared {
    fn stats(&self) -> SyncStats {
        SyncStats {
            issued: self.issued.load(Ordering::SeqCst),
            applied: self.applied.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            superseded: self.superseded.load(Ordering::SeqCst),
        }
    }

    fn last_failure(&self) -> Option<WriteFailure> {
        self.last_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// An editor session's link to its external field.
pub struct FieldBinding {
    read_field: String,
    write_field: String,
    pending_value: String,
    next_seq: u64,
    tx: Option<mpsc::UnboundedSender<WriteRequest>>,
    completed: watch::Receiver<u64>,
    shared: Arc<SyncShared>,
    writer: Option<JoinHandle<()>>,
}

impl FieldBinding {
    /// Read the initial field value and start the writer task.
    ///
    /// Must be called from within a tokio runtime. A failed read is fatal: no binding is created
    /// and no default value is assumed. A field with no value seeds an empty document.
    pub async fn bind(
        store: Arc<dyn FieldStore>,
        config: &SessionConfig,
    ) -> Result<Self, SessionError> {
        let initial = store
            .get_field_value(&config.read_field)
            .await
            .map_err(|source| SessionError::InitialReadFailure {
                field: config.read_field.clone(),
                source,
            })?
            .unwrap_or_default();

        let (tx, rx) = mpsc::unbounded_channel();
        let (completed_tx, completed) = watch::channel(0);
        let shared = Arc::new(SyncShared::default());

        let writer = tokio::spawn(run_writer(
            store,
            config.field_name.clone(),
            rx,
            completed_tx,
            shared.clone(),
        ));

        debug!(
            read_field = %config.read_field,
            write_field = %config.field_name,
            len = initial.len(),
            "field bound"
        );

        Ok(Self {
            read_field: config.read_field.clone(),
            write_field: config.field_name.clone(),
            pending_value: initial,
            next_seq: 0,
            tx: Some(tx),
            completed,
            shared,
            writer: Some(writer),
        })
    }

    /// Field the initial value was read from.
    pub fn read_field(&self) -> &str {
        &self.read_field
    }

    /// Field edits are written to.
    pub fn write_field(&self) -> &str {
        &self.write_field
    }

    /// Latest value handed to the binding (initial value or last edit).
    pub fn pending_value(&self) -> &str {
        &self.pending_value
    }

    /// Queue a write of `value`. Returns the write's sequence number.
    pub fn push(&mut self, value: String) -> Result<u64, SessionError> {
        let Some(tx) = &self.tx else {
            return Err(SessionError::Unbound);
        };

        let seq = self.next_seq + 1;
        tx.send(WriteRequest {
            seq,
            value: value.clone(),
        })
        .map_err(|_| SessionError::WriterStopped {
            field: self.write_field.clone(),
        })?;

        self.next_seq = seq;
        self.pending_value = value;
        self.shared.issued.store(seq, Ordering::SeqCst);
        Ok(seq)
    }

    /// Returns `true` while issued writes have not been processed yet.
    pub fn has_pending_writes(&self) -> bool {
        *self.completed.borrow() < self.next_seq
    }

    /// Returns `true` if the writer task ended before it should have.
    ///
    /// That is either while the binding still accepts writes, or with writes left unprocessed.
    pub fn is_writer_stopped(&self) -> bool {
        let open_without_writer = self
            .tx
            .as_ref()
            .is_some_and(mpsc::UnboundedSender::is_closed);
        let stranded = self.has_pending_writes() && self.completed.has_changed().is_err();
        open_without_writer || stranded
    }

    /// Write counters.
    pub fn stats(&self) -> SyncStats {
        self.shared.stats()
    }

    /// The most recent rejected write, if any.
    pub fn last_write_failure(&self) -> Option<WriteFailure> {
        self.shared.last_failure()
    }

    /// Wait until every issued write has been processed.
    ///
    /// Fails if the newest write was rejected, i.e. the field has not converged to the latest
    /// edit, or if the writer task stopped before processing it.
    pub async fn flush(&self) -> Result<(), SessionError> {
        let target = self.next_seq;
        let mut completed = self.completed.clone();
        if completed.wait_for(|done| *done >= target).await.is_err() {
            error!(
                field = %self.write_field,
                seq = target,
                "writer stopped before all writes completed"
            );
            return Err(SessionError::WriterStopped {
                field: self.write_field.clone(),
            });
        }

        match self.shared.last_failure() {
            Some(failure) if failure.seq == target => Err(failure.into()),
            _ => Ok(()),
        }
    }

    /// Returns `true` once the binding stopped accepting writes.
    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }

    /// Stop accepting writes. Writes already accepted still complete.
    pub fn close(&mut self) {
        if self.tx.take().is_some() {
            debug!(field = %self.write_field, "binding closed");
        }
    }

    /// Close the binding and wait for the writer task to drain.
    pub async fn shutdown(&mut self) {
        self.close();
        if let Some(writer) = self.writer.take()
            && let Err(err) = writer.await
        {
            error!(field = %self.write_field, error = %err, "field writer task failed");
        }
    }
}

async fn run_writer(
    store: Arc<dyn FieldStore>,
    field: String,
    mut rx: mpsc::UnboundedReceiver<WriteRequest>,
    completed: watch::Sender<u64>,
    shared: Arc<SyncShared>,
) {
    let mut last_seq = 0;

    while let Some(mut request) = rx.recv().await {
        while let Ok(newer) = rx.try_recv() {
            debug!(seq = request.seq, superseded_by = newer.seq, "write coalesced");
            shared.superseded.fetch_add(1, Ordering::SeqCst);
            request = newer;
        }

        // Sequence numbers only grow on this queue; never let an older value land last.
        if request.seq <= last_seq {
            shared.superseded.fetch_add(1, Ordering::SeqCst);
            continue;
        }
        last_seq = request.seq;

        match store.set_field_value(&field, &request.value).await {
            Ok(()) => {
                shared.applied.fetch_add(1, Ordering::SeqCst);
                debug!(field = %field, seq = request.seq, "field write applied");
            }
            Err(source) => {
                shared.failed.fetch_add(1, Ordering::SeqCst);
                warn!(field = %field, seq = request.seq, error = %source, "field write failed");
                *shared
                    .last_failure
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = Some(WriteFailure {
                    seq: request.seq,
                    field: field.clone(),
                    source,
                });
            }
        }

        completed.send_replace(request.seq);
    }

    debug!(field = %field, "field writer drained");
}
