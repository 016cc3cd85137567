#![allow(dead_code)]

use async_trait::async_trait;
use gherkin_editor::{FieldStore, HostError, HostHandshake, MemoryHost};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A field store that wraps [`MemoryHost`] with scripted per-write latency and failures.
///
/// Writes land in the inner host when they *complete*, so `inner.writes()` is completion order.
#[derive(Default)]
pub struct ScriptedStore {
    pub inner: MemoryHost,
    write_delays: Mutex<VecDeque<Duration>>,
    write_failures: Mutex<VecDeque<bool>>,
    fail_reads: AtomicBool,
    fail_init: AtomicBool,
    fail_notify: AtomicBool,
    panic_writes: AtomicBool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedStore {
    pub fn new(inner: MemoryHost) -> Arc<Self> {
        Arc::new(Self {
            inner,
            ..Self::default()
        })
    }

    /// Delay the next writes, in order (missing entries mean no delay).
    pub fn delay_writes(&self, delays: impl IntoIterator<Item = Duration>) {
        self.write_delays.lock().unwrap().extend(delays);
    }

    /// Fail (true) or accept (false) the next writes, in order.
    pub fn fail_writes(&self, outcomes: impl IntoIterator<Item = bool>) {
        self.write_failures.lock().unwrap().extend(outcomes);
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_init(&self) {
        self.fail_init.store(true, Ordering::SeqCst);
    }

    pub fn fail_notify(&self) {
        self.fail_notify.store(true, Ordering::SeqCst);
    }

    /// Make every write panic, killing the task that issued it.
    pub fn panic_writes(&self) {
        self.panic_writes.store(true, Ordering::SeqCst);
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn written_values(&self, field: &str) -> Vec<String> {
        self.inner
            .writes()
            .into_iter()
            .filter(|(f, _)| f == field)
            .map(|(_, v)| v)
            .collect()
    }
}

#[async_trait]
impl HostHandshake for ScriptedStore {
    async fn init(&self) -> Result<(), HostError> {
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(HostError::new("sdk init rejected"));
        }
        self.inner.init().await
    }

    async fn notify_loaded(&self) -> Result<(), HostError> {
        if self.fail_notify.load(Ordering::SeqCst) {
            return Err(HostError::new("notify rejected"));
        }
        self.inner.notify_loaded().await
    }
}

#[async_trait]
impl FieldStore for ScriptedStore {
    async fn get_field_value(&self, field: &str) -> Result<Option<String>, HostError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(HostError::new("field service unavailable"));
        }
        self.inner.get_field_value(field).await
    }

    async fn set_field_value(&self, field: &str, value: &str) -> Result<(), HostError> {
        if self.panic_writes.load(Ordering::SeqCst) {
            panic!("field store crashed while writing '{field}'");
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.write_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let fail = self.write_failures.lock().unwrap().pop_front().unwrap_or(false);

        let result = if fail {
            Err(HostError::new("write rejected"))
        } else {
            self.inner.set_field_value(field, value).await
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
