//! Editor session: the coordinator between the editor widget, the language registry and the host.
//!
//! ```text
//! Uninitialized ──begin()──▶ AwaitingHostReady ──on_after_mount()──▶ Bound ◀──▶ Syncing
//!                                  │                                   │
//!                                  └──▶ Failed ◀── writer stopped ─────┤
//!                                                                      └──unbind()──▶ Unbound
//! ```
//!
//! [`EditorSession::start`] runs both steps.
//!
//! The editor is hidden (`text()` returns `None`) until the session is bound. After that, edits
//! update the local text synchronously and are written to the host asynchronously, in order.

use crate::binding::{FieldBinding, SyncStats};
use crate::config::SessionConfig;
use crate::definition::{GHERKIN_LANGUAGE_ID, LanguageDefinition};
use crate::error::{SessionError, WriteFailure};
use crate::host::{FieldStore, HostHandshake};
use crate::registry::{LanguageRegistry, Registration};
use gherkin_editor_highlight::Token;
use gherkin_editor_lang::{CompletionItem, CompletionRange};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Lifecycle state of an [`EditorSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Created, handshake not started.
    Uninitialized,
    /// Handshake started; the initial value has not been read yet.
    AwaitingHostReady,
    /// Bound to the field with no outstanding writes.
    Bound,
    /// Bound with at least one write outstanding.
    Syncing,
    /// Torn down; no further writes are accepted.
    Unbound,
    /// Initialization failed, or the field writer stopped; the session cannot be used.
    Failed,
}

/// One editor widget bound to one host field.
pub struct EditorSession {
    host: Arc<dyn HostHandshake>,
    store: Arc<dyn FieldStore>,
    registry: Arc<LanguageRegistry>,
    config: SessionConfig,
    state: SessionState,
    current_text: String,
    ready: bool,
    binding: Option<FieldBinding>,
    language: Option<LanguageDefinition>,
}

impl EditorSession {
    /// Create a session that registers its language in [`LanguageRegistry::global`].
    pub fn new(
        host: Arc<dyn HostHandshake>,
        store: Arc<dyn FieldStore>,
        config: SessionConfig,
    ) -> Self {
        Self {
            host,
            store,
            registry: LanguageRegistry::global(),
            config,
            state: SessionState::Uninitialized,
            current_text: String::new(),
            ready: false,
            binding: None,
            language: None,
        }
    }

    /// Use `registry` instead of the process-wide registry.
    pub fn with_registry(mut self, registry: Arc<LanguageRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        match (self.state, &self.binding) {
            (SessionState::Bound, Some(binding)) if binding.is_writer_stopped() => {
                SessionState::Failed
            }
            (SessionState::Bound, Some(binding)) if binding.has_pending_writes() => {
                SessionState::Syncing
            }
            (state, _) => state,
        }
    }

    /// Returns `true` once the session is bound and the editor may be shown.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The editor text, or `None` while the editor must stay hidden.
    pub fn text(&self) -> Option<&str> {
        self.ready.then_some(self.current_text.as_str())
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The registry this session registers its language in.
    pub fn registry(&self) -> &Arc<LanguageRegistry> {
        &self.registry
    }

    /// The registered language, once [`EditorSession::on_before_language_init`] ran.
    pub fn language(&self) -> Option<&LanguageDefinition> {
        self.language.as_ref()
    }

    /// The field binding, while bound.
    pub fn binding(&self) -> Option<&FieldBinding> {
        self.binding.as_ref()
    }

    /// Run the host handshake and bind to the field.
    ///
    /// On success the session is [`SessionState::Bound`], the editor text is seeded with the
    /// field's value, and the host has been notified exactly once. Any failure leaves the session
    /// [`SessionState::Failed`] with the editor hidden.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        self.begin().await?;
        self.on_after_mount().await?;
        Ok(())
    }

    /// Initialize the host and register the language, then wait for the editor to mount.
    ///
    /// Leaves the session in [`SessionState::AwaitingHostReady`]. A failed handshake or
    /// registration leaves it [`SessionState::Failed`].
    pub async fn begin(&mut self) -> Result<Registration, SessionError> {
        if self.state != SessionState::Uninitialized {
            return Err(SessionError::InvalidState(self.state()));
        }

        self.state = SessionState::AwaitingHostReady;
        debug!(field = %self.config.field_name, "session starting");

        if let Err(source) = self.host.init().await {
            return Err(self.fail(SessionError::HandshakeFailure(source)));
        }

        match self.on_before_language_init() {
            Ok(registration) => Ok(registration),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Editor widget hook: register the Gherkin language (once per registry).
    pub fn on_before_language_init(&mut self) -> Result<Registration, SessionError> {
        let registration = self
            .registry
            .register_with(GHERKIN_LANGUAGE_ID, LanguageDefinition::gherkin)?;
        self.language = self.registry.definition(GHERKIN_LANGUAGE_ID);
        Ok(registration)
    }

    /// Editor widget hook: read the initial field value, bind, and tell the host we are loaded.
    ///
    /// Only valid after [`EditorSession::begin`]. Returns the text the editor is seeded with. A
    /// failed read or notification leaves the session [`SessionState::Failed`].
    pub async fn on_after_mount(&mut self) -> Result<&str, SessionError> {
        if self.state != SessionState::AwaitingHostReady {
            return Err(SessionError::InvalidState(self.state()));
        }

        if let Err(err) = self.bind_field().await {
            return Err(self.fail(err));
        }

        if let Err(source) = self.host.notify_loaded().await {
            return Err(self.fail(SessionError::HandshakeFailure(source)));
        }

        info!(
            read_field = %self.config.read_field,
            write_field = %self.config.field_name,
            "session bound"
        );
        Ok(&self.current_text)
    }

    async fn bind_field(&mut self) -> Result<(), SessionError> {
        let binding = FieldBinding::bind(self.store.clone(), &self.config).await?;
        self.current_text = binding.pending_value().to_string();
        self.binding = Some(binding);
        self.state = SessionState::Bound;
        self.ready = true;
        Ok(())
    }

    /// Editor widget hook: the user changed the text.
    ///
    /// The local text is updated before this returns; the field write is queued. Returns the
    /// write's sequence number.
    pub fn on_content_change(
        &mut self,
        new_value: impl Into<String>,
    ) -> Result<u64, SessionError> {
        match self.state() {
            SessionState::Bound | SessionState::Syncing => {}
            SessionState::Unbound => return Err(SessionError::Unbound),
            state => return Err(SessionError::InvalidState(state)),
        }
        let Some(binding) = self.binding.as_mut() else {
            return Err(SessionError::InvalidState(self.state));
        };

        let new_value = new_value.into();
        self.current_text.clone_from(&new_value);
        binding.push(new_value)
    }

    /// Wait for every queued write.
    ///
    /// Fails if the newest write was rejected or the field writer stopped.
    pub async fn flush(&self) -> Result<(), SessionError> {
        match &self.binding {
            Some(binding) => binding.flush().await,
            None => Ok(()),
        }
    }

    /// Write counters, while bound.
    pub fn sync_stats(&self) -> Option<SyncStats> {
        self.binding.as_ref().map(FieldBinding::stats)
    }

    /// The most recent rejected write, if any.
    pub fn last_write_failure(&self) -> Option<WriteFailure> {
        self.binding.as_ref().and_then(FieldBinding::last_write_failure)
    }

    /// Begin teardown: stop accepting edits. A write already in flight still completes.
    pub fn unbind(&mut self) {
        if let Some(binding) = self.binding.as_mut() {
            binding.close();
        }
        if self.state != SessionState::Unbound {
            info!(field = %self.config.field_name, "session unbound");
        }
        self.state = SessionState::Unbound;
    }

    /// Unbind and wait for outstanding writes to finish.
    pub async fn shutdown(&mut self) {
        self.unbind();
        if let Some(binding) = self.binding.as_mut() {
            binding.shutdown().await;
        }
    }

    /// Tokens of every line of the current text, once ready.
    pub fn tokens(&self) -> Option<Vec<Vec<Token>>> {
        let text = self.text()?;
        let language = self.language.as_ref()?;
        Some(language.tokenizer().tokenize_text(text))
    }

    /// Completion items for the word range at the cursor.
    pub fn completions(&self, range: CompletionRange) -> Vec<CompletionItem> {
        self.language
            .as_ref()
            .map(|language| language.provide_completions(range))
            .unwrap_or_default()
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        error!(field = %self.config.field_name, error = %err, "session initialization failed");
        if let Some(binding) = self.binding.as_mut() {
            binding.close();
        }
        self.binding = None;
        self.ready = false;
        self.state = SessionState::Failed;
        err
    }
}
