use crate::session::SessionState;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
/// An error reported by a host service (handshake or field store).
pub struct HostError {
    message: String,
}

impl HostError {
    /// Create a host error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The host's message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error)]
/// Errors produced while building a language definition.
pub enum LanguageError {
    #[error("invalid rule pattern: {0}")]
    /// A tokenizer or indentation regex failed to compile.
    Pattern(#[from] regex::Error),

    #[error("definition '{built}' does not match requested language '{requested}'")]
    /// A definition was built for a different language id than the one requested.
    IdMismatch {
        /// The id registration was requested for.
        requested: String,
        /// The id of the built definition.
        built: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("write #{seq} to field '{field}' failed: {source}")]
/// A single field write that the host rejected.
///
/// Write failures are recoverable: the edit stays in the editor and the next successful write
/// supersedes the failed one.
pub struct WriteFailure {
    /// Sequence number of the failed write.
    pub seq: u64,
    /// Field the write targeted.
    pub field: String,
    /// The host's error.
    #[source]
    pub source: HostError,
}

#[derive(Debug, Error)]
/// Errors produced by an [`EditorSession`](crate::EditorSession).
pub enum SessionError {
    #[error("host handshake failed: {0}")]
    /// The host lifecycle handshake failed; the session cannot be established.
    HandshakeFailure(#[source] HostError),

    #[error("initial read of field '{field}' failed: {source}")]
    /// The initial field read failed; the session has no valid seed value.
    InitialReadFailure {
        /// The field that was read.
        field: String,
        /// The host's error.
        #[source]
        source: HostError,
    },

    #[error(transparent)]
    /// The most recent field write failed.
    WriteFailure(#[from] WriteFailure),

    #[error("session configuration parse error: {0}")]
    /// The host configuration was not valid JSON for [`SessionConfig`](crate::SessionConfig).
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid session configuration: {0}")]
    /// The host configuration parsed but is unusable.
    InvalidConfig(&'static str),

    #[error(transparent)]
    /// The language definition could not be built.
    Language(#[from] LanguageError),

    #[error("operation not allowed in session state {0:?}")]
    /// The operation does not apply to the session's current state.
    InvalidState(SessionState),

    #[error("writer for field '{field}' stopped before all writes completed")]
    /// The field writer task ended while writes were still outstanding.
    WriterStopped {
        /// The field the writer was bound to.
        field: String,
    },

    #[error("session is unbound; no further writes are accepted")]
    /// The session was torn down.
    Unbound,
}
