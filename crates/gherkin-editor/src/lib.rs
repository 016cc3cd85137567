#![warn(missing_docs)]
//! `gherkin-editor` - Gherkin language support and host field synchronization for embedded
//! editor widgets.
//!
//! # Overview
//!
//! The crate ties together three pieces:
//!
//! - a [`LanguageDefinition`] (tokenizer, theme, comments/indentation, completions) that is
//!   registered once per process through a [`LanguageRegistry`]
//! - a [`FieldBinding`] that reads an external host field once and writes edits back to it
//!   strictly in edit order
//! - an [`EditorSession`] that coordinates the two with the host handshake
//!
//! Hosts plug in through the [`HostHandshake`] and [`FieldStore`] traits.
//!
//! # Quick Start
//!
//! ```rust
//! use gherkin_editor::{EditorSession, LanguageRegistry, MemoryHost, SessionConfig};
//! use std::sync::Arc;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let host = Arc::new(MemoryHost::new().with_field("GherkinField", "Feature: login"));
//! let config = SessionConfig::from_json(r#"{"FieldName": "Steps"}"#).unwrap();
//!
//! let mut session = EditorSession::new(host.clone(), host.clone(), config)
//!     .with_registry(Arc::new(LanguageRegistry::new()));
//! session.start().await.unwrap();
//! assert_eq!(session.text(), Some("Feature: login"));
//!
//! session.on_content_change("Feature: login\n  Scenario: ok").unwrap();
//! session.flush().await.unwrap();
//! assert_eq!(host.field("Steps").as_deref(), Some("Feature: login\n  Scenario: ok"));
//! # });
//! ```
//!
//! # Module Description
//!
//! - [`definition`] - language definition composition
//! - [`registry`] - process-scoped, idempotent language registration
//! - [`binding`] - ordered field writes
//! - [`session`] - session state machine
//! - [`host`] - host collaborator traits and an in-memory host
//! - [`config`] - host configuration

pub mod binding;
pub mod config;
pub mod definition;
mod error;
pub mod host;
pub mod registry;
pub mod session;

pub use binding::{FieldBinding, SyncStats};
pub use config::{DEFAULT_READ_FIELD, SessionConfig};
pub use definition::{
    GHERKIN_LANGUAGE_ID, GHERKIN_THEME_ID, LanguageConfiguration, LanguageDefinition,
};
pub use error::{HostError, LanguageError, SessionError, WriteFailure};
pub use host::{FieldStore, HostHandshake, MemoryHost};
pub use registry::{LanguageRegistry, Registration, RegistrationStep};
pub use session::{EditorSession, SessionState};

pub use gherkin_editor_highlight as highlight;
pub use gherkin_editor_lang as lang;
