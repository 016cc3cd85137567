//! Host-side collaborators.
//!
//! The editor session never talks to a concrete host. It drives two small async traits:
//! [`HostHandshake`] (lifecycle signalling) and [`FieldStore`] (get/set of a named field value).
//! [`MemoryHost`] implements both in memory and records every write.

use crate::error::HostError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Host lifecycle handshake.
#[async_trait]
pub trait HostHandshake: Send + Sync {
    /// Signal that the widget started loading.
    async fn init(&self) -> Result<(), HostError>;

    /// Signal that the widget finished loading. Called exactly once per session.
    async fn notify_loaded(&self) -> Result<(), HostError>;
}

/// Host field storage.
#[async_trait]
pub trait FieldStore: Send + Sync {
    /// Read a field. `None` means the field exists but holds no value.
    async fn get_field_value(&self, field: &str) -> Result<Option<String>, HostError>;

    /// Replace a field's value.
    async fn set_field_value(&self, field: &str, value: &str) -> Result<(), HostError>;
}

/// In-memory host: a field map plus handshake counters.
#[derive(Debug, Default)]
pub struct MemoryHost {
    fields: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
    init_calls: AtomicUsize,
    loaded_calls: AtomicUsize,
}

impl MemoryHost {
    /// Create a host with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a field value.
    pub fn with_field(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(field.into(), value.into());
        self
    }

    /// Current value of a field.
    pub fn field(&self, field: &str) -> Option<String> {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(field)
            .cloned()
    }

    /// Every `(field, value)` write, in the order it was applied.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `init` calls.
    pub fn init_count(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    /// Number of `notify_loaded` calls.
    pub fn loaded_count(&self) -> usize {
        self.loaded_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostHandshake for MemoryHost {
    async fn init(&self) -> Result<(), HostError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn notify_loaded(&self) -> Result<(), HostError> {
        self.loaded_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl FieldStore for MemoryHost {
    async fn get_field_value(&self, field: &str) -> Result<Option<String>, HostError> {
        Ok(self.field(field))
    }

    async fn set_field_value(&self, field: &str, value: &str) -> Result<(), HostError> {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(field.to_string(), value.to_string());
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((field.to_string(), value.to_string()));
        Ok(())
    }
}
