//! Session configuration supplied by the host.
//!
//! Hosts pass their widget inputs as JSON, e.g. `{"FieldName": "Steps"}`. The configuration is
//! resolved once when the session is created.

use crate::error::SessionError;
use serde::{Deserialize, Serialize};

/// Field read at session start. This is a fixed, well-known key and is distinct from the
/// configurable field that edits are written to.
pub const DEFAULT_READ_FIELD: &str = "GherkinField";

fn default_read_field() -> String {
    DEFAULT_READ_FIELD.to_string()
}

/// Which external fields a session binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Field that edits are written to.
    #[serde(rename = "FieldName", alias = "GherkinFieldName")]
    pub field_name: String,
    /// Field the initial value is read from.
    #[serde(rename = "ReadFieldName", default = "default_read_field")]
    pub read_field: String,
}

impl SessionConfig {
    /// Write to `field_name`, read from [`DEFAULT_READ_FIELD`].
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            read_field: default_read_field(),
        }
    }

    /// Override the field the initial value is read from.
    pub fn with_read_field(mut self, read_field: impl Into<String>) -> Self {
        self.read_field = read_field.into();
        self
    }

    /// Parse the host's JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Build from an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SessionError> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SessionError> {
        if self.field_name.trim().is_empty() {
            return Err(SessionError::InvalidConfig("FieldName must not be empty"));
        }
        if self.read_field.trim().is_empty() {
            return Err(SessionError::InvalidConfig("ReadFieldName must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_field_name() {
        let config = SessionConfig::from_json(r#"{"FieldName": "Steps"}"#).unwrap();
        assert_eq!(config.field_name, "Steps");
        assert_eq!(config.read_field, DEFAULT_READ_FIELD);
    }

    #[test]
    fn test_parse_legacy_input_name_and_read_override() {
        let config = SessionConfig::from_value(json!({
            "GherkinFieldName": "Custom.Steps",
            "ReadFieldName": "Custom.Seed"
        }))
        .unwrap();
        assert_eq!(config, SessionConfig::new("Custom.Steps").with_read_field("Custom.Seed"));
    }

    #[test]
    fn test_rejects_missing_or_empty_field() {
        assert!(matches!(
            SessionConfig::from_json("{}"),
            Err(SessionError::ConfigParse(_))
        ));
        assert!(matches!(
            SessionConfig::from_json(r#"{"FieldName": "  "}"#),
            Err(SessionError::InvalidConfig(_))
        ));
    }
}
