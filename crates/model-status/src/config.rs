//! Store configuration.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Default owner key column.
pub const DEFAULT_OWNER_KEY_COLUMN: &str = "model_id";

/// Configuration for a [`StatusStore`](crate::StatusStore).
///
/// `status_table` has no default and must be provided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Table holding the status rows
    pub status_table: String,
    /// Column holding the owner's primary key
    #[serde(default = "default_owner_key_column")]
    pub owner_key_column: String,
    /// Buffered `StatusUpdated` events per subscriber
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_owner_key_column() -> String {
    DEFAULT_OWNER_KEY_COLUMN.to_string()
}

fn default_event_capacity() -> usize {
    256
}

impl StatusConfig {
    /// Config for `status_table` with default key column and capacity.
    pub fn new(status_table: impl Into<String>) -> Self {
        Self {
            status_table: status_table.into(),
            owner_key_column: default_owner_key_column(),
            event_capacity: default_event_capacity(),
        }
    }

    /// Override the owner key column.
    #[must_use]
    pub fn with_owner_key_column(mut self, column: impl Into<String>) -> Self {
        self.owner_key_column = column.into();
        self
    }

    /// Override the event channel capacity.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Check that table and column are plain SQL identifiers.
    ///
    /// Both are interpolated into statements, so anything else is refused.
    pub fn validate(&self) -> Result<()> {
        check_identifier("status_table", &self.status_table)?;
        check_identifier("owner_key_column", &self.owner_key_column)?;
        if self.event_capacity == 0 {
            return Err(Error::Configuration(
                "event_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_identifier(field: &str, value: &str) -> Result<()> {
    if IDENTIFIER.is_match(value) {
        Ok(())
    } else {
        Err(Error::Configuration(format!(
            "{field} `{value}` is not a valid SQL identifier"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StatusConfig::new("statuses");
        assert_eq!(config.owner_key_column, "model_id");
        assert_eq!(config.event_capacity, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_requires_table() {
        let missing: std::result::Result<StatusConfig, _> =
            serde_json::from_str(r#"{"owner_key_column": "post_id"}"#);
        assert!(missing.is_err());

        let config: StatusConfig = serde_json::from_str(r#"{"status_table": "statuses"}"#).unwrap();
        assert_eq!(config, StatusConfig::new("statuses"));
    }

    #[test]
    fn test_rejects_bad_identifiers() {
        let config = StatusConfig::new("statuses; DROP TABLE x");
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let config = StatusConfig::new("statuses").with_owner_key_column("1col");
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let config = StatusConfig::new("statuses").with_event_capacity(0);
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }
}
