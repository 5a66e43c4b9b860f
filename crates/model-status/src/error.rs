//! Error types for status storage.

/// Errors that can occur in status operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The owner's validation predicate (or the empty-name check) refused a status
    #[error("invalid status: `{name}`")]
    InvalidStatus {
        /// Rejected status name
        name: String,
    },

    /// Bad status setting. Reserved for owners that want to signal misuse
    /// of their own status vocabulary; the store never raises it.
    #[error("bad status setting")]
    InvalidSetting,

    /// Store configuration error (bad identifiers, missing table, unreadable sources)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// SQLite database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Error {
    /// Build an [`Error::InvalidStatus`] for the given name.
    pub fn invalid_status(name: impl Into<String>) -> Self {
        Self::InvalidStatus { name: name.into() }
    }
}

/// Convenience Result type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_status_carries_name() {
        let err = Error::invalid_status("stage");
        match &err {
            Error::InvalidStatus { name } => assert_eq!(name, "stage"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.to_string(), "invalid status: `stage`");
    }

    #[test]
    fn test_invalid_setting_message() {
        assert_eq!(Error::InvalidSetting.to_string(), "bad status setting");
    }
}
