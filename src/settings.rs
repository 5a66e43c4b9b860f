//! statusctl configuration loading.

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use model_status::StatusConfig;
use serde::Deserialize;
use std::path::PathBuf;

/// Embedded default configuration (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Top-level settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Database location
    pub database: DatabaseSettings,
    /// Status store configuration
    pub status: StatusConfig,
}

/// Database settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file path
    pub path: PathBuf,
}

/// Load configuration from files and environment
pub fn load_settings() -> Result<Settings> {
    let config = Config::builder()
        // 1. Embedded defaults
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name("config/local").required(false))
        // 3. Environment variables (highest priority), e.g. MODEL_STATUS_DATABASE__PATH
        .add_source(
            Environment::with_prefix("MODEL_STATUS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.database.path, PathBuf::from("data/statuses.db"));
        assert_eq!(settings.status, StatusConfig::new("statuses"));
    }

    #[test]
    fn test_missing_table_is_an_error() {
        let result: std::result::Result<Settings, _> = Config::builder()
            .add_source(File::from_str(
                "[database]\npath = \"x.db\"\n[status]\nowner_key_column = \"post_id\"\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize();
        assert!(result.is_err());
    }
}
