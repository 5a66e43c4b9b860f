//! CLI module for statusctl
//!
//! Owners are addressed as `TYPE:ID`, where `TYPE` is the tag stored in
//! the `model_type` column. Every command prints JSON, one object per line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use model_status::{MorphMap, OwnerRef, StatusStore};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

use crate::settings::Settings;

/// Inspect and edit entity statuses
#[derive(Parser, Debug)]
#[command(name = "statusctl")]
#[command(about = "Inspect and edit entity statuses")]
#[command(version)]
pub struct Cli {
    /// SQLite database (overrides configuration)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set a status (overwrites the current value for NAME)
    Set {
        /// Owner as TYPE:ID
        owner: OwnerRef,
        /// Status name
        name: String,
        /// Optional value
        value: Option<String>,
    },
    /// Show the current status for NAME
    Get {
        /// Owner as TYPE:ID
        owner: OwnerRef,
        /// Status name
        name: String,
    },
    /// List all statuses of an owner, newest first
    List {
        /// Owner as TYPE:ID
        owner: OwnerRef,
    },
    /// Show the newest status, optionally among NAMES
    Latest {
        /// Owner as TYPE:ID
        owner: OwnerRef,
        /// Restrict to these names
        names: Vec<String>,
    },
    /// Delete statuses by name
    Delete {
        /// Owner as TYPE:ID
        owner: OwnerRef,
        /// Names to delete
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// List owner ids whose current NAME status is one of VALUES
    Current {
        /// Owner type tag
        owner_type: String,
        /// Status name
        name: String,
        /// Accepted values
        #[arg(required = true)]
        values: Vec<String>,
    },
}

#[derive(Serialize)]
struct Deleted<'a> {
    owner: &'a OwnerRef,
    deleted: u64,
}

#[derive(Serialize)]
struct CurrentOwners<'a> {
    owner_type: &'a str,
    name: &'a str,
    owner_ids: Vec<i64>,
}

/// Run the CLI command
pub async fn run(cli: Cli, settings: Settings) -> Result<()> {
    let db_path = cli.db.unwrap_or(settings.database.path);
    let store = StatusStore::from_path(&db_path, settings.status, MorphMap::new())
        .await
        .with_context(|| format!("Failed to open status store at {}", db_path.display()))?;
    debug!(db = %db_path.display(), "status store opened");

    match cli.command {
        Commands::Set { owner, name, value } => {
            let mut statuses = store.statuses_for(owner);
            statuses
                .set_status(&name, value.as_deref())
                .await
                .with_context(|| format!("Failed to set status `{name}`"))?;
            print_json(&statuses.status(&name).await?)
        }
        Commands::Get { owner, name } => {
            print_json(&store.statuses_for(owner).status(&name).await?)
        }
        Commands::List { owner } => {
            for status in store.statuses_for(owner).statuses().await? {
                print_json(&status)?;
            }
            Ok(())
        }
        Commands::Latest { owner, names } => {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            print_json(&store.statuses_for(owner).latest_status(&names).await?)
        }
        Commands::Delete { owner, names } => {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let deleted = store
                .statuses_for(owner.clone())
                .delete_status(&names)
                .await?;
            print_json(&Deleted {
                owner: &owner,
                deleted,
            })
        }
        Commands::Current {
            owner_type,
            name,
            values,
        } => {
            let values: Vec<&str> = values.iter().map(String::as_str).collect();
            let owner_ids = store
                .current_status_by_type(&owner_type, &name, &values)
                .await?;
            print_json(&CurrentOwners {
                owner_type: &owner_type,
                name: &name,
                owner_ids,
            })
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        let cli = Cli::try_parse_from(["statusctl", "set", "post:1", "stage", "draft"]).unwrap();
        assert!(cli.db.is_none());
        match cli.command {
            Commands::Set { owner, name, value } => {
                assert_eq!(owner, OwnerRef::new("post", 1));
                assert_eq!(name, "stage");
                assert_eq!(value.as_deref(), Some("draft"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_set_without_value() {
        let cli = Cli::try_parse_from(["statusctl", "set", "post:1", "pinned"]).unwrap();
        assert!(matches!(cli.command, Commands::Set { value: None, .. }));
    }

    #[test]
    fn test_parse_global_db_flag() {
        let cli =
            Cli::try_parse_from(["statusctl", "list", "post:3", "--db", "/tmp/s.db"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/s.db")));
    }

    #[test]
    fn test_parse_rejects_bad_owner() {
        assert!(Cli::try_parse_from(["statusctl", "get", "post", "stage"]).is_err());
    }

    #[test]
    fn test_delete_requires_names() {
        assert!(Cli::try_parse_from(["statusctl", "delete", "post:1"]).is_err());
        let cli = Cli::try_parse_from(["statusctl", "delete", "post:1", "a", "b"]).unwrap();
        match cli.command {
            Commands::Delete { names, .. } => assert_eq!(names, vec!["a", "b"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_run_against_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("statuses.db");
        let settings = Settings {
            database: crate::settings::DatabaseSettings {
                path: dir.path().join("unused.db"),
            },
            status: model_status::StatusConfig::new("statuses"),
        };
        let db_arg = db.to_str().unwrap();

        for args in [
            vec!["statusctl", "--db", db_arg, "set", "post:1", "stage", "draft"],
            vec!["statusctl", "--db", db_arg, "current", "post", "stage", "draft"],
            vec!["statusctl", "--db", db_arg, "delete", "post:1", "stage"],
        ] {
            let cli = Cli::try_parse_from(args).unwrap();
            tokio_test::block_on(run(cli, settings.clone())).unwrap();
        }

        assert!(db.exists());
        assert!(!dir.path().join("unused.db").exists());
    }

    #[test]
    fn test_parse_current() {
        let cli =
            Cli::try_parse_from(["statusctl", "current", "post", "stage", "draft", "review"])
                .unwrap();
        match cli.command {
            Commands::Current {
                owner_type,
                name,
                values,
            } => {
                assert_eq!(owner_type, "post");
                assert_eq!(name, "stage");
                assert_eq!(values, vec!["draft", "review"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
