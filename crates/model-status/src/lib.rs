//! Model Status — named statuses attached to any persisted entity
//!
//! Any type implementing [`HasStatuses`] can record statuses such as
//! `stage = draft` or `publication = published`, read its current status
//! per name, and be filtered by current status.
//!
//! # Architecture
//!
//! ```text
//! entity ──► StatusStore::statuses_of ──► OwnerStatuses
//!                  │                           │
//!              MorphMap                  set / force / delete
//!          (type → owner tag)                  │
//!                                      statuses table (SQLite)
//!                                              │
//!                                     StatusEventBus ──► subscribers
//! ```
//!
//! One row is kept per `(owner, name)`: writing a name again overwrites
//! its value, no history is retained.
//!
//! ```no_run
//! use model_status::{HasStatuses, MorphMap, StatusConfig, StatusStore};
//!
//! struct Post { id: i64 }
//!
//! impl HasStatuses for Post {
//!     fn status_key(&self) -> i64 { self.id }
//! }
//!
//! # async fn demo() -> model_status::Result<()> {
//! let store = StatusStore::in_memory(
//!     StatusConfig::new("statuses"),
//!     MorphMap::new().with::<Post>("post"),
//! )
//! .await?;
//!
//! let post = Post { id: 1 };
//! store.statuses_of(&post).set_status("stage", Some("draft")).await?;
//! let drafts = store.current_status::<Post>("stage", &["draft"]).await?;
//! assert_eq!(drafts, vec![1]);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod events;
pub mod morph;
pub mod owner;
pub mod store;
pub mod types;

pub use config::StatusConfig;
pub use error::{Error, Result};
pub use events::{StatusEventBus, StatusUpdated};
pub use morph::MorphMap;
pub use owner::OwnerStatuses;
pub use store::StatusStore;
pub use types::{HasStatuses, OwnerRef, Status};
