//! StatusStore — SQLite persistence for status rows.

use crate::config::StatusConfig;
use crate::error::{Error, Result};
use crate::events::{StatusEventBus, StatusUpdated};
use crate::morph::MorphMap;
use crate::owner::OwnerStatuses;
use crate::types::{HasStatuses, OwnerRef};

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

mod migrations;
mod queries;


/// SQLite-backed status store.
///
/// Cheap to clone: the pool, config and morph map are shared.
#[derive(Clone)]
pub struct StatusStore {
    pub(crate) pool: SqlitePool,
    pub(crate) config: Arc<StatusConfig>,
    morph: Arc<MorphMap>,
    events: StatusEventBus,
}

impl StatusStore {
    /// Open (or create) a status store at the given path.
    pub async fn from_path(
        db_path: &std::path::Path,
        config: StatusConfig,
        morph: MorphMap,
    ) -> Result<Self> {
        config.validate()?;
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Configuration(format!("mkdir: {e}")))?;
        }
        let url = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        // Enable WAL for read/write concurrency
        sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;

        let store = Self::with_pool(pool, config, morph).await?;
        info!("Status store initialized at {}", db_path.display());
        Ok(store)
    }

    /// In-memory store (for tests).
    pub async fn in_memory(config: StatusConfig, morph: MorphMap) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self::with_pool(pool, config, morph).await?;
        debug!("In-memory status store initialized");
        Ok(store)
    }

    /// Build a store on an existing pool, creating the table if needed.
    pub async fn with_pool(pool: SqlitePool, config: StatusConfig, morph: MorphMap) -> Result<Self> {
        config.validate()?;
        let store = Self {
            pool,
            events: StatusEventBus::new(config.event_capacity),
            config: Arc::new(config),
            morph: Arc::new(morph),
        };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &StatusConfig {
        &self.config
    }

    /// Owner type registry.
    #[must_use]
    pub fn morph_map(&self) -> &MorphMap {
        &self.morph
    }

    /// Bus on which `StatusUpdated` events are published.
    #[must_use]
    pub fn events(&self) -> &StatusEventBus {
        &self.events
    }

    /// Subscribe to `StatusUpdated` events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StatusUpdated> {
        self.events.subscribe()
    }

    /// Owner reference for `entity`, tagged through the morph map.
    #[must_use]
    pub fn owner_of<T: HasStatuses + 'static>(&self, entity: &T) -> OwnerRef {
        OwnerRef::new(self.morph.resolve::<T>(), entity.status_key())
    }

    /// Status handle for `entity`; `set_status` consults its validator.
    pub fn statuses_of<'a, T>(&'a self, entity: &'a T) -> OwnerStatuses<'a>
    where
        T: HasStatuses + Sync + 'static,
    {
        OwnerStatuses::new(self, self.owner_of(entity), Some(entity))
    }

    /// Status handle for a raw owner reference. No validator applies.
    pub fn statuses_for(&self, owner: OwnerRef) -> OwnerStatuses<'_> {
        OwnerStatuses::new(self, owner, None)
    }

    /// Keys of `T` owners whose current `name` status has a value in `values`.
    ///
    /// Only the newest row per `(owner, name)` is considered, so a
    /// superseded value never matches.
    pub async fn current_status<T: HasStatuses + 'static>(
        &self,
        name: &str,
        values: &[&str],
    ) -> Result<Vec<i64>> {
        let owner_type = self.morph.resolve::<T>();
        self.current_status_by_type(&owner_type, name, values).await
    }

    /// Same as [`current_status`](Self::current_status) for a raw type tag.
    pub async fn current_status_by_type(
        &self,
        owner_type: &str,
        name: &str,
        values: &[&str],
    ) -> Result<Vec<i64>> {
        if values.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_current_owner_ids(owner_type, name, values).await
    }

    /// Keep only the entities whose current `name` status has a value in `values`.
    pub async fn filter_current_status<T: HasStatuses + 'static>(
        &self,
        entities: Vec<T>,
        name: &str,
        values: &[&str],
    ) -> Result<Vec<T>> {
        let keys: HashSet<i64> = self
            .current_status::<T>(name, values)
            .await?
            .into_iter()
            .collect();
        Ok(entities
            .into_iter()
            .filter(|e| keys.contains(&e.status_key()))
            .collect())
    }
}
