//! Per-owner status handle.
//!
//! [`OwnerStatuses`] is what an entity's status accessors look like in
//! Rust: obtain one from [`StatusStore::statuses_of`] and read or write the
//! entity's statuses through it.
//!
//! ```text
//! set_status ──► is_valid_status? ──no──► InvalidStatus
//!                      │ yes
//!              force_set_status
//!                      │
//!          old = newest stored row for name
//!          upsert (owner, name)
//!          publish StatusUpdated { old, new, owner }
//! ```

use crate::error::{Error, Result};
use crate::events::StatusUpdated;
use crate::store::StatusStore;
use crate::types::{HasStatuses, OwnerRef, Status};
use tracing::debug;

/// Status accessors for one owner.
///
/// Reads go to SQLite unless [`load`](Self::load) has been called, in which
/// case they are answered from the preloaded rows. The preloaded rows are a
/// snapshot: every write through the handle reloads them, and the previous
/// value reported in `StatusUpdated` is always read from SQLite.
pub struct OwnerStatuses<'a> {
    store: &'a StatusStore,
    owner: OwnerRef,
    validator: Option<&'a (dyn HasStatuses + Sync)>,
    /// Preloaded rows, newest first
    loaded: Option<Vec<Status>>,
}

impl std::fmt::Debug for OwnerStatuses<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerStatuses")
            .field("owner", &self.owner)
            .field("is_loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

impl<'a> OwnerStatuses<'a> {
    pub(crate) fn new(
        store: &'a StatusStore,
        owner: OwnerRef,
        validator: Option<&'a (dyn HasStatuses + Sync)>,
    ) -> Self {
        Self {
            store,
            owner,
            validator,
            loaded: None,
        }
    }

    /// The owner this handle reads and writes.
    #[must_use]
    pub fn owner(&self) -> &OwnerRef {
        &self.owner
    }

    /// Preload every row of the owner into the handle.
    pub async fn load(&mut self) -> Result<&mut Self> {
        self.loaded = Some(self.store.fetch_statuses(&self.owner).await?);
        Ok(self)
    }

    /// Whether rows have been preloaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    // ── Reads ───────────────────────────────────────────────────

    /// All rows of the owner, newest first.
    pub async fn statuses(&self) -> Result<Vec<Status>> {
        match &self.loaded {
            Some(rows) => Ok(rows.clone()),
            None => self.store.fetch_statuses(&self.owner).await,
        }
    }

    /// Current row for `name`.
    pub async fn status(&self, name: &str) -> Result<Option<Status>> {
        self.latest_status(&[name]).await
    }

    /// Newest row whose name is in `names`, or the newest row of any name
    /// when `names` is empty.
    pub async fn latest_status(&self, names: &[&str]) -> Result<Option<Status>> {
        match &self.loaded {
            Some(rows) => Ok(rows
                .iter()
                .find(|s| names.is_empty() || names.contains(&s.name.as_str()))
                .cloned()),
            None => self.store.fetch_latest(&self.owner, names).await,
        }
    }

    /// Whether a row named `name` exists.
    pub async fn has_ever_had_status(&self, name: &str) -> Result<bool> {
        match &self.loaded {
            Some(rows) => Ok(rows.iter().any(|s| s.name == name)),
            None => self.store.fetch_has_status(&self.owner, name).await,
        }
    }

    // ── Writes ──────────────────────────────────────────────────

    /// Validate with the owner's `is_valid_status`, then write.
    ///
    /// Nothing is written when validation fails.
    pub async fn set_status(&mut self, name: &str, value: Option<&str>) -> Result<&mut Self> {
        if let Some(owner) = self.validator {
            if !owner.is_valid_status(name, value) {
                debug!(owner = %self.owner, name, "status rejected by validator");
                return Err(Error::invalid_status(name));
            }
        }
        self.force_set_status(name, value).await
    }

    /// `set_status` for each pair, in order.
    ///
    /// Not transactional: stops at the first error, earlier pairs stay written.
    pub async fn set_statuses(&mut self, statuses: &[(&str, Option<&str>)]) -> Result<&mut Self> {
        for (name, value) in statuses {
            self.set_status(name, *value).await?;
        }
        Ok(self)
    }

    /// Write without consulting the validator and publish `StatusUpdated`.
    ///
    /// An empty name is still refused.
    pub async fn force_set_status(&mut self, name: &str, value: Option<&str>) -> Result<&mut Self> {
        if name.is_empty() {
            return Err(Error::invalid_status(name));
        }

        let old = self.store.fetch_latest(&self.owner, &[name]).await?;
        let new = self.store.upsert_status(&self.owner, name, value).await?;
        self.reload_if_loaded().await?;

        self.store.events().publish(StatusUpdated {
            old,
            new,
            owner: self.owner.clone(),
        });
        Ok(self)
    }

    /// Delete every row whose name is in `names`. Empty `names` is a no-op.
    ///
    /// Returns the number of rows deleted.
    pub async fn delete_status(&mut self, names: &[&str]) -> Result<u64> {
        if names.is_empty() {
            return Ok(0);
        }
        let deleted = self.store.delete_statuses(&self.owner, names).await?;
        self.reload_if_loaded().await?;
        Ok(deleted)
    }

    /// Delete every row of the owner.
    pub async fn clear_statuses(&mut self) -> Result<u64> {
        let deleted = self.store.delete_all_statuses(&self.owner).await?;
        self.reload_if_loaded().await?;
        Ok(deleted)
    }

    async fn reload_if_loaded(&mut self) -> Result<()> {
        if self.loaded.is_some() {
            self.loaded = Some(self.store.fetch_statuses(&self.owner).await?);
        }
        Ok(())
    }
}
