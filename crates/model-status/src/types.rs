//! Core data types: status rows and owner references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single status row attached to an owner.
///
/// One row exists per `(owner, name)`; writing the same name again
/// overwrites `value` in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Autoincrement row id; higher is newer
    pub id: i64,
    /// Stable type tag of the owner (see [`MorphMap`](crate::MorphMap))
    pub owner_type: String,
    /// Primary key of the owner
    pub owner_id: i64,
    /// Status dimension, e.g. `"publication"`
    pub name: String,
    /// Optional payload, e.g. `"published"`
    pub value: Option<String>,
    /// When the row was first written
    pub created_at: DateTime<Utc>,
    /// When the value was last overwritten
    pub updated_at: DateTime<Utc>,
}

impl Status {
    /// The owner this row belongs to.
    #[must_use]
    pub fn owner(&self) -> OwnerRef {
        OwnerRef::new(self.owner_type.clone(), self.owner_id)
    }

    /// Whether the payload equals `value`.
    #[must_use]
    pub fn is(&self, value: &str) -> bool {
        self.value.as_deref() == Some(value)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.name, value),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Polymorphic reference to a status owner: `(type tag, key)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef {
    /// Stable type tag
    pub owner_type: String,
    /// Owner primary key
    pub owner_id: i64,
}

impl OwnerRef {
    /// Create a new owner reference.
    pub fn new(owner_type: impl Into<String>, owner_id: i64) -> Self {
        Self {
            owner_type: owner_type.into(),
            owner_id,
        }
    }
}

impl std::fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.owner_type, self.owner_id)
    }
}

impl std::str::FromStr for OwnerRef {
    type Err = String;

    /// Parse `TYPE:ID`. The id is taken after the last `:` so tags may
    /// contain `::` paths.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner_type, id) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected TYPE:ID, got `{s}`"))?;
        if owner_type.is_empty() {
            return Err(format!("missing owner type in `{s}`"));
        }
        let owner_id = id
            .parse::<i64>()
            .map_err(|e| format!("invalid owner id `{id}`: {e}"))?;
        Ok(Self::new(owner_type, owner_id))
    }
}

/// An entity that can own statuses.
///
/// Implementors provide their primary key and may override
/// [`is_valid_status`](HasStatuses::is_valid_status) to restrict which
/// `(name, value)` pairs [`set_status`](crate::OwnerStatuses::set_status)
/// accepts.
pub trait HasStatuses {
    /// Primary key stored in the owner key column.
    fn status_key(&self) -> i64;

    /// Validation predicate for `set_status`. Accepts everything by default.
    fn is_valid_status(&self, _name: &str, _value: Option<&str>) -> bool {
        true
    }
}
