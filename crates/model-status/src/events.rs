//! StatusUpdated notifications.
//!
//! Every successful `force_set_status` publishes one [`StatusUpdated`] on
//! the store's [`StatusEventBus`]. Subscribers (audit logs, cache
//! invalidation, webhooks) live outside this crate.

use crate::types::{OwnerRef, Status};
use serde::Serialize;
use tokio::sync::broadcast;

/// A status was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdated {
    /// Row for the same name before the write, if any
    pub old: Option<Status>,
    /// Row after the write
    pub new: Status,
    /// Owner of both rows
    pub owner: OwnerRef,
}

/// Broadcast channel for [`StatusUpdated`] events.
///
/// Slow subscribers miss events (lagged) rather than blocking writers.
#[derive(Debug, Clone)]
pub struct StatusEventBus {
    sender: broadcast::Sender<StatusUpdated>,
}

impl StatusEventBus {
    /// Create a bus buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StatusUpdated> {
        self.sender.subscribe()
    }

    /// Publish an event. Returns the number of subscribers reached;
    /// with none, the event is dropped.
    pub fn publish(&self, event: StatusUpdated) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Current number of subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for StatusEventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
