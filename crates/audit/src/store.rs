//! Persistence contract for the activity trail.

use opsledger_core::{ActorEmail, DomainResult, TimeRange};

use crate::entry::{ActivityLogEntry, AuditEvent, ResourceType};

/// Filter used when reading the trail as an aggregation feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    pub resource_type: ResourceType,
    /// Inclusive window on the store-assigned timestamp.
    pub range: TimeRange,
    pub actor_email: Option<ActorEmail>,
}

impl LogFilter {
    pub fn new(resource_type: ResourceType, range: TimeRange) -> Self {
        Self {
            resource_type,
            range,
            actor_email: None,
        }
    }

    pub fn by_actor(mut self, actor: ActorEmail) -> Self {
        self.actor_email = Some(actor);
        self
    }

    pub fn matches(&self, entry: &ActivityLogEntry) -> bool {
        if entry.resource_type != self.resource_type {
            return false;
        }
        if !self.range.contains(entry.timestamp) {
            return false;
        }
        match &self.actor_email {
            Some(actor) => entry.actor_email == *actor,
            None => true,
        }
    }
}

/// Append-only activity-log store.
///
/// Implementations must:
/// - assign the entry id and timestamp at append time (monotonic wall
///   clock relative to storage commit; callers never supply either)
/// - never mutate or delete a committed entry
/// - fail only with `DomainError::Storage`
#[async_trait::async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one entry to the trail and return it as committed.
    async fn append(&self, event: AuditEvent) -> DomainResult<ActivityLogEntry>;

    /// All entries recorded by `actor`, newest first.
    async fn list_by_actor(&self, actor: &ActorEmail) -> DomainResult<Vec<ActivityLogEntry>>;

    /// Entries matching `filter`, ascending by timestamp (time-series feed).
    async fn list_by_filter(&self, filter: &LogFilter) -> DomainResult<Vec<ActivityLogEntry>>;
}
