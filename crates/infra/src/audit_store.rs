//! In-memory activity-log store.

use std::sync::{Arc, RwLock};

use chrono::Utc;

use opsledger_audit::{ActivityLogEntry, AuditEvent, AuditStore, LogFilter};
use opsledger_core::{ActorEmail, DomainError, DomainResult, LogEntryId};

/// In-memory append-only audit store.
///
/// Intended for tests/dev. Assigns the entry id (UUIDv7) and timestamp at
/// append time, like a real backend would at commit.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    entries: RwLock<Vec<ActivityLogEntry>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Total number of committed entries (test helper).
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn append(&self, event: AuditEvent) -> DomainResult<ActivityLogEntry> {
        let entry = ActivityLogEntry {
            id: LogEntryId::new(),
            actor_email: event.actor_email,
            action: event.action,
            resource_type: event.resource_type,
            resource_id: event.resource_id,
            payload: event.payload,
            timestamp: Utc::now(),
        };

        let mut entries = self
            .entries
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        entries.push(entry.clone());

        Ok(entry)
    }

    async fn list_by_actor(&self, actor: &ActorEmail) -> DomainResult<Vec<ActivityLogEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;

        let mut matching: Vec<ActivityLogEntry> = entries
            .iter()
            .filter(|e| e.actor_email == *actor)
            .cloned()
            .collect();

        // Newest first; entry ids (v7) break wall-clock ties.
        matching.sort_by(|a, b| (b.timestamp, b.id.as_uuid()).cmp(&(a.timestamp, a.id.as_uuid())));
        Ok(matching)
    }

    async fn list_by_filter(&self, filter: &LogFilter) -> DomainResult<Vec<ActivityLogEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;

        let mut matching: Vec<ActivityLogEntry> =
            entries.iter().filter(|e| filter.matches(e)).cloned().collect();

        matching.sort_by(|a, b| (a.timestamp, a.id.as_uuid()).cmp(&(b.timestamp, b.id.as_uuid())));
        Ok(matching)
    }
}
