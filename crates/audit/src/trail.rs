//! Write-only emitter facade held by every domain service.

use std::sync::Arc;

use opsledger_core::{ActorEmail, DomainResult};

use crate::entry::{ActivityLogEntry, AuditEvent};
use crate::store::{AuditStore, LogFilter};

/// Narrow handle over the audit store.
///
/// Domain services call [`AuditTrail::record`] after their mutation has
/// committed. The record step is a distinct, observable side-effect: when
/// it fails the mutation stands and the storage error propagates on its
/// own (no two-phase commit).
#[derive(Clone)]
pub struct AuditTrail {
    store: Arc<dyn AuditStore>,
}

impl AuditTrail {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Append one action to the trail.
    pub async fn record(&self, event: AuditEvent) -> DomainResult<ActivityLogEntry> {
        self.store.append(event).await
    }

    /// All entries recorded by `actor`, newest first.
    pub async fn list_by_actor(&self, actor: &ActorEmail) -> DomainResult<Vec<ActivityLogEntry>> {
        self.store.list_by_actor(actor).await
    }

    /// Entries matching `filter`, ascending by timestamp.
    pub async fn list_by_filter(&self, filter: &LogFilter) -> DomainResult<Vec<ActivityLogEntry>> {
        self.store.list_by_filter(filter).await
    }
}

impl core::fmt::Debug for AuditTrail {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuditTrail").finish_non_exhaustive()
    }
}
