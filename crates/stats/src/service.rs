//! Report service: bulk trail read followed by pure aggregation.

use opsledger_audit::{AuditTrail, LogFilter, ResourceType};
use opsledger_core::{ActorEmail, DomainResult, TimeRange};

use crate::report::{aggregate, OrderStatsRow};

/// Builds sales reports from the activity trail.
///
/// Holds no state and no locks: each call is a snapshot read of the
/// `order`-typed entries in the window followed by [`aggregate`]. Entries
/// written concurrently with the read may be missed; the report is only as
/// fresh as the snapshot.
#[derive(Debug, Clone)]
pub struct StatsService {
    trail: AuditTrail,
}

impl StatsService {
    pub fn new(trail: AuditTrail) -> Self {
        Self { trail }
    }

    /// Per-(product, day) sales rows for order placements inside `range`,
    /// optionally restricted to one actor.
    pub async fn order_stats(
        &self,
        range: TimeRange,
        actor: Option<ActorEmail>,
    ) -> DomainResult<Vec<OrderStatsRow>> {
        let mut filter = LogFilter::new(ResourceType::Order, range);
        if let Some(actor) = actor {
            filter = filter.by_actor(actor);
        }

        let entries = self.trail.list_by_filter(&filter).await?;
        Ok(aggregate(&entries))
    }
}
