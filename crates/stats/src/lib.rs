//! `opsledger-stats` — derived analytics over the activity trail.
//!
//! Reconstructs per-(product, day) sales metrics and daily order counts by
//! scanning the trail's order-placement entries. A bulk read feeds a pure
//! in-memory computation; the report reflects whatever snapshot the read
//! returned.

pub mod payload;
pub mod report;
pub mod service;

pub use payload::{order_items, order_placed, OrderItem};
pub use report::{aggregate, OrderStatsRow};
pub use service::StatsService;
