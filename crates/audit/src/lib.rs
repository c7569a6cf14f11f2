//! `opsledger-audit` — append-only activity trail.
//!
//! Every mutating domain operation records a structured [`AuditEvent`]
//! after it commits. The trail is best-effort relative to the triggering
//! mutation: a failed audit write is observable on its own and is never
//! compensated by rolling the mutation back.

pub mod entry;
pub mod store;
pub mod trail;

pub use entry::{ActivityLogEntry, AuditEvent, ResourceType};
pub use store::{AuditStore, LogFilter};
pub use trail::AuditTrail;
