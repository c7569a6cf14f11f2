//! Infrastructure layer: in-memory persistence backends for tests/dev.
//!
//! Production deployments supply their own document-store adapters behind
//! the same contracts; the in-memory stores here keep the exact error and
//! key semantics (duplicate-key conflicts, per-document atomicity).

pub mod audit_store;
pub mod clearance_store;

mod integration_tests;

pub use audit_store::InMemoryAuditStore;
pub use clearance_store::{InMemoryClearanceStore, InMemoryFunctionStore};
