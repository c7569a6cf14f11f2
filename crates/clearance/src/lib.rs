//! `opsledger-clearance` — named permission levels gating privileged calls.
//!
//! A clearance level holds a set of allowed function identifiers.
//! Controllers consult [`ClearanceService::has_permission`] before allowing
//! a mutation; every administrative change to the model is itself audited.

pub mod level;
pub mod service;
pub mod store;

pub use level::{
    ClearanceLevel, ClearanceLevelPatch, FunctionPermission, LevelId, NewClearanceLevel,
    NewFunctionPermission,
};
pub use service::{BatchCreate, ClearanceService};
pub use store::{ClearanceStore, FunctionStore};
