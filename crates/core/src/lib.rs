//! `opsledger-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod time;

pub use error::{DomainError, DomainResult};
pub use id::{ActorEmail, FunctionId, LogEntryId, ProductId, ResourceId};
pub use time::TimeRange;
