//! Persistence contracts for the clearance model.
//!
//! Stores guarantee per-document atomicity only. Read-modify-write of
//! `allowed_functions` (done by the service) is not transactionally
//! isolated: two concurrent adds against the same level can race and one
//! update can be lost. That is an accepted weak-consistency property.

use opsledger_core::{DomainResult, FunctionId};

use crate::level::{ClearanceLevel, ClearanceLevelPatch, FunctionPermission, LevelId};

/// Clearance-level collection.
#[async_trait::async_trait]
pub trait ClearanceStore: Send + Sync {
    /// Insert a new level. Duplicate `level` keys fail with
    /// `DomainError::Conflict`.
    async fn insert(&self, level: ClearanceLevel) -> DomainResult<ClearanceLevel>;

    async fn find(&self, level: LevelId) -> DomainResult<Option<ClearanceLevel>>;

    async fn list(&self) -> DomainResult<Vec<ClearanceLevel>>;

    /// Update in place; returns the updated document, `None` when absent.
    async fn update(
        &self,
        level: LevelId,
        patch: &ClearanceLevelPatch,
    ) -> DomainResult<Option<ClearanceLevel>>;

    /// Delete by key; returns the number of documents removed (0 or 1).
    async fn delete(&self, level: LevelId) -> DomainResult<u64>;
}

/// Function-permission collection.
#[async_trait::async_trait]
pub trait FunctionStore: Send + Sync {
    /// Insert a new function permission. Duplicate ids fail with
    /// `DomainError::Conflict`.
    async fn insert(&self, function: FunctionPermission) -> DomainResult<FunctionPermission>;

    async fn find(&self, id: &FunctionId) -> DomainResult<Option<FunctionPermission>>;

    async fn list(&self) -> DomainResult<Vec<FunctionPermission>>;
}
