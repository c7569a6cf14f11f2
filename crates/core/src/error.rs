//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// The taxonomy is deliberately small: lookups fail with `NotFound`,
/// duplicate keys surface as `Conflict`, locally-recovered payload issues
/// are `Malformed`, and collaborator failures pass through as `Storage`
/// unchanged (never retried at this layer).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A referenced level/entity is absent.
    #[error("not found")]
    NotFound,

    /// A duplicate key was rejected on creation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A payload could not be parsed (recovered locally, rarely surfaced).
    #[error("malformed: {0}")]
    Malformed(String),

    /// An underlying persistence error, propagated as-is.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
