//! Activity-log data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opsledger_core::{ActorEmail, DomainError, DomainResult, LogEntryId, ResourceId};

/// Kind of entity an audit entry refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    Product,
    Order,
    Category,
    Unit,
    User,
    ClearanceLevel,
    FunctionPermission,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Product => "product",
            ResourceType::Order => "order",
            ResourceType::Category => "category",
            ResourceType::Unit => "unit",
            ResourceType::User => "user",
            ResourceType::ClearanceLevel => "clearance-level",
            ResourceType::FunctionPermission => "function-permission",
        }
    }
}

impl core::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action ready to be appended to the trail (not yet assigned an id or
/// timestamp — the store does that at commit time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub actor_email: ActorEmail,
    /// Human-readable description; not machine-parsed.
    pub action: String,
    pub resource_type: ResourceType,
    /// Loose reference to the affected entity; may be empty and may dangle.
    pub resource_id: ResourceId,
    /// Serialized snapshot of the triggering request body, opaque here.
    pub payload: Option<String>,
}

impl AuditEvent {
    pub fn new(
        actor_email: ActorEmail,
        action: impl Into<String>,
        resource_type: ResourceType,
        resource_id: ResourceId,
    ) -> Self {
        Self {
            actor_email,
            action: action.into(),
            resource_type,
            resource_id,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Attach the triggering request body as a JSON snapshot.
    pub fn with_json_payload<T: Serialize>(mut self, body: &T) -> DomainResult<Self> {
        let json = serde_json::to_string(body)
            .map_err(|e| DomainError::malformed(format!("payload serialization failed: {e}")))?;
        self.payload = Some(json);
        Ok(self)
    }
}

/// A committed entry in the append-only trail.
///
/// Once written, an entry is never mutated or deleted. Listings are served
/// newest first; aggregation feeds ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: LogEntryId,
    pub actor_email: ActorEmail,
    pub action: String,
    pub resource_type: ResourceType,
    pub resource_id: ResourceId,
    pub payload: Option<String>,
    /// Assigned at write time by the store, immutable thereafter.
    pub timestamp: DateTime<Utc>,
}
