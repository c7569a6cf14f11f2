//! Lookup/mutation service over clearance levels and function permissions.

use std::sync::Arc;

use serde_json::json;

use opsledger_audit::{AuditEvent, AuditTrail, ResourceType};
use opsledger_core::{ActorEmail, DomainError, DomainResult, FunctionId, ResourceId};

use crate::level::{
    ClearanceLevel, ClearanceLevelPatch, FunctionPermission, LevelId, NewClearanceLevel,
    NewFunctionPermission,
};
use crate::store::{ClearanceStore, FunctionStore};

/// Outcome of a batch function creation.
///
/// The batch boundary is fire-and-forget resilient: errors inside the
/// batch are swallowed (diagnostics go to the log) so administrative setup
/// scripts do not abort entirely. The variants let callers tell a clean
/// no-op apart from a suppressed failure without guessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchCreate {
    /// Every requested id already existed (or the input was empty); no
    /// writes were performed.
    NothingToDo,
    /// The subset of requested functions that was actually created.
    Created(Vec<FunctionPermission>),
    /// An internal failure was suppressed. Some functions may have been
    /// created before the failure; none are reported.
    Suppressed,
}

impl BatchCreate {
    /// The created subset (empty for `NothingToDo` and `Suppressed`).
    pub fn created(&self) -> &[FunctionPermission] {
        match self {
            BatchCreate::Created(functions) => functions,
            _ => &[],
        }
    }
}

/// Clearance model service.
///
/// Every mutation takes the acting user's email and records an audit entry
/// after the mutation has committed. The audit write is best-effort: when
/// it fails, the mutation stands and the storage error propagates to the
/// caller on its own.
pub struct ClearanceService<C, F> {
    levels: Arc<C>,
    functions: Arc<F>,
    audit: AuditTrail,
}

impl<C, F> ClearanceService<C, F>
where
    C: ClearanceStore,
    F: FunctionStore,
{
    pub fn new(levels: Arc<C>, functions: Arc<F>, audit: AuditTrail) -> Self {
        Self {
            levels,
            functions,
            audit,
        }
    }

    pub async fn list_levels(&self) -> DomainResult<Vec<ClearanceLevel>> {
        self.levels.list().await
    }

    /// Resolve a level by its numeric key.
    pub async fn get_level(&self, level: LevelId) -> DomainResult<ClearanceLevel> {
        self.levels
            .find(level)
            .await?
            .ok_or_else(DomainError::not_found)
    }

    /// Insert a new level, then audit the creation.
    ///
    /// No duplicate pre-check: a colliding `level` key surfaces as
    /// `Conflict` straight from the store.
    pub async fn create_level(
        &self,
        spec: NewClearanceLevel,
        actor: &ActorEmail,
    ) -> DomainResult<ClearanceLevel> {
        let created = self.levels.insert(spec.clone().into()).await?;

        self.audit
            .record(
                AuditEvent::new(
                    actor.clone(),
                    format!("Created clearance level {}", created.name),
                    ResourceType::ClearanceLevel,
                    ResourceId::new(created.level.to_string()),
                )
                .with_json_payload(&spec)?,
            )
            .await?;

        Ok(created)
    }

    /// Partial update: only fields present in `patch` change.
    pub async fn update_level(
        &self,
        level: LevelId,
        patch: ClearanceLevelPatch,
        actor: &ActorEmail,
    ) -> DomainResult<ClearanceLevel> {
        let updated = self
            .levels
            .update(level, &patch)
            .await?
            .ok_or_else(DomainError::not_found)?;

        self.audit
            .record(
                AuditEvent::new(
                    actor.clone(),
                    format!("Updated clearance level {}", updated.name),
                    ResourceType::ClearanceLevel,
                    ResourceId::new(level.to_string()),
                )
                .with_json_payload(&patch)?,
            )
            .await?;

        Ok(updated)
    }

    /// Delete a level. Fetches first to capture the name for the audit
    /// message; zero rows affected fails `NotFound` and nothing is audited.
    pub async fn delete_level(&self, level: LevelId, actor: &ActorEmail) -> DomainResult<()> {
        let existing = self.get_level(level).await?;

        let deleted = self.levels.delete(level).await?;
        if deleted == 0 {
            return Err(DomainError::not_found());
        }

        self.audit
            .record(AuditEvent::new(
                actor.clone(),
                format!("Deleted clearance level {}", existing.name),
                ResourceType::ClearanceLevel,
                ResourceId::new(level.to_string()),
            ))
            .await?;

        Ok(())
    }

    pub async fn list_functions(&self) -> DomainResult<Vec<FunctionPermission>> {
        self.functions.list().await
    }

    /// Insert a single function permission, then audit the creation.
    pub async fn create_function(
        &self,
        new: NewFunctionPermission,
        actor: &ActorEmail,
    ) -> DomainResult<FunctionPermission> {
        let created = self.functions.insert(new.clone().into()).await?;

        self.audit
            .record(
                AuditEvent::new(
                    actor.clone(),
                    format!("Created function permission {}", created.name),
                    ResourceType::FunctionPermission,
                    ResourceId::new(created.id.to_string()),
                )
                .with_json_payload(&new)?,
            )
            .await?;

        Ok(created)
    }

    /// Create only the functions whose ids do not exist yet.
    ///
    /// An empty remainder short-circuits with no writes. Errors anywhere
    /// in the batch degrade the call to [`BatchCreate::Suppressed`]
    /// instead of propagating partial failure.
    pub async fn create_functions_if_not_exist(
        &self,
        functions: Vec<NewFunctionPermission>,
        actor: &ActorEmail,
    ) -> BatchCreate {
        match self.create_missing(functions, actor).await {
            Ok(None) => BatchCreate::NothingToDo,
            Ok(Some(created)) => BatchCreate::Created(created),
            Err(err) => {
                tracing::error!(error = %err, "error creating functions");
                BatchCreate::Suppressed
            }
        }
    }

    async fn create_missing(
        &self,
        functions: Vec<NewFunctionPermission>,
        actor: &ActorEmail,
    ) -> DomainResult<Option<Vec<FunctionPermission>>> {
        let existing = self.functions.list().await?;
        let existing_ids: Vec<&FunctionId> = existing.iter().map(|f| &f.id).collect();

        let missing: Vec<NewFunctionPermission> = functions
            .into_iter()
            .filter(|f| !existing_ids.contains(&&f.id))
            .collect();

        if missing.is_empty() {
            return Ok(None);
        }

        let mut created = Vec::with_capacity(missing.len());
        for function in missing {
            created.push(self.create_function(function, actor).await?);
        }
        Ok(Some(created))
    }

    /// Whether `level` grants `function_id`.
    ///
    /// An absent level surfaces as `NotFound` via the lookup; it is never
    /// silently `false`.
    pub async fn has_permission(
        &self,
        level: LevelId,
        function_id: &FunctionId,
    ) -> DomainResult<bool> {
        let clearance = self.get_level(level).await?;
        Ok(clearance.allows(function_id))
    }

    /// Attach a function id to a level. Idempotent: adding a present id is
    /// a no-op that does not audit. Returns the (possibly unchanged) level.
    pub async fn add_function_to_level(
        &self,
        level: LevelId,
        function_id: FunctionId,
        actor: &ActorEmail,
    ) -> DomainResult<ClearanceLevel> {
        let clearance = self.get_level(level).await?;
        if clearance.allows(&function_id) {
            return Ok(clearance);
        }

        // Read-modify-write; not isolated against concurrent membership
        // changes on the same level.
        let mut allowed = clearance.allowed_functions.clone();
        allowed.push(function_id.clone());

        let updated = self
            .levels
            .update(level, &ClearanceLevelPatch::with_functions(allowed))
            .await?
            .ok_or_else(DomainError::not_found)?;

        self.audit
            .record(
                AuditEvent::new(
                    actor.clone(),
                    format!(
                        "Added function {} to clearance level {}",
                        function_id, updated.name
                    ),
                    ResourceType::ClearanceLevel,
                    ResourceId::new(level.to_string()),
                )
                .with_json_payload(&json!({ "functionId": function_id }))?,
            )
            .await?;

        Ok(updated)
    }

    /// Detach a function id from a level. Idempotent: removing an absent
    /// id is a no-op that does not audit. Returns the (possibly unchanged)
    /// level.
    pub async fn remove_function_from_level(
        &self,
        level: LevelId,
        function_id: FunctionId,
        actor: &ActorEmail,
    ) -> DomainResult<ClearanceLevel> {
        let clearance = self.get_level(level).await?;
        let Some(index) = clearance
            .allowed_functions
            .iter()
            .position(|id| *id == function_id)
        else {
            return Ok(clearance);
        };

        let mut allowed = clearance.allowed_functions.clone();
        allowed.remove(index);

        let updated = self
            .levels
            .update(level, &ClearanceLevelPatch::with_functions(allowed))
            .await?
            .ok_or_else(DomainError::not_found)?;

        self.audit
            .record(
                AuditEvent::new(
                    actor.clone(),
                    format!(
                        "Removed function {} from clearance level {}",
                        function_id, updated.name
                    ),
                    ResourceType::ClearanceLevel,
                    ResourceId::new(level.to_string()),
                )
                .with_json_payload(&json!({ "functionId": function_id }))?,
            )
            .await?;

        Ok(updated)
    }
}

impl<C, F> core::fmt::Debug for ClearanceService<C, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClearanceService").finish_non_exhaustive()
    }
}
