//! In-memory clearance-model stores.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use opsledger_clearance::{
    ClearanceLevel, ClearanceLevelPatch, ClearanceStore, FunctionPermission, FunctionStore,
    LevelId,
};
use opsledger_core::{DomainError, DomainResult, FunctionId};

/// In-memory clearance-level collection keyed by level number.
///
/// Intended for tests/dev. Offers per-document atomicity only, matching
/// the document-store semantics the service is written against.
#[derive(Debug, Default)]
pub struct InMemoryClearanceStore {
    levels: RwLock<HashMap<i64, ClearanceLevel>>,
}

impl InMemoryClearanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait::async_trait]
impl ClearanceStore for InMemoryClearanceStore {
    async fn insert(&self, level: ClearanceLevel) -> DomainResult<ClearanceLevel> {
        let mut levels = self
            .levels
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;

        if levels.contains_key(&level.level.value()) {
            return Err(DomainError::conflict(format!(
                "duplicate clearance level {}",
                level.level
            )));
        }

        levels.insert(level.level.value(), level.clone());
        Ok(level)
    }

    async fn find(&self, level: LevelId) -> DomainResult<Option<ClearanceLevel>> {
        let levels = self
            .levels
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        Ok(levels.get(&level.value()).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<ClearanceLevel>> {
        let levels = self
            .levels
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;

        let mut all: Vec<ClearanceLevel> = levels.values().cloned().collect();
        all.sort_by_key(|l| l.level);
        Ok(all)
    }

    async fn update(
        &self,
        level: LevelId,
        patch: &ClearanceLevelPatch,
    ) -> DomainResult<Option<ClearanceLevel>> {
        let mut levels = self
            .levels
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;

        match levels.get_mut(&level.value()) {
            Some(existing) => {
                patch.apply_to(existing);
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, level: LevelId) -> DomainResult<u64> {
        let mut levels = self
            .levels
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        Ok(levels.remove(&level.value()).map(|_| 1).unwrap_or(0))
    }
}

/// In-memory function-permission collection keyed by function id.
#[derive(Debug, Default)]
pub struct InMemoryFunctionStore {
    functions: RwLock<HashMap<FunctionId, FunctionPermission>>,
}

impl InMemoryFunctionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait::async_trait]
impl FunctionStore for InMemoryFunctionStore {
    async fn insert(&self, function: FunctionPermission) -> DomainResult<FunctionPermission> {
        let mut functions = self
            .functions
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;

        if functions.contains_key(&function.id) {
            return Err(DomainError::conflict(format!(
                "duplicate function permission {}",
                function.id
            )));
        }

        functions.insert(function.id.clone(), function.clone());
        Ok(function)
    }

    async fn find(&self, id: &FunctionId) -> DomainResult<Option<FunctionPermission>> {
        let functions = self
            .functions
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        Ok(functions.get(id).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<FunctionPermission>> {
        let functions = self
            .functions
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;

        let mut all: Vec<FunctionPermission> = functions.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}
