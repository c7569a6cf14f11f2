//! Clearance-level and function-permission records.

use serde::{Deserialize, Serialize};

use opsledger_core::FunctionId;

/// Numeric key of a clearance level (unique per level).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(i64);

impl LevelId {
    pub fn new(level: i64) -> Self {
        Self(level)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for LevelId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for LevelId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A named permission level.
///
/// `allowed_functions` is stored as an ordered list but is logically a
/// set: duplicate adds are guarded, existing order is preserved and new
/// ids append at the end. List order is not a contract. Ids may dangle
/// (no foreign-key enforcement against function permissions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearanceLevel {
    pub level: LevelId,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub allowed_functions: Vec<FunctionId>,
}

impl ClearanceLevel {
    pub fn allows(&self, function_id: &FunctionId) -> bool {
        self.allowed_functions.contains(function_id)
    }
}

/// A nameable capability that can be attached to clearance levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionPermission {
    pub id: FunctionId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Creation request for a clearance level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClearanceLevel {
    pub level: LevelId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_functions: Vec<FunctionId>,
}

impl From<NewClearanceLevel> for ClearanceLevel {
    fn from(new: NewClearanceLevel) -> Self {
        Self {
            level: new.level,
            name: new.name,
            description: new.description,
            allowed_functions: new.allowed_functions,
        }
    }
}

/// Partial update of a clearance level: only provided fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearanceLevelPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_functions: Option<Vec<FunctionId>>,
}

impl ClearanceLevelPatch {
    /// Apply the provided fields onto `level`, leaving the rest untouched.
    pub fn apply_to(&self, level: &mut ClearanceLevel) {
        if let Some(name) = &self.name {
            level.name = name.clone();
        }
        if let Some(description) = &self.description {
            level.description = Some(description.clone());
        }
        if let Some(functions) = &self.allowed_functions {
            level.allowed_functions = functions.clone();
        }
    }

    pub fn with_functions(functions: Vec<FunctionId>) -> Self {
        Self {
            allowed_functions: Some(functions),
            ..Self::default()
        }
    }
}

/// Creation request for a function permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFunctionPermission {
    pub id: FunctionId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl From<NewFunctionPermission> for FunctionPermission {
    fn from(new: NewFunctionPermission) -> Self {
        Self {
            id: new.id,
            name: new.name,
            description: new.description,
            category: new.category,
        }
    }
}
