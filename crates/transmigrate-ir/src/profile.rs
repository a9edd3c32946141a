//! Analysis-derived records attached to functions and classes.
//!
//! These are produced by the analyzers in `transmigrate-analysis` and
//! consumed by the generators. All of them default to "nothing detected".

use crate::types::Type;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionSpec {
    pub is_noexcept: bool,
    pub can_throw: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchClause {
    /// Unqualified caught type, or `...` for catch-all.
    pub exception_type: String,
    /// Empty for catch-all.
    pub exception_var: String,
    pub handler_body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TryCatchBlock {
    pub try_body: String,
    pub catch_clauses: Vec<CatchClause>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionProfile {
    pub exception_spec: ExceptionSpec,
    pub try_catch_blocks: Vec<TryCatchBlock>,
    /// Types named by `throw T(...)` expressions, in order of appearance.
    pub thrown_types: Vec<String>,
    pub may_throw: bool,
}

impl ExceptionProfile {
    /// Every caught type across all blocks, in order of appearance.
    pub fn caught_types(&self) -> impl Iterator<Item = &str> {
        self.try_catch_blocks
            .iter()
            .flat_map(|b| b.catch_clauses.iter())
            .map(|c| c.exception_type.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadInfo {
    pub thread_var_name: String,
    pub function_name: String,
    pub arguments: Vec<String>,
    pub detached: bool,
    pub joinable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockKind {
    LockGuard,
    UniqueLock,
    SharedLock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    #[serde(rename = "type")]
    pub kind: LockKind,
    pub lock_var_name: String,
    pub mutex_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicInfo {
    pub atomic_var_name: String,
    /// `None` when only operations were seen (a member declared elsewhere).
    pub value_type: Option<Type>,
    pub operations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionVariableInfo {
    pub cv_var_name: String,
    pub wait_conditions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionConcurrency {
    pub threads_created: Vec<ThreadInfo>,
    pub lock_scopes: Vec<LockInfo>,
    pub atomic_operations: Vec<AtomicInfo>,
    pub condition_variables: Vec<ConditionVariableInfo>,
    pub uses_threading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutexKind {
    Mutex,
    RecursiveMutex,
    SharedMutex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutexInfo {
    #[serde(rename = "type")]
    pub kind: MutexKind,
    pub mutex_var_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassConcurrency {
    pub mutexes: Vec<MutexInfo>,
    pub atomic_fields: Vec<AtomicInfo>,
    pub thread_safe: bool,
}

/// Parameter names split by how the generated signature should take them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterOwnership {
    pub moved: Vec<String>,
    pub borrowed: Vec<String>,
}
