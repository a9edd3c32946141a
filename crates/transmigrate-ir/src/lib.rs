//! Language-neutral intermediate representation for transmigrate.
//!
//! The IR holds the declarations a front-end extracted from one input unit
//! (classes, free functions, globals) together with a name-keyed type
//! registry. Analysis passes attach derived records to functions and
//! classes in place; generators only read it.
//!
//! # Architecture
//!
//! ```text
//! Front-end            IR                    Generators
//! ─────────────    ─────────────────    ──────────────────
//! declaration  ─┐   classes          ┌─> rust (ownership-aware)
//! records      ─┼─> functions ───────┤
//! (+ bodies)   ─┘   globals, types   └─> go   (garbage-collected)
//! ```
//!
//! Types are plain owned trees. Cross references to classes declared in the
//! same unit go through [`TypeId`]s handed out by the [`TypeRegistry`], so
//! no node is shared by reference.

pub mod decl;
pub mod diagnostic;
pub mod ir;
pub mod profile;
pub mod registry;
pub mod target;
pub mod types;

pub use decl::{AccessLevel, AccessSection, ClassDecl, Function, Parameter, Variable};
pub use diagnostic::{Diagnostic, Severity};
pub use ir::Ir;
pub use profile::{
    AtomicInfo, CatchClause, ClassConcurrency, ConditionVariableInfo, ExceptionProfile,
    ExceptionSpec, FunctionConcurrency, LockInfo, LockKind, MutexInfo, MutexKind,
    ParameterOwnership, ThreadInfo, TryCatchBlock,
};
pub use registry::{TypeId, TypeRegistry};
pub use target::{Target, UnknownTarget};
pub use types::{ContainerKind, SyncKind, Type, TypeKind};
