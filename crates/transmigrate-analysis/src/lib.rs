//! Semantic-pattern analysis for transmigrate.
//!
//! Everything here is lexical: type spellings and function bodies are
//! scanned as text, never parsed into a syntax tree.
//!
//! - [`mapper`]: source type spellings to [`Type`](transmigrate_ir::Type)
//!   trees and back out to target syntax.
//! - [`ownership`]: memory-ownership pattern of pointer-like types.
//! - [`exception`]: try/catch/throw idioms and the error-propagation
//!   strategy per target.
//! - [`concurrency`]: thread, lock, atomic and condition-variable idioms.
//! - [`pass`]: runs the analyzers over an [`Ir`](transmigrate_ir::Ir) in
//!   place.
//!
//! # Example
//!
//! ```
//! use transmigrate_analysis::{map_type, render_for_target};
//! use transmigrate_ir::Target;
//!
//! let ty = map_type("std::map<std::string, std::vector<int>>");
//! assert_eq!(
//!     render_for_target(&ty, Target::Go),
//!     "map[string][]int32"
//! );
//! ```

pub mod concurrency;
pub mod exception;
pub mod mapper;
pub mod ownership;
pub mod pass;
mod scan;

pub use exception::{ErrorRepr, ExceptionStrategy, select_strategy};
pub use mapper::{
    is_container_type, map_builtin_type, map_container_type, map_type, render_field_type,
    render_for_target, render_with_diagnostics, reverse_primitive,
};
pub use ownership::{OwnershipPattern, classify};
pub use pass::{AnalysisSummary, BodyScanner, LexicalScanner, analyze, analyze_with};
