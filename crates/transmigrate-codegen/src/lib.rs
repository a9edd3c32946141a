//! Rust and Go code generation from the transmigrate IR.
//!
//! Generators take an IR that has already been through
//! [`transmigrate_analysis::analyze`] and emit one source file per unit,
//! plus the diagnostics for constructs that did not map cleanly.
//!
//! # Architecture
//!
//! ```text
//! Analyzed IR          Generators           Output
//! ───────────     ─────────────────────     ─────────────────────
//!              ┌─> RustGenerator ────────> .rs  (+ #[cfg(test)] skeleton)
//! Ir ──────────┤
//!              └─> GoGenerator ──────────> .go  (+ _test.go skeleton)
//! ```
//!
//! # Example
//!
//! ```
//! use transmigrate_analysis::{analyze, map_type};
//! use transmigrate_codegen::{GenerateOptions, generator_for_target};
//! use transmigrate_ir::{Function, Ir, Parameter, Target};
//!
//! let mut ir = Ir::new();
//! ir.add_function(
//!     Function::new("scale")
//!         .with_param(Parameter::new("factor", map_type("double")))
//!         .with_return(map_type("double")),
//! );
//! analyze(&mut ir);
//!
//! let rust = generator_for_target(Target::Rust).unwrap();
//! let out = rust.generate(&ir, &GenerateOptions::default());
//! assert!(out.code.contains("pub fn scale(factor: f64) -> f64 {"));
//! ```
//!
//! # Feature Flags
//!
//! Generator flags (use `backend-*` prefix):
//! - `backend-rust` - Rust structs, traits and impls
//! - `backend-go` - Go structs, interfaces and methods
//!
//! Language umbrella flags:
//! - `rust` - backend-rust
//! - `go` - backend-go

pub mod naming;
pub mod output;
pub mod registry;
pub mod traits;

pub use registry::{generator_for_language, generator_for_target, generators, register_generator};
pub use traits::{GenerateOptions, Generated, Generator};
