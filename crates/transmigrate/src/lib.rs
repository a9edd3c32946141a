//! Source-to-source translation of C++ declarations into Rust or Go.
//!
//! A unit flows through four stages:
//!
//! ```text
//! declaration records ─> Frontend ─> Ir ─> analyze ─> Generator ─> code + diagnostics
//!     (JSON)           (frontend.rs)    (transmigrate-analysis) (transmigrate-codegen)
//! ```
//!
//! The output is a structurally faithful draft with stub bodies, plus the
//! diagnostics for constructs that did not map cleanly.
//!
//! # Example
//!
//! ```
//! use transmigrate::{TranspileSettings, Transpiler};
//! use transmigrate_ir::Target;
//!
//! let transpiler = Transpiler::new(TranspileSettings {
//!     target: Target::Go,
//!     ..TranspileSettings::default()
//! });
//! let unit = transpiler
//!     .transpile_source(
//!         "point.json",
//!         r#"{ "classes": [ { "name": "Point", "is_struct": true,
//!                             "fields": [ { "name": "x", "type": "int" } ] } ] }"#,
//!     )
//!     .unwrap();
//! assert!(unit.code.contains("type Point struct {\n\tX int32\n}"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod frontend;
pub mod pipeline;

pub use config::TransmigrateConfig;
pub use error::{BatchError, ConfigError, IngestError, TranspileError};
pub use frontend::{DeclarationFrontend, Frontend};
pub use pipeline::{Manifest, TranspileSettings, Transpiled, Transpiler};
