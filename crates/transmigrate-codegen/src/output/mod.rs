//! Output generators.
//!
//! Each generator takes an analyzed [`Ir`](transmigrate_ir::Ir) and produces
//! source for one target. All generators implement the
//! [`Generator`](crate::traits::Generator) trait for uniform access via the
//! registry.

#[cfg(any(feature = "backend-rust", feature = "backend-go"))]
mod common;

// Rust
#[cfg(feature = "backend-rust")]
pub mod rust;

#[cfg(feature = "backend-rust")]
pub use rust::{RustGenerator, RustWriter, generate_rust};

// Go
#[cfg(feature = "backend-go")]
pub mod go;

#[cfg(feature = "backend-go")]
pub use go::{GoGenerator, GoWriter, generate_go};
