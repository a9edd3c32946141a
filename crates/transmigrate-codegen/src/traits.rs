//! Traits for code generators.

use serde::Serialize;
use transmigrate_ir::{Diagnostic, Ir, Target};

/// Formatting hints passed through to a generator.
///
/// Only the generator choice itself is semantic. These options change
/// comments, stubs and test scaffolding, never the translated structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateOptions {
    /// Name of the input unit, used in the header comment.
    pub unit_name: String,
    /// Optimization level 0-3. Recorded in the header only.
    pub opt_level: u8,
    /// Keep bounds/overflow checks in emitted stubs.
    pub safety_checks: bool,
    /// Carry source bodies over as comments.
    pub preserve_comments: bool,
    /// Emit a test skeleton alongside the code.
    pub generate_tests: bool,
    /// Go package name.
    pub package: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            unit_name: "input".to_string(),
            opt_level: 2,
            safety_checks: true,
            preserve_comments: true,
            generate_tests: false,
            package: "main".to_string(),
        }
    }
}

/// Result of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Generated {
    pub code: String,
    /// Test skeleton, when requested.
    pub tests: Option<String>,
    /// Constructs that did not map cleanly.
    pub diagnostics: Vec<Diagnostic>,
}

/// A code generator for one target language.
///
/// # Implementing Custom Generators
///
/// ```ignore
/// use transmigrate_codegen::{Generator, GenerateOptions, Generated, register_generator};
///
/// struct Annotated;
///
/// impl Generator for Annotated {
///     fn target(&self) -> Target { Target::Rust }
///     fn language(&self) -> &'static str { "rust-annotated" }
///     fn extension(&self) -> &'static str { "rs" }
///     fn generate(&self, ir: &Ir, options: &GenerateOptions) -> Generated { /* ... */ }
/// }
///
/// // Register before first use
/// register_generator(&Annotated);
/// ```
pub trait Generator: Send + Sync {
    /// Target this generator emits.
    fn target(&self) -> Target;

    /// Language identifier (e.g., "rust", "go").
    fn language(&self) -> &'static str;

    /// File extension for generated code (e.g., "rs", "go").
    fn extension(&self) -> &'static str;

    /// Generate code for a fully analyzed IR.
    fn generate(&self, ir: &Ir, options: &GenerateOptions) -> Generated;
}
