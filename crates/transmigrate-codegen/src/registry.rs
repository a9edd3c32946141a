//! Registry for code generators.

use crate::traits::Generator;
use std::sync::{OnceLock, RwLock};
use transmigrate_ir::Target;

/// Global registry of generators.
static GENERATORS: RwLock<Vec<&'static dyn Generator>> = RwLock::new(Vec::new());
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom generator.
///
/// Built-in generators are registered automatically on first use and are
/// found first by [`generator_for_target`].
pub fn register_generator(generator: &'static dyn Generator) {
    init_builtin();
    GENERATORS.write().unwrap().push(generator);
}

/// Initialize built-in generators (called automatically on first use).
fn init_builtin() {
    INITIALIZED.get_or_init(|| {
        let mut generators = GENERATORS.write().unwrap();

        #[cfg(feature = "backend-rust")]
        {
            generators.push(&crate::output::rust::RUST_GENERATOR);
        }

        #[cfg(feature = "backend-go")]
        {
            generators.push(&crate::output::go::GO_GENERATOR);
        }
    });
}

/// Get the first generator for a target.
pub fn generator_for_target(target: Target) -> Option<&'static dyn Generator> {
    init_builtin();
    GENERATORS
        .read()
        .unwrap()
        .iter()
        .find(|g| g.target() == target)
        .copied()
}

/// Get a generator by language identifier.
pub fn generator_for_language(language: &str) -> Option<&'static dyn Generator> {
    init_builtin();
    GENERATORS
        .read()
        .unwrap()
        .iter()
        .find(|g| g.language() == language)
        .copied()
}

/// List all registered generators.
pub fn generators() -> Vec<&'static dyn Generator> {
    init_builtin();
    GENERATORS.read().unwrap().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{GenerateOptions, Generated};
    use transmigrate_ir::Ir;

    #[test]
    fn test_builtin_lookup() {
        #[cfg(feature = "backend-rust")]
        {
            let rust = generator_for_target(Target::Rust).unwrap();
            assert_eq!(rust.language(), "rust");
            assert_eq!(rust.extension(), "rs");
        }
        #[cfg(feature = "backend-go")]
        {
            let go = generator_for_language("go").unwrap();
            assert_eq!(go.target(), Target::Go);
        }
    }

    struct Stub;

    impl Generator for Stub {
        fn target(&self) -> Target {
            Target::Go
        }
        fn language(&self) -> &'static str {
            "go-stub"
        }
        fn extension(&self) -> &'static str {
            "go"
        }
        fn generate(&self, _: &Ir, _: &GenerateOptions) -> Generated {
            Generated {
                code: "package stub\n".into(),
                ..Generated::default()
            }
        }
    }

    static STUB: Stub = Stub;

    #[test]
    fn test_register_custom_generator() {
        register_generator(&STUB);
        let found = generator_for_language("go-stub").unwrap();
        let out = found.generate(&Ir::new(), &GenerateOptions::default());
        assert_eq!(out.code, "package stub\n");
        assert!(generators().iter().any(|g| g.language() == "go-stub"));
    }
}
