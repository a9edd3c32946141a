//! Analysis pass driver.
//!
//! The body scans are behind [`BodyScanner`] so that a structured front-end
//! can supply pre-parsed idiom records instead of raw text. Whatever the
//! scanner, the driver writes the same profile records into the IR.

use crate::{concurrency, exception, ownership};
use transmigrate_ir::{ExceptionProfile, Function, FunctionConcurrency, Ir};

/// Produces per-function idiom profiles.
pub trait BodyScanner {
    fn exception_profile(&self, function: &Function) -> ExceptionProfile;
    fn concurrency_profile(&self, function: &Function) -> FunctionConcurrency;
}

/// Regex-level scanning of the raw body text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalScanner;

impl BodyScanner for LexicalScanner {
    fn exception_profile(&self, function: &Function) -> ExceptionProfile {
        exception::analyze(&function.body, function.is_noexcept)
    }

    fn concurrency_profile(&self, function: &Function) -> FunctionConcurrency {
        concurrency::analyze_body(&function.body)
    }
}

/// Counts reported by one analysis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisSummary {
    pub functions: usize,
    pub throwing: usize,
    pub threaded: usize,
    pub thread_safe_classes: usize,
}

/// Run every pass with the [`LexicalScanner`].
pub fn analyze(ir: &mut Ir) -> AnalysisSummary {
    analyze_with(ir, &LexicalScanner)
}

/// Annotate every free function, method and class in place.
///
/// Declarations are never added or removed.
#[tracing::instrument(level = "debug", skip_all, fields(
    classes = ir.classes().len(),
    functions = ir.functions().len(),
))]
pub fn analyze_with(ir: &mut Ir, scanner: &dyn BodyScanner) -> AnalysisSummary {
    let mut summary = AnalysisSummary::default();

    for function in ir.functions_mut() {
        annotate_function(function, scanner, &mut summary);
    }
    for class in ir.classes_mut() {
        for method in &mut class.methods {
            annotate_function(method, scanner, &mut summary);
        }
        class.concurrency = concurrency::analyze_class(class);
        if class.concurrency.thread_safe {
            summary.thread_safe_classes += 1;
        }
    }

    tracing::debug!(?summary, "analysis complete");
    summary
}

fn annotate_function(
    function: &mut Function,
    scanner: &dyn BodyScanner,
    summary: &mut AnalysisSummary,
) {
    function.exception = scanner.exception_profile(function);
    function.concurrency = scanner.concurrency_profile(function);
    function.ownership = ownership::analyze_parameters(&function.parameters);

    summary.functions += 1;
    if function.exception.may_throw {
        summary.throwing += 1;
    }
    if function.concurrency.uses_threading {
        summary.threaded += 1;
    }
    tracing::trace!(
        function = %function.name,
        may_throw = function.exception.may_throw,
        uses_threading = function.concurrency.uses_threading,
        "annotated"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::map_type;
    use transmigrate_ir::{ClassDecl, Parameter, ThreadInfo, Variable};

    #[test]
    fn test_analyze_annotates_functions_and_methods() {
        let mut ir = Ir::new();
        let mut class = ClassDecl::new("Counter");
        class.fields.push(Variable::new("mtx", map_type("std::mutex")));
        class.methods.push(
            Function::new("bump").with_body("std::lock_guard<std::mutex> g(mtx); ++n;"),
        );
        ir.add_class(class);
        ir.add_function(
            Function::new("parse")
                .with_param(Parameter::new("text", map_type("const std::string&")))
                .with_body("if (text.empty()) throw std::invalid_argument(\"empty\");"),
        );

        let summary = analyze(&mut ir);
        assert_eq!(
            summary,
            AnalysisSummary {
                functions: 2,
                throwing: 1,
                threaded: 1,
                thread_safe_classes: 1,
            }
        );

        let parse = &ir.functions()[0];
        assert!(parse.exception.may_throw);
        assert_eq!(parse.ownership.borrowed, vec!["text"]);

        let counter = &ir.classes()[0];
        assert!(counter.concurrency.thread_safe);
        assert_eq!(counter.methods[0].concurrency.lock_scopes.len(), 1);
    }

    struct Canned;

    impl BodyScanner for Canned {
        fn exception_profile(&self, _: &Function) -> ExceptionProfile {
            ExceptionProfile {
                may_throw: true,
                ..ExceptionProfile::default()
            }
        }

        fn concurrency_profile(&self, function: &Function) -> FunctionConcurrency {
            FunctionConcurrency {
                threads_created: vec![ThreadInfo {
                    thread_var_name: format!("{}_worker", function.name),
                    function_name: "run".into(),
                    arguments: Vec::new(),
                    detached: false,
                    joinable: true,
                }],
                uses_threading: true,
                ..FunctionConcurrency::default()
            }
        }
    }

    #[test]
    fn test_custom_scanner_replaces_lexical_scan() {
        let mut ir = Ir::new();
        ir.add_function(Function::new("main").with_body("return 0;"));
        let summary = analyze_with(&mut ir, &Canned);
        assert_eq!(summary.throwing, 1);
        let main = &ir.functions()[0];
        assert_eq!(main.concurrency.threads_created[0].thread_var_name, "main_worker");
    }

    #[test]
    fn test_analysis_is_repeatable() {
        let mut ir = Ir::new();
        ir.add_function(Function::new("f").with_body("std::atomic<int> n; n.load();"));
        analyze(&mut ir);
        let first = ir.functions()[0].clone();
        analyze(&mut ir);
        assert_eq!(ir.functions()[0], first);
    }
}
