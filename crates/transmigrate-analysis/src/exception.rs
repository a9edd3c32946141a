//! Exception idioms and their error-propagation strategies.

use crate::scan::collapse_whitespace;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use transmigrate_ir::{CatchClause, ExceptionProfile, ExceptionSpec, Function, Target, TryCatchBlock};

static TRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\btry\s*\{([^}]*)\}").expect("valid try regex"));

/// Anchored: matched against the text right after a `try` block or a
/// previous handler.
static CATCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*catch\s*\(([^)]+)\)\s*\{([^}]*)\}").expect("valid catch regex")
});

static THROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bthrow\s+").expect("valid throw regex"));

static THROWN_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bthrow\s+(?:std::|::)?([A-Za-z_][\w:]*)\s*[({]").expect("valid thrown type regex")
});

static CV_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:const|volatile)\b").expect("valid qualifier regex"));

/// Profile one body. `is_noexcept` is the declaration-level flag; it forces
/// `can_throw` off but does not hide try/catch blocks.
pub fn analyze(body: &str, is_noexcept: bool) -> ExceptionProfile {
    let try_catch_blocks = detect_try_catch(body);
    let throws_in_body = THROW.is_match(body);
    let can_throw = throws_in_body && !is_noexcept;

    let mut thrown_types: Vec<String> = Vec::new();
    for caps in THROWN_TYPE.captures_iter(body) {
        let name = caps[1].to_string();
        if !thrown_types.contains(&name) {
            thrown_types.push(name);
        }
    }

    let may_throw = can_throw
        || !try_catch_blocks.is_empty()
        || throws_in_body
        || body.contains("throw ");

    ExceptionProfile {
        exception_spec: ExceptionSpec {
            is_noexcept,
            can_throw,
        },
        try_catch_blocks,
        thrown_types,
        may_throw,
    }
}

fn detect_try_catch(body: &str) -> Vec<TryCatchBlock> {
    let mut blocks = Vec::new();
    let mut pos = 0;
    while let Some(caps) = TRY.captures(&body[pos..]) {
        let Some(whole) = caps.get(0) else { break };
        let mut block = TryCatchBlock {
            try_body: caps[1].to_string(),
            catch_clauses: Vec::new(),
        };
        let mut end = pos + whole.end();

        while let Some(handler) = CATCH.captures(&body[end..]) {
            let (exception_type, exception_var) = parse_catch_parameter(&handler[1]);
            block.catch_clauses.push(CatchClause {
                exception_type,
                exception_var,
                handler_body: handler[2].to_string(),
            });
            end += handler.get(0).map_or(0, |m| m.end());
        }

        if !block.catch_clauses.is_empty() {
            blocks.push(block);
        }
        pos = end;
    }
    blocks
}

/// Split a catch parameter into `(type, variable)`.
///
/// `...` is the catch-all and has no variable. Qualifiers and `&` are
/// dropped, a leading `std::` is stripped, and a parameter without a name
/// gets the variable `e`.
pub fn parse_catch_parameter(param: &str) -> (String, String) {
    let param = param.trim();
    if param == "..." {
        return ("...".to_string(), String::new());
    }
    let cleaned = CV_WORD.replace_all(param, " ").replace('&', " ");
    let cleaned = collapse_whitespace(&cleaned);
    let cleaned = unqualified(&cleaned);

    match cleaned.rsplit_once(' ') {
        Some((ty, var)) => (ty.trim().to_string(), var.trim().to_string()),
        None => (cleaned.to_string(), "e".to_string()),
    }
}

fn unqualified(name: &str) -> &str {
    name.strip_prefix("std::")
        .or_else(|| name.strip_prefix("::"))
        .unwrap_or(name)
}

/// Target-side error-propagation idiom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionStrategy {
    /// `Result<T, E>`.
    ResultType,
    /// `(T, error)`.
    ErrorReturn,
    /// Abort; used where the target cannot propagate (Rust `Drop`).
    Panic,
    /// Nothing to convert.
    Ignore,
}

/// Pick the strategy for an analyzed function.
///
/// A noexcept function with try/catch is routed like any throwing
/// function: its handlers still need a target error idiom.
pub fn select_strategy(function: &Function, target: Target) -> ExceptionStrategy {
    let profile = &function.exception;
    if !profile.may_throw && profile.try_catch_blocks.is_empty() {
        return ExceptionStrategy::Ignore;
    }
    match target {
        Target::Rust => ExceptionStrategy::ResultType,
        Target::Go => ExceptionStrategy::ErrorReturn,
    }
}

/// Human-readable description of an exception type.
pub fn describe(exception_type: &str) -> String {
    let description = match unqualified(exception_type.trim()) {
        "exception" => "Standard exception",
        "runtime_error" => "Runtime error",
        "logic_error" => "Logic error",
        "invalid_argument" => "Invalid argument",
        "out_of_range" => "Out of range",
        "overflow_error" => "Overflow error",
        "underflow_error" => "Underflow error",
        "range_error" => "Range error",
        "bad_alloc" => "Memory allocation failed",
        "bad_cast" => "Bad cast",
        "bad_typeid" => "Bad typeid",
        "ios_base::failure" => "I/O error",
        "..." => "Unknown error",
        _ => return format!("Error: {exception_type}"),
    };
    description.to_string()
}

/// How an exception type is carried in the Rust target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorRepr {
    /// A standard exception category: `Box<dyn std::error::Error>`.
    Boxed,
    /// `std::io::Error`.
    Io,
    /// Custom exception types carry their message as a `String`.
    Message,
}

pub fn error_repr(exception_type: &str) -> ErrorRepr {
    match unqualified(exception_type.trim()) {
        "ios_base::failure" => ErrorRepr::Io,
        "exception" | "runtime_error" | "logic_error" | "invalid_argument" | "out_of_range"
        | "overflow_error" | "underflow_error" | "range_error" | "bad_alloc" | "bad_cast"
        | "bad_typeid" | "..." => ErrorRepr::Boxed,
        _ => ErrorRepr::Message,
    }
}

pub fn render_error(repr: ErrorRepr, target: Target) -> &'static str {
    match (target, repr) {
        (Target::Go, _) => "error",
        (Target::Rust, ErrorRepr::Boxed) => "Box<dyn std::error::Error>",
        (Target::Rust, ErrorRepr::Io) => "std::io::Error",
        (Target::Rust, ErrorRepr::Message) => "String",
    }
}

/// The error type a converted function propagates: the shared
/// representation of everything it throws, boxed when mixed or unknown.
pub fn error_type_for(profile: &ExceptionProfile, target: Target) -> &'static str {
    let mut reprs = profile.thrown_types.iter().map(|t| error_repr(t));
    let repr = match reprs.next() {
        Some(first) if reprs.all(|r| r == first) => first,
        _ => ErrorRepr::Boxed,
    };
    render_error(repr, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn analyzed(body: &str) -> Function {
        let mut function = Function::new("f").with_body(body);
        function.exception = analyze(body, false);
        function
    }

    #[test]
    fn test_runtime_error_scenario() {
        let f = analyzed("try { g(); } catch (const std::runtime_error& e) { h(); }");
        let profile = &f.exception;
        assert_eq!(profile.try_catch_blocks.len(), 1);
        assert_eq!(
            profile.try_catch_blocks[0].catch_clauses,
            vec![CatchClause {
                exception_type: "runtime_error".into(),
                exception_var: "e".into(),
                handler_body: " h(); ".into(),
            }]
        );
        assert_eq!(profile.try_catch_blocks[0].try_body, " g(); ");
        assert!(profile.may_throw);
        assert!(!profile.exception_spec.can_throw);
        assert_eq!(select_strategy(&f, Target::Rust), ExceptionStrategy::ResultType);
        assert_eq!(select_strategy(&f, Target::Go), ExceptionStrategy::ErrorReturn);
    }

    #[test]
    fn test_chained_handlers_share_a_block() {
        let body = "try { open(); } catch (const std::ios_base::failure& err) { log(); } \
                    catch (...) { abort(); } try { x(); } catch (Oops o) {}";
        let blocks = analyze(body, false).try_catch_blocks;
        assert_eq!(blocks.len(), 2);
        let types: Vec<_> = blocks[0]
            .catch_clauses
            .iter()
            .map(|c| (c.exception_type.as_str(), c.exception_var.as_str()))
            .collect();
        assert_eq!(types, vec![("ios_base::failure", "err"), ("...", "")]);
        assert_eq!(blocks[1].catch_clauses[0].exception_type, "Oops");
    }

    #[test]
    fn test_try_without_catch_is_not_a_block() {
        assert!(analyze("try { g(); } h();", false).try_catch_blocks.is_empty());
    }

    #[test]
    fn test_parse_catch_parameter() {
        assert_eq!(parse_catch_parameter("..."), ("...".into(), "".into()));
        assert_eq!(
            parse_catch_parameter("const std::exception &ex"),
            ("exception".into(), "ex".into())
        );
        assert_eq!(
            parse_catch_parameter("std::bad_alloc&"),
            ("bad_alloc".into(), "e".into())
        );
        assert_eq!(
            parse_catch_parameter("const app::ConstraintError& err"),
            ("app::ConstraintError".into(), "err".into())
        );
    }

    #[test]
    fn test_throw_detection() {
        let profile = analyze("if (x < 0) throw std::invalid_argument(\"neg\");", false);
        assert!(profile.exception_spec.can_throw);
        assert!(profile.may_throw);
        assert_eq!(profile.thrown_types, vec!["invalid_argument"]);
    }

    #[test]
    fn test_noexcept_forces_can_throw_off() {
        let profile = analyze("throw Fatal{};", true);
        assert!(profile.exception_spec.is_noexcept);
        assert!(!profile.exception_spec.can_throw);
        assert!(profile.may_throw);
        assert_eq!(profile.thrown_types, vec!["Fatal"]);
    }

    #[test]
    fn test_noexcept_with_try_catch_still_converted() {
        let body = "try { g(); } catch (...) {}";
        let mut f = Function::new("f").with_body(body);
        f.is_noexcept = true;
        f.exception = analyze(body, true);
        assert_eq!(select_strategy(&f, Target::Rust), ExceptionStrategy::ResultType);
        assert_eq!(select_strategy(&f, Target::Go), ExceptionStrategy::ErrorReturn);
    }

    #[test]
    fn test_may_throw_false_implies_clean_body() {
        let bodies = [
            "return 1;",
            "int throwaway = 2;",
            "try { a(); } catch (...) { }",
            "throw\tx;",
            "nothrow_call();",
        ];
        for body in bodies {
            for noexcept in [false, true] {
                let profile = analyze(body, noexcept);
                if !profile.may_throw {
                    assert!(profile.try_catch_blocks.is_empty(), "{body}");
                    assert!(!THROW.is_match(body), "{body}");
                    assert!(!body.contains("throw "), "{body}");
                }
            }
        }
    }

    #[test]
    fn test_strategy_is_determined_by_profile_shape() {
        let clean = analyzed("return 0;");
        assert_eq!(select_strategy(&clean, Target::Rust), ExceptionStrategy::Ignore);
        assert_eq!(select_strategy(&clean, Target::Go), ExceptionStrategy::Ignore);

        let a = analyzed("throw std::runtime_error(\"a\");");
        let b = analyzed("if (bad) { throw Oops(); }");
        for target in Target::ALL {
            assert_eq!(select_strategy(&a, target), select_strategy(&b, target));
        }
    }

    #[test]
    fn test_describe_table() {
        assert_eq!(describe("std::runtime_error"), "Runtime error");
        assert_eq!(describe("bad_alloc"), "Memory allocation failed");
        assert_eq!(describe("std::ios_base::failure"), "I/O error");
        assert_eq!(describe("..."), "Unknown error");
        assert_eq!(describe("ParseError"), "Error: ParseError");
    }

    #[test]
    fn test_error_representation() {
        assert_eq!(error_repr("runtime_error"), ErrorRepr::Boxed);
        assert_eq!(error_repr("std::ios_base::failure"), ErrorRepr::Io);
        assert_eq!(error_repr("ParseError"), ErrorRepr::Message);
        assert_eq!(render_error(ErrorRepr::Message, Target::Go), "error");

        let custom = analyze("throw ParseError(\"x\"); throw ParseError(\"y\");", false);
        assert_eq!(error_type_for(&custom, Target::Rust), "String");

        let mixed = analyze("throw ParseError(\"x\"); throw std::out_of_range(\"y\");", false);
        assert_eq!(error_type_for(&mixed, Target::Rust), "Box<dyn std::error::Error>");

        let none = analyze("try { a(); } catch (...) {}", false);
        assert_eq!(error_type_for(&none, Target::Rust), "Box<dyn std::error::Error>");
        assert_eq!(error_type_for(&none, Target::Go), "error");
    }
}
