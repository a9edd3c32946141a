//! Helpers shared by the generators.

use crate::naming::{pascal_case, placeholder_name, snake_case};
use std::collections::HashMap;
use transmigrate_analysis::{concurrency, exception};
use transmigrate_ir::{ClassDecl, Diagnostic, Function, Ir, MutexKind, Target};

/// Give repeated names numeric suffixes so overloads stay distinct. The
/// first occurrence keeps its name; later ones get `format(name, n)` with
/// n starting at 2.
pub(crate) fn disambiguate(
    names: impl IntoIterator<Item = String>,
    format: impl Fn(&str, usize) -> String,
) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                name
            } else {
                format(&name, *count)
            }
        })
        .collect()
}

/// Non-empty, trimmed source lines of a body.
pub(crate) fn body_lines(body: &str) -> impl Iterator<Item = &str> {
    body.lines().map(str::trim).filter(|l| !l.is_empty())
}

/// One-line target idioms for everything the analyzers found in a body.
pub(crate) fn idiom_hints(function: &Function, target: Target) -> Vec<String> {
    let mut hints = Vec::new();
    let profile = &function.concurrency;

    for thread in &profile.threads_created {
        hints.push(concurrency::thread_hint(thread, target));
    }
    for lock in &profile.lock_scopes {
        hints.push(concurrency::lock_hint(lock, target));
    }
    for atomic in &profile.atomic_operations {
        let mut ops: Vec<&str> = Vec::new();
        for op in &atomic.operations {
            if !ops.contains(&op.as_str()) {
                ops.push(op);
            }
        }
        for op in ops {
            hints.push(concurrency::atomic_hint(&atomic.atomic_var_name, op, target));
        }
    }
    for cv in &profile.condition_variables {
        let mut ops: Vec<&str> = Vec::new();
        for op in &cv.wait_conditions {
            if !ops.contains(&op.as_str()) {
                ops.push(op);
            }
        }
        for op in ops {
            hints.push(concurrency::condvar_hint(&cv.cv_var_name, op, target));
        }
    }

    for block in &function.exception.try_catch_blocks {
        for clause in &block.catch_clauses {
            hints.push(format!(
                "handles {}: {}",
                clause.exception_type,
                exception::describe(&clause.exception_type)
            ));
        }
    }
    for thrown in &function.exception.thrown_types {
        hints.push(format!("raises {thrown}: {}", exception::describe(thrown)));
    }
    hints
}

/// Warn about every function whose name is not an identifier, such as an
/// operator overload. The writers emit it under a placeholder name.
pub(crate) fn placeholder_warnings(ir: &Ir, target: Target) -> Vec<Diagnostic> {
    let methods = ir.classes().iter().flat_map(|class| {
        class
            .methods
            .iter()
            .filter(|m| !m.is_constructor && !m.is_destructor)
            .map(move |m| (format!("{}::{}", class.name, m.name), m))
    });
    ir.functions()
        .iter()
        .map(|f| (f.name.clone(), f))
        .chain(methods)
        .filter(|(_, f)| placeholder_name(&f.name) != f.name.as_str())
        .map(|(subject, f)| {
            let emitted = match target {
                Target::Rust => snake_case(&f.name),
                Target::Go => pascal_case(&f.name),
            };
            Diagnostic::warning(
                subject,
                format!("`{}` has no {target} spelling; emitted as `{emitted}`", f.name),
            )
        })
        .collect()
}

/// Summary of a class's synchronized members. `None` when it has none.
pub(crate) fn thread_safety(class: &ClassDecl) -> Option<String> {
    let profile = &class.concurrency;
    if !profile.thread_safe {
        return None;
    }
    let mut parts = Vec::new();
    if !profile.mutexes.is_empty() {
        let mutexes: Vec<String> = profile
            .mutexes
            .iter()
            .map(|m| {
                let kind = match m.kind {
                    MutexKind::Mutex => "mutex",
                    MutexKind::RecursiveMutex => "recursive mutex",
                    MutexKind::SharedMutex => "shared mutex",
                };
                format!("`{}` ({kind})", m.mutex_var_name)
            })
            .collect();
        parts.push(format!("guarded by {}", mutexes.join(", ")));
    }
    if !profile.atomic_fields.is_empty() {
        let atomics: Vec<String> = profile
            .atomic_fields
            .iter()
            .map(|a| format!("`{}`", a.atomic_var_name))
            .collect();
        parts.push(format!("atomic {}", atomics.join(", ")));
    }
    Some(parts.join("; "))
}

/// Parameter ownership as body comments. Rust signatures already show
/// borrows, so only moves are listed there.
pub(crate) fn ownership_notes(function: &Function, target: Target) -> Vec<String> {
    let ownership = &function.ownership;
    let mut notes = Vec::new();
    if !ownership.moved.is_empty() {
        notes.push(format!("takes ownership of: {}", ownership.moved.join(", ")));
    }
    if target == Target::Go && !ownership.borrowed.is_empty() {
        notes.push(format!("borrows: {}", ownership.borrowed.join(", ")));
    }
    notes
}

/// Abstract classes this class implements, with the method names it
/// overrides from each.
pub(crate) fn implemented_interfaces<'ir>(
    ir: &'ir Ir,
    class: &ClassDecl,
) -> Vec<(&'ir ClassDecl, Vec<&'ir str>)> {
    class
        .base_classes
        .iter()
        .filter_map(|base| ir.find_class(base))
        .filter(|base| base.is_abstract())
        .map(|base| {
            let methods = base
                .methods
                .iter()
                .filter(|m| m.is_pure_virtual)
                .map(|m| m.name.as_str())
                .collect();
            (base, methods)
        })
        .collect()
}

/// Bases that carry state and are embedded as fields.
pub(crate) fn embedded_bases<'c>(ir: &Ir, class: &'c ClassDecl) -> Vec<&'c str> {
    class
        .base_classes
        .iter()
        .filter(|base| !ir.find_class(base).is_some_and(ClassDecl::is_abstract))
        .map(String::as_str)
        .collect()
}
