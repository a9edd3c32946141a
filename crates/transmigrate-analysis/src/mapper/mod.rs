//! Source type spellings to [`Type`] trees, and [`Type`] trees to target
//! type syntax.
//!
//! Parsing is lexical: the mapper never consults a symbol table. Anything
//! that is not a known primitive, container, smart pointer or threading
//! type becomes an aggregate, which ingestion later links to the registry
//! with [`Ir::resolve_type`](transmigrate_ir::Ir::resolve_type).

mod builtin;
mod render;

pub use builtin::{
    PRIMITIVES, Primitive, canonical_spelling, lookup as lookup_primitive, map_builtin_type,
    reverse_primitive,
};
pub use render::{
    PLACEHOLDER_GO, PLACEHOLDER_RUST, render_field_type, render_for_target,
    render_with_diagnostics,
};

use crate::scan::{balanced_group, collapse_whitespace, split_top_level, template_bounds};
use transmigrate_ir::{ContainerKind, SyncKind, Type};

/// Container family names recognized by [`is_container_type`].
const CONTAINER_NAMES: &[&str] = &[
    "vector",
    "list",
    "deque",
    "map",
    "unordered_map",
    "set",
    "unordered_set",
    "string",
    "pair",
    "optional",
];

/// Permissive substring test: qualified (`std::vector<int>`) and bare
/// (`vector<int>`) spellings both match.
pub fn is_container_type(name: &str) -> bool {
    CONTAINER_NAMES.iter().any(|c| name.contains(c))
}

/// Strip a leading `std::` or `::` qualifier.
fn unqualified(name: &str) -> &str {
    let name = name.trim();
    name.strip_prefix("std::")
        .or_else(|| name.strip_prefix("::"))
        .unwrap_or(name)
}

/// Split a spelling into its outer name and, when present, the raw text
/// between the first `<` and the last `>`.
fn outer_and_args(spelling: &str) -> (&str, Option<&str>) {
    match template_bounds(spelling) {
        Some((start, end)) => (spelling[..start].trim(), Some(&spelling[start + 1..end])),
        None => (spelling.trim(), None),
    }
}

fn map_args(raw: Option<&str>) -> Vec<Type> {
    raw.map(split_top_level)
        .unwrap_or_default()
        .iter()
        .map(|arg| map_type(arg))
        .collect()
}

/// Parse a container spelling. Returns `None` when the outer name is not a
/// known container family.
///
/// Arguments are split on top-level commas only, so
/// `map<string, vector<pair<int,int>>>` yields two arguments. Missing
/// arguments are kept missing; renderers emit placeholders for them.
pub fn map_container_type(spelling: &str) -> Option<Type> {
    let spelling = collapse_whitespace(spelling);
    let (outer, args) = outer_and_args(&spelling);
    let kind = ContainerKind::from_source_name(unqualified(outer))?;
    Some(Type::container(kind, spelling.clone(), map_args(args)))
}

fn sync_kind(name: &str) -> Option<SyncKind> {
    let kind = match name {
        "thread" | "jthread" => SyncKind::Thread,
        "mutex" | "timed_mutex" => SyncKind::Mutex,
        "recursive_mutex" | "recursive_timed_mutex" => SyncKind::RecursiveMutex,
        "shared_mutex" | "shared_timed_mutex" => SyncKind::SharedMutex,
        "condition_variable" | "condition_variable_any" => SyncKind::ConditionVariable,
        "atomic" => SyncKind::Atomic,
        "lock_guard" | "scoped_lock" => SyncKind::LockGuard,
        "unique_lock" => SyncKind::UniqueLock,
        "shared_lock" => SyncKind::SharedLock,
        _ => return None,
    };
    Some(kind)
}

#[derive(Debug, Clone, Copy, Default)]
struct Qualifiers {
    /// `const T`: qualifies the innermost base type.
    leading: bool,
    /// `T const` / `T* const`: qualifies the outermost declarator.
    trailing: bool,
}

/// Strip leading and trailing `const`/`volatile` words.
fn strip_cv(spelling: &str) -> (&str, Qualifiers) {
    let mut rest = spelling.trim();
    let mut cv = Qualifiers::default();
    loop {
        if let Some(r) = rest.strip_prefix("const ") {
            rest = r.trim_start();
            cv.leading = true;
        } else if let Some(r) = rest.strip_prefix("volatile ") {
            rest = r.trim_start();
        } else if let Some(r) = rest.strip_suffix(" const") {
            rest = r.trim_end();
            cv.trailing = true;
        } else if let Some(r) = rest.strip_suffix(" volatile") {
            rest = r.trim_end();
        } else {
            return (rest, cv);
        }
    }
}

fn mark_const(ty: &mut Type) {
    ty.is_const = true;
    ty.is_mutable = false;
}

/// `std::function<R(A, B)>` argument text to a function type.
fn map_signature(spelling: &str, signature: &str) -> Type {
    let signature = signature.trim();
    match signature.find('(') {
        Some(open) => {
            let ret = map_type(&signature[..open]);
            let params = balanced_group(signature, open)
                .map(|(inner, _)| {
                    split_top_level(inner)
                        .iter()
                        .filter(|p| p.as_str() != "void")
                        .map(|p| map_type(p))
                        .collect()
                })
                .unwrap_or_default();
            Type::function(spelling, ret, params)
        }
        None => Type::function(spelling, Type::void(), Vec::new()),
    }
}

/// Map any source type spelling to a [`Type`]. Total: unknown names become
/// aggregates.
pub fn map_type(spelling: &str) -> Type {
    let spelling = collapse_whitespace(spelling);
    let (core, cv) = strip_cv(&spelling);
    if core.is_empty() {
        return Type::void();
    }
    let mut ty = map_declarator(core, cv.leading);
    if cv.trailing {
        mark_const(&mut ty);
    }
    ty
}

fn map_declarator(core: &str, base_const: bool) -> Type {
    // Rvalue references bind by value in both targets.
    if let Some(inner) = core.strip_suffix("&&") {
        return map_declarator(inner.trim_end(), base_const);
    }
    if let Some(inner) = core.strip_suffix('&') {
        let referent = map_declarator(inner.trim_end(), base_const);
        let is_const = referent.is_const;
        return Type::reference(referent, is_const);
    }
    if let Some(inner) = core.strip_suffix('*') {
        let (inner, cv) = strip_cv(inner);
        let mut pointee = map_declarator(inner, base_const || cv.leading);
        if cv.trailing {
            mark_const(&mut pointee);
        }
        return Type::raw_pointer(pointee);
    }
    if core.ends_with(']')
        && let Some(open) = core.rfind('[')
    {
        let len = core[open + 1..core.len() - 1].trim().parse().ok();
        return Type::array(map_declarator(core[..open].trim_end(), base_const), len);
    }

    let mut ty = map_base(core);
    if base_const {
        mark_const(&mut ty);
    }
    ty
}

fn map_base(core: &str) -> Type {
    let (outer, args) = outer_and_args(core);
    let bare = unqualified(outer);

    match bare {
        "unique_ptr" | "shared_ptr" | "weak_ptr" => {
            let pointee = args
                .map(split_top_level)
                .and_then(|a| a.first().map(|t| map_type(t)))
                .unwrap_or_else(Type::void);
            return Type::pointer(pointee, core);
        }
        "atomic" => {
            let value = args.map(map_type);
            return Type::sync(SyncKind::Atomic, core, value);
        }
        "function" => return map_signature(core, args.unwrap_or_default()),
        "array" if args.is_some() => {
            let parts = args.map(split_top_level).unwrap_or_default();
            let element = parts.first().map_or_else(Type::void, |t| map_type(t));
            let len = parts.get(1).and_then(|n| n.trim().parse().ok());
            return Type::array(element, len);
        }
        _ => {}
    }

    if let Some(kind) = sync_kind(bare) {
        return Type::sync(kind, core, None);
    }
    if let Some(container) = map_container_type(core) {
        return container;
    }
    if args.is_none()
        && let Some(prim) = map_builtin_type(core)
    {
        return prim;
    }

    let mut aggregate = Type::aggregate(outer);
    aggregate.template_args = map_args(args);
    aggregate
}
