//! Memory-ownership patterns of pointer-like types.
//!
//! The Rust target keeps five distinct idioms for the five non-value
//! patterns. Go has a single reference idiom, so every non-value pattern
//! renders as `*T` there and the distinction is lost.

use serde::Serialize;
use transmigrate_ir::{Parameter, ParameterOwnership, Target, Type, TypeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipPattern {
    UniqueOwnership,
    SharedOwnership,
    BorrowedReference,
    MutableBorrow,
    RawPointer,
    ValueSemantics,
}

impl OwnershipPattern {
    pub fn is_borrow(self) -> bool {
        matches!(
            self,
            OwnershipPattern::BorrowedReference | OwnershipPattern::MutableBorrow
        )
    }

    pub fn transfers_ownership(self) -> bool {
        matches!(
            self,
            OwnershipPattern::UniqueOwnership | OwnershipPattern::SharedOwnership
        )
    }
}

pub fn classify(ty: &Type) -> OwnershipPattern {
    match ty.kind {
        TypeKind::Pointer if ty.name.contains("unique_ptr") => OwnershipPattern::UniqueOwnership,
        TypeKind::Pointer if ty.name.contains("shared_ptr") => OwnershipPattern::SharedOwnership,
        TypeKind::Pointer => OwnershipPattern::RawPointer,
        TypeKind::Reference if ty.is_const => OwnershipPattern::BorrowedReference,
        TypeKind::Reference => OwnershipPattern::MutableBorrow,
        _ => OwnershipPattern::ValueSemantics,
    }
}

/// Wrap an already rendered inner type in the target's idiom for `pattern`.
pub fn render(pattern: OwnershipPattern, inner: &str, target: Target) -> String {
    render_borrow(pattern, inner, target, None)
}

/// Like [`render`], but Rust borrows carry a named lifetime. Used for
/// struct fields, where elided lifetimes are not allowed.
pub fn render_with_lifetime(
    pattern: OwnershipPattern,
    inner: &str,
    target: Target,
    lifetime: &str,
) -> String {
    render_borrow(pattern, inner, target, Some(lifetime))
}

fn render_borrow(
    pattern: OwnershipPattern,
    inner: &str,
    target: Target,
    lifetime: Option<&str>,
) -> String {
    match target {
        Target::Rust => {
            let lt = lifetime.map(|l| format!("'{l} ")).unwrap_or_default();
            match pattern {
                OwnershipPattern::UniqueOwnership => format!("Box<{inner}>"),
                OwnershipPattern::SharedOwnership => {
                    format!("std::rc::Rc<std::cell::RefCell<{inner}>>")
                }
                OwnershipPattern::BorrowedReference => format!("&{lt}{inner}"),
                OwnershipPattern::MutableBorrow => format!("&{lt}mut {inner}"),
                OwnershipPattern::RawPointer => format!("*mut {inner}"),
                OwnershipPattern::ValueSemantics => inner.to_string(),
            }
        }
        Target::Go => match pattern {
            OwnershipPattern::ValueSemantics => inner.to_string(),
            _ => format!("*{inner}"),
        },
    }
}

/// True for by-value kinds whose copy is not a plain bit copy in the Rust
/// target.
fn is_move_only(ty: &Type) -> bool {
    matches!(
        ty.kind,
        TypeKind::Aggregate
            | TypeKind::Container(_)
            | TypeKind::Function
            | TypeKind::Sync(_)
            | TypeKind::Array
    )
}

/// Split parameters into those the generated signature takes by value
/// (moved) and those it takes by reference (borrowed). Primitives by value
/// and raw pointers are in neither list.
pub fn analyze_parameters(params: &[Parameter]) -> ParameterOwnership {
    let mut ownership = ParameterOwnership::default();
    for param in params {
        let pattern = classify(&param.ty);
        if pattern.transfers_ownership()
            || (pattern == OwnershipPattern::ValueSemantics && is_move_only(&param.ty))
        {
            ownership.moved.push(param.name.clone());
        } else if pattern.is_borrow() {
            ownership.borrowed.push(param.name.clone());
        }
    }
    ownership
}
