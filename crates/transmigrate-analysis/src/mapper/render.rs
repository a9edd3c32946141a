//! [`Type`] trees to target type syntax.

use super::builtin;
use crate::concurrency::{render_primitive, unmapped_reason};
use crate::ownership::{self, OwnershipPattern};
use transmigrate_ir::{ContainerKind, Diagnostic, SyncKind, Target, Type, TypeKind};

/// Stand-in for a missing template argument in Rust output.
pub const PLACEHOLDER_RUST: &str = "/* unknown */ ()";
/// Stand-in for a missing template argument in Go output.
pub const PLACEHOLDER_GO: &str = "/* unknown */ any";

/// Render `ty` in `target` syntax. Never fails: malformed trees render with
/// placeholders.
pub fn render_for_target(ty: &Type, target: Target) -> String {
    let mut discarded = Vec::new();
    render_with_diagnostics(ty, target, &mut discarded)
}

/// Like [`render_for_target`], recording every unmapped construct.
pub fn render_with_diagnostics(
    ty: &Type,
    target: Target,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    Renderer {
        target,
        lifetime: None,
        diagnostics,
    }
    .render(ty)
}

/// Render a struct field type. Rust borrows carry `lifetime`.
pub fn render_field_type(
    ty: &Type,
    target: Target,
    lifetime: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    Renderer {
        target,
        lifetime: Some(lifetime),
        diagnostics,
    }
    .render(ty)
}

struct Renderer<'a> {
    target: Target,
    lifetime: Option<&'a str>,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl Renderer<'_> {
    fn render(&mut self, ty: &Type) -> String {
        match ty.kind {
            TypeKind::Void | TypeKind::Bool | TypeKind::Integer | TypeKind::Float => {
                self.primitive(ty)
            }
            TypeKind::Pointer | TypeKind::Reference => self.pointer(ty),
            TypeKind::Array => self.array(ty),
            TypeKind::Aggregate => self.aggregate(ty),
            TypeKind::Function => self.function(ty),
            TypeKind::Container(kind) => self.container(kind, ty),
            TypeKind::Sync(kind) => self.sync(kind, ty),
        }
    }

    fn placeholder(&mut self, subject: &str, message: String) -> String {
        self.diagnostics.push(Diagnostic::warning(subject, message));
        match self.target {
            Target::Rust => PLACEHOLDER_RUST.to_string(),
            Target::Go => PLACEHOLDER_GO.to_string(),
        }
    }

    fn element(&mut self, ty: &Type) -> String {
        match ty.element() {
            Some(elem) => self.render(elem),
            None => self.placeholder(&ty.name, "missing element type".to_string()),
        }
    }

    fn primitive(&self, ty: &Type) -> String {
        if let Some(prim) = builtin::lookup(&ty.name) {
            return prim.name_for(self.target).to_string();
        }
        let (rust, go) = match (ty.kind, ty.size_bytes) {
            (TypeKind::Void, _) => ("()", "struct{}"),
            (TypeKind::Bool, _) => ("bool", "bool"),
            (TypeKind::Float, 4) => ("f32", "float32"),
            (TypeKind::Float, _) => ("f64", "float64"),
            (_, 1) => ("i8", "int8"),
            (_, 2) => ("i16", "int16"),
            (_, 8) => ("i64", "int64"),
            _ => ("i32", "int32"),
        };
        match self.target {
            Target::Rust => rust.to_string(),
            Target::Go => go.to_string(),
        }
    }

    fn pointer(&mut self, ty: &Type) -> String {
        let inner = self.element(ty);
        if ty.name.contains("weak_ptr") {
            self.diagnostics.push(Diagnostic::note(
                &ty.name,
                "weak reference must be upgraded before use",
            ));
            return match self.target {
                Target::Rust => format!("std::rc::Weak<std::cell::RefCell<{inner}>>"),
                Target::Go => format!("*{inner}"),
            };
        }

        let pattern = ownership::classify(ty);
        match (self.target, pattern) {
            (Target::Rust, OwnershipPattern::RawPointer) => {
                self.diagnostics.push(Diagnostic::warning(
                    &ty.name,
                    "raw pointer requires unsafe code",
                ));
                if ty.element().is_some_and(|p| p.is_const) {
                    format!("*const {inner}")
                } else {
                    format!("*mut {inner}")
                }
            }
            (target, pattern) => match self.lifetime {
                Some(lt) => ownership::render_with_lifetime(pattern, &inner, target, lt),
                None => ownership::render(pattern, &inner, target),
            },
        }
    }

    fn array(&mut self, ty: &Type) -> String {
        let elem = self.element(ty);
        match (self.target, ty.array_len) {
            (Target::Rust, Some(n)) => format!("[{elem}; {n}]"),
            (Target::Rust, None) => format!("Vec<{elem}>"),
            (Target::Go, Some(n)) => format!("[{n}]{elem}"),
            (Target::Go, None) => format!("[]{elem}"),
        }
    }

    fn aggregate(&mut self, ty: &Type) -> String {
        if ty.name.starts_with("std::") {
            self.diagnostics.push(Diagnostic::note(
                &ty.name,
                "standard library type has no direct mapping",
            ));
        }
        let name = match self.target {
            Target::Rust => ty.name.clone(),
            Target::Go => ty.name.replace("::", "."),
        };
        if ty.template_args.is_empty() {
            return name;
        }
        let args: Vec<String> = ty.template_args.iter().map(|a| self.render(a)).collect();
        match self.target {
            Target::Rust => format!("{name}<{}>", args.join(", ")),
            Target::Go => format!("{name}[{}]", args.join(", ")),
        }
    }

    fn function(&mut self, ty: &Type) -> String {
        let params: Vec<String> = ty.template_args.iter().map(|p| self.render(p)).collect();
        let params = params.join(", ");
        let ret = ty
            .element()
            .filter(|r| !r.is_void())
            .map(|r| self.render(r));
        match (self.target, ret) {
            (Target::Rust, Some(ret)) => format!("Box<dyn Fn({params}) -> {ret}>"),
            (Target::Rust, None) => format!("Box<dyn Fn({params})>"),
            (Target::Go, Some(ret)) => format!("func({params}) {ret}"),
            (Target::Go, None) => format!("func({params})"),
        }
    }

    fn arg(&mut self, ty: &Type, kind: ContainerKind, index: usize) -> String {
        match ty.template_args.get(index) {
            Some(arg) => self.render(arg),
            None => self.placeholder(
                &ty.name,
                format!(
                    "missing template argument {} of {}",
                    index + 1,
                    kind.source_name()
                ),
            ),
        }
    }

    fn container(&mut self, kind: ContainerKind, ty: &Type) -> String {
        use ContainerKind as C;

        let args: Vec<String> = (0..kind.arity()).map(|i| self.arg(ty, kind, i)).collect();
        let (first, second) = match args.as_slice() {
            [a] => (a.as_str(), ""),
            [a, b] => (a.as_str(), b.as_str()),
            _ => ("", ""),
        };

        match self.target {
            Target::Rust => match kind {
                C::Vector => format!("Vec<{first}>"),
                C::List | C::Deque => format!("std::collections::VecDeque<{first}>"),
                C::Map => format!("std::collections::BTreeMap<{first}, {second}>"),
                C::UnorderedMap => format!("std::collections::HashMap<{first}, {second}>"),
                C::Set => format!("std::collections::BTreeSet<{first}>"),
                C::UnorderedSet => format!("std::collections::HashSet<{first}>"),
                C::Pair => format!("({first}, {second})"),
                C::Optional => format!("Option<{first}>"),
                C::String => "String".to_string(),
            },
            Target::Go => match kind {
                C::Vector | C::List | C::Deque => format!("[]{first}"),
                C::Map | C::UnorderedMap => {
                    if kind == C::Map {
                        self.diagnostics.push(Diagnostic::note(
                            &ty.name,
                            "go maps do not preserve key order",
                        ));
                    }
                    format!("map[{first}]{second}")
                }
                C::Set | C::UnorderedSet => format!("map[{first}]bool"),
                C::Pair => format!("struct {{ First {first}; Second {second} }}"),
                C::Optional => format!("*{first}"),
                C::String => "string".to_string(),
            },
        }
    }

    fn sync(&mut self, kind: SyncKind, ty: &Type) -> String {
        if let Some(reason) = unmapped_reason(kind, self.target) {
            let diagnostic = match self.target {
                Target::Go => Diagnostic::warning(&ty.name, reason),
                Target::Rust => Diagnostic::note(&ty.name, reason),
            };
            self.diagnostics.push(diagnostic);
        }
        render_primitive(kind, ty.element(), self.target)
    }
}
