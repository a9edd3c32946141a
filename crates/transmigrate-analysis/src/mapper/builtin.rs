//! Primitive type table.

use transmigrate_ir::{Target, Type, TypeKind};

/// One primitive spelling with its authoritative size and target names.
#[derive(Debug, Clone, Copy)]
pub struct Primitive {
    pub spelling: &'static str,
    pub kind: TypeKind,
    pub size_bytes: u64,
    pub rust: &'static str,
    pub go: &'static str,
}

impl Primitive {
    pub fn name_for(&self, target: Target) -> &'static str {
        match target {
            Target::Rust => self.rust,
            Target::Go => self.go,
        }
    }
}

macro_rules! primitives {
    ($( $spelling:literal => $kind:ident, $size:literal, $rust:literal, $go:literal; )*) => {
        pub const PRIMITIVES: &[Primitive] = &[
            $( Primitive {
                spelling: $spelling,
                kind: TypeKind::$kind,
                size_bytes: $size,
                rust: $rust,
                go: $go,
            }, )*
        ];
    };
}

primitives! {
    "void" => Void, 0, "()", "struct{}";
    "bool" => Bool, 1, "bool", "bool";
    "char" => Integer, 1, "i8", "int8";
    "signed char" => Integer, 1, "i8", "int8";
    "unsigned char" => Integer, 1, "u8", "uint8";
    "short" => Integer, 2, "i16", "int16";
    "unsigned short" => Integer, 2, "u16", "uint16";
    "int" => Integer, 4, "i32", "int32";
    "unsigned int" => Integer, 4, "u32", "uint32";
    "long" => Integer, 8, "i64", "int64";
    "unsigned long" => Integer, 8, "u64", "uint64";
    "long long" => Integer, 8, "i64", "int64";
    "unsigned long long" => Integer, 8, "u64", "uint64";
    "int8_t" => Integer, 1, "i8", "int8";
    "int16_t" => Integer, 2, "i16", "int16";
    "int32_t" => Integer, 4, "i32", "int32";
    "int64_t" => Integer, 8, "i64", "int64";
    "uint8_t" => Integer, 1, "u8", "uint8";
    "uint16_t" => Integer, 2, "u16", "uint16";
    "uint32_t" => Integer, 4, "u32", "uint32";
    "uint64_t" => Integer, 8, "u64", "uint64";
    "size_t" => Integer, 8, "usize", "uint";
    "ssize_t" => Integer, 8, "isize", "int";
    "ptrdiff_t" => Integer, 8, "isize", "int";
    "intptr_t" => Integer, 8, "isize", "int";
    "uintptr_t" => Integer, 8, "usize", "uintptr";
    "wchar_t" => Integer, 4, "u32", "rune";
    "char16_t" => Integer, 2, "u16", "uint16";
    "char32_t" => Integer, 4, "u32", "rune";
    "float" => Float, 4, "f32", "float32";
    "double" => Float, 8, "f64", "float64";
    "long double" => Float, 16, "f64", "float64";
}

/// Normalize a primitive spelling: collapse whitespace, drop `std::`, drop
/// redundant `int`/`signed` words (`long int` -> `long`,
/// `signed` -> `int`).
pub fn canonical_spelling(name: &str) -> String {
    let name = name.trim();
    let name = name.strip_prefix("std::").unwrap_or(name);
    let mut words: Vec<&str> = name.split_whitespace().collect();

    if words == ["signed"] {
        return "int".to_string();
    }
    if words == ["unsigned"] {
        return "unsigned int".to_string();
    }
    if words.len() > 1 && words[0] == "signed" && words[1] != "char" {
        words.remove(0);
    }
    if words.len() > 1
        && words.last() == Some(&"int")
        && words.iter().any(|w| *w == "short" || *w == "long")
    {
        words.pop();
    }
    // `long unsigned` style orderings
    if words.len() > 1 && words.contains(&"unsigned") && words[0] != "unsigned" {
        words.retain(|w| *w != "unsigned");
        words.insert(0, "unsigned");
    }
    words.join(" ")
}

pub fn lookup(name: &str) -> Option<&'static Primitive> {
    let canonical = canonical_spelling(name);
    PRIMITIVES.iter().find(|p| p.spelling == canonical)
}

/// Map a primitive spelling to a leaf [`Type`] with its byte size.
pub fn map_builtin_type(name: &str) -> Option<Type> {
    let prim = lookup(name)?;
    Some(Type::primitive(prim.kind, prim.spelling, prim.size_bytes))
}

/// Reverse lookup: which primitive kind does a rendered target name denote?
pub fn reverse_primitive(rendered: &str, target: Target) -> Option<TypeKind> {
    PRIMITIVES
        .iter()
        .find(|p| p.name_for(target) == rendered)
        .map(|p| p.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_spelling() {
        assert_eq!(canonical_spelling("long int"), "long");
        assert_eq!(canonical_spelling("unsigned"), "unsigned int");
        assert_eq!(canonical_spelling("signed short int"), "short");
        assert_eq!(canonical_spelling("signed char"), "signed char");
        assert_eq!(canonical_spelling("long unsigned int"), "unsigned long");
        assert_eq!(canonical_spelling("std::uint32_t"), "uint32_t");
    }

    #[test]
    fn test_builtin_sizes() {
        let int = map_builtin_type("int").unwrap();
        assert_eq!(int.kind, TypeKind::Integer);
        assert_eq!(int.name, "int");
        assert_eq!(int.size_bytes, 4);
        assert_eq!(int.alignment, 4);

        assert_eq!(map_builtin_type("double").unwrap().size_bytes, 8);
        assert_eq!(map_builtin_type("bool").unwrap().kind, TypeKind::Bool);
        assert_eq!(map_builtin_type("void").unwrap().kind, TypeKind::Void);
        assert!(map_builtin_type("Widget").is_none());
    }

    #[test]
    fn test_reverse_lookup_recovers_kind() {
        for target in Target::ALL {
            for prim in PRIMITIVES {
                let rendered = prim.name_for(target);
                assert_eq!(
                    reverse_primitive(rendered, target),
                    Some(prim.kind),
                    "{} -> {rendered} ({target})",
                    prim.spelling
                );
            }
        }
    }
}
