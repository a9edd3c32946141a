//! Identifier case conversion and keyword escaping.
//!
//! The case converters first pass names through [`placeholder_name`], so a
//! C++ name that is not an identifier (`operator+`) still converts to one.

use std::borrow::Cow;

/// Symbolic operators and the word their placeholder uses. Longer
/// spellings come before their prefixes.
const OPERATORS: &[(&str, &str)] = &[
    ("<<=", "shl_assign"),
    (">>=", "shr_assign"),
    ("+=", "add_assign"),
    ("-=", "sub_assign"),
    ("*=", "mul_assign"),
    ("/=", "div_assign"),
    ("%=", "rem_assign"),
    ("==", "eq"),
    ("!=", "ne"),
    ("<=", "le"),
    (">=", "ge"),
    ("<<", "shl"),
    (">>", "shr"),
    ("++", "increment"),
    ("--", "decrement"),
    ("->", "arrow"),
    ("&&", "and"),
    ("||", "or"),
    ("()", "call"),
    ("[]", "index"),
    ("+", "add"),
    ("-", "sub"),
    ("*", "mul"),
    ("/", "div"),
    ("%", "rem"),
    ("<", "lt"),
    (">", "gt"),
    ("=", "assign"),
    ("!", "not"),
    ("&", "bitand"),
    ("|", "bitor"),
    ("^", "bitxor"),
    ("~", "bitnot"),
];

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Identifier standing in for a name that is not one: `operator+` becomes
/// `operator_add`, `operator bool` becomes `operator_bool`. Identifiers
/// and empty names come back unchanged.
pub fn placeholder_name(name: &str) -> Cow<'_, str> {
    if name.is_empty() || is_identifier(name) {
        return Cow::Borrowed(name);
    }
    if let Some(op) = name.strip_prefix("operator") {
        let op = op.trim();
        let word = OPERATORS
            .iter()
            .find(|(symbol, _)| *symbol == op)
            .map_or_else(|| words(op), |(_, word)| (*word).to_string());
        return Cow::Owned(format!("operator_{word}"));
    }
    Cow::Owned(words(name))
}

/// Alphanumeric runs of `text` joined with `_`.
fn words(text: &str) -> String {
    let joined = text
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    match joined.chars().next() {
        None => "unnamed".to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{joined}"),
        Some(_) => joined,
    }
}

/// `getX` / `GetX` / `get_x` to `get_x`.
pub fn snake_case(name: &str) -> String {
    let name = placeholder_name(name);
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            // Break before an uppercase letter that follows a lowercase
            // letter or digit, or that starts a new word after an acronym
            // (`HTTPServer` -> `http_server`).
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Convert a string to `PascalCase`.
pub fn pascal_case(name: &str) -> String {
    placeholder_name(name)
        .split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Convert a string to `camelCase`.
pub fn camel_case(name: &str) -> String {
    let pascal = pascal_case(name);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe",
    "use", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const RUST_RESERVED: &[&str] = &["self", "Self", "super", "crate"];

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// Make `name` usable as a Rust identifier.
pub fn rust_ident(name: &str) -> String {
    if RUST_RESERVED.contains(&name) {
        format!("{name}_")
    } else if RUST_KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// Make `name` usable as a Go identifier.
pub fn go_ident(name: &str) -> String {
    if GO_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Last path segment of a qualified name (`geo::Point` -> `Point`).
pub fn base_name(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}
