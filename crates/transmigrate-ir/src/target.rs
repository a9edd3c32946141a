//! Output target selection.

use serde::{Deserialize, Serialize};

/// The two supported output languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Ownership-aware target: explicit boxes, borrows and `Result`.
    #[default]
    Rust,
    /// Garbage-collected target: one reference idiom and `(value, error)`.
    Go,
}

/// Error returned when a target name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown target language: {0} (expected rust or go)")]
pub struct UnknownTarget(pub String);

impl Target {
    pub const ALL: [Target; 2] = [Target::Rust, Target::Go];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Rust => "rust",
            Target::Go => "go",
        }
    }

    /// File extension for emitted code.
    pub fn extension(&self) -> &'static str {
        match self {
            Target::Rust => "rs",
            Target::Go => "go",
        }
    }

    /// Whether the target models exclusive/shared ownership explicitly.
    pub fn tracks_ownership(&self) -> bool {
        matches!(self, Target::Rust)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Target {
    type Err = UnknownTarget;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(Self::Rust),
            "go" | "golang" => Ok(Self::Go),
            _ => Err(UnknownTarget(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        assert_eq!("rust".parse::<Target>(), Ok(Target::Rust));
        assert_eq!("Go".parse::<Target>(), Ok(Target::Go));
        assert!("java".parse::<Target>().is_err());
    }

    #[test]
    fn test_extension() {
        assert_eq!(Target::Rust.extension(), "rs");
        assert_eq!(Target::Go.extension(), "go");
    }
}
