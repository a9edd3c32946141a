//! Non-fatal diagnostics (the manifest of unmapped constructs).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational: lossy but well-understood mapping.
    Note,
    /// A construct that needs manual attention in the output.
    Warning,
}

/// A construct recognized in the input that the chosen target cannot
/// represent directly. Output is still produced; the construct renders as a
/// placeholder or comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// What the diagnostic is about, e.g. `Point::lock` or `std::list<>`.
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    pub fn note(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn warning(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Re-attach the diagnostic to a more specific subject, keeping the
    /// original one as context.
    pub fn within(mut self, scope: &str) -> Self {
        if self.subject.is_empty() {
            self.subject = scope.to_string();
        } else {
            self.subject = format!("{scope}: {}", self.subject);
        }
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Note => "note",
            Severity::Warning => "warning",
        };
        write!(f, "{level}: {}: {}", self.subject, self.message)
    }
}
