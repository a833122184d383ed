//! Source locations and compiler diagnostics

use std::fmt;
use std::sync::Arc;

/// A position in shader source
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    /// Path or name of the source
    pub file: Arc<str>,
    /// 1-based line number, 0 when unknown
    pub line: u32,
}

impl Location {
    pub fn new(file: impl Into<Arc<str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.file, self.line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A message produced while preprocessing or parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    pub fn error(location: Location, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            location,
            message: message.into(),
        }
    }

    pub fn warning(location: Location, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: {}: {}", self.location, level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let d = Diagnostic::error(Location::new("Clarity.fx", 12), "syntax error");
        assert_eq!(d.to_string(), "Clarity.fx(12): error: syntax error");

        let w = Diagnostic::warning(Location::new("ReShade.fxh", 3), "macro redefinition");
        assert_eq!(w.to_string(), "ReShade.fxh(3): warning: macro redefinition");
    }
}
