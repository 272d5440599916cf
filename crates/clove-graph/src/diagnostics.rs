//! Diagnostics surfaced to the host pipeline.
//!
//! Every problem the engine finds (parse-time or graph-level) is reported as a
//! [`Diagnostic`]: a cloneable, serializable record with a file position that
//! stays stable regardless of which stage produced it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::span::{LineIndex, SourceSpan};

/// Diagnostic kind, drawn from the engine's error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Malformed declaration placement, non-literal namespace argument or syntax error.
    ParseError,
    /// Two files claim the same namespace.
    DuplicateProvide,
    /// A require resolves to no owner.
    MissingDependency,
    /// The require graph contains a cycle.
    Cycle,
    /// Rewrite rules produced overlapping edits.
    OverlappingEdit,
    /// A require used in a context that is neither a statement nor a binding.
    AmbiguousRequire,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseError => "parse_error",
            Self::DuplicateProvide => "duplicate_provide",
            Self::MissingDependency => "missing_dependency",
            Self::Cycle => "cycle",
            Self::OverlappingEdit => "overlapping_edit",
            Self::AmbiguousRequire => "ambiguous_require",
        }
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One reported problem with its source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub file: Option<PathBuf>,
    /// 1-based line (0 when the position is unknown)
    pub line: u32,
    /// 0-based column in characters
    pub column: u32,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
            file: None,
            line: 0,
            column: 0,
        }
    }

    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(kind, message)
        }
    }

    /// Attach a file and resolve the span start to a line/column pair.
    pub fn at(mut self, file: &Path, span: SourceSpan, source: &str) -> Self {
        let (line, column) = LineIndex::new(source).line_column(span.start, source);
        self.file = Some(file.to_path_buf());
        self.line = line;
        self.column = column;
        self
    }

    /// Same as [`Diagnostic::at`] with a line index the caller already built.
    pub fn at_indexed(
        mut self,
        file: &Path,
        span: SourceSpan,
        source: &str,
        index: &LineIndex,
    ) -> Self {
        let (line, column) = index.line_column(span.start, source);
        self.file = Some(file.to_path_buf());
        self.line = line;
        self.column = column;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) if self.line > 0 => write!(
                f,
                "{}:{}:{}: {} [{}]",
                file.display(),
                self.line,
                self.column + 1,
                self.message,
                self.kind.as_str()
            ),
            Some(file) => write!(f, "{}: {} [{}]", file.display(), self.message, self.kind.as_str()),
            None => write!(f, "{} [{}]", self.message, self.kind.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_position() {
        let source = "goog.module('a');\ngoog.require(x);\n";
        let span = SourceSpan::new(18, 34);
        let diag = Diagnostic::error(DiagnosticKind::ParseError, "bad require")
            .at(Path::new("/src/a.js"), span, source);

        assert_eq!(diag.line, 2);
        assert_eq!(diag.column, 0);
        assert!(diag.is_error());
        assert_eq!(diag.to_string(), "/src/a.js:2:1: bad require [parse_error]");
    }

    #[test]
    fn test_diagnostic_serializes_snake_case_kind() {
        let diag = Diagnostic::warning(DiagnosticKind::AmbiguousRequire, "ambiguous");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["kind"], "ambiguous_require");
        assert_eq!(json["severity"], "warning");
    }
}
