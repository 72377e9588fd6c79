//! Shared diagnostics model and formatting utilities for the CLI and test consumers.

mod files;
mod formatter;

use blake3::Hasher;
pub use files::{FileCache, FileId, LineCol, SourceFile};
pub use formatter::{ErrorFormat, FormatOptions, JSON_SCHEMA_VERSION, format_diagnostics};
use serde::Serialize;
use std::fmt;

/// Span into a source file (byte offsets).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub file_id: FileId,
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            file_id: FileId::UNKNOWN,
            start,
            end,
        }
    }

    #[must_use]
    pub fn in_file(file_id: FileId, start: usize, end: usize) -> Self {
        Self {
            file_id,
            start,
            end,
        }
    }

    #[must_use]
    pub fn with_file(self, file_id: FileId) -> Self {
        Self { file_id, ..self }
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub fn join(self, other: Span) -> Self {
        Self {
            file_id: self.file_id,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Join two optional spans, keeping whichever side is present.
#[must_use]
pub fn join_spans(left: Option<Span>, right: Option<Span>) -> Option<Span> {
    match (left, right) {
        (Some(left), Some(right)) => Some(left.join(right)),
        (Some(span), None) | (None, Some(span)) => Some(span),
        (None, None) => None,
    }
}

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
    Help,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(self, Severity::Error)
    }
}

/// Structured identifier for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticCode {
    pub code: String,
    pub category: Option<String>,
}

impl DiagnosticCode {
    #[must_use]
    pub fn new(code: impl Into<String>, category: Option<String>) -> Self {
        Self {
            code: code.into(),
            category,
        }
    }
}

/// Highlight for a particular span within the diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    #[must_use]
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    #[must_use]
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// Fix-it suggestion for the developer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    pub message: String,
    pub span: Option<Span>,
    pub replacement: Option<String>,
}

impl Suggestion {
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        span: Option<Span>,
        replacement: Option<String>,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            replacement,
        }
    }
}

/// Rich diagnostic entry with optional labels, notes, and suggestions.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<DiagnosticCode>,
    pub message: String,
    pub primary_label: Option<Label>,
    pub secondary_labels: Vec<Label>,
    pub notes: Vec<String>,
    pub suggestions: Vec<Suggestion>,
}

impl Diagnostic {
    #[must_use]
    pub fn error(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::new(Severity::Error, message, span)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::new(Severity::Warning, message, span)
    }

    #[must_use]
    pub fn note(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::new(Severity::Note, message, span)
    }

    #[must_use]
    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    #[must_use]
    pub fn with_primary_label(mut self, message: impl Into<String>) -> Self {
        if let Some(label) = self.primary_label.take() {
            self.primary_label = Some(Label::primary(label.span, message));
        }
        self
    }

    #[must_use]
    pub fn with_secondary(mut self, label: Label) -> Self {
        self.secondary_labels.push(label);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    /// Stable code string, if one was assigned.
    #[must_use]
    pub fn code_str(&self) -> Option<&str> {
        self.code.as_ref().map(|code| code.code.as_str())
    }

    /// Primary span, if the diagnostic is anchored in source.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        self.primary_label.as_ref().map(|label| label.span)
    }

    #[must_use]
    fn new(severity: Severity, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            primary_label: span.map(|span| Label::primary(span, String::new())),
            secondary_labels: Vec::new(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }
}

/// Collection helper used to accumulate diagnostics during a pass.
///
/// The sink is append-only: passes push into their own sink and the driver
/// merges finished sinks in a deterministic order.
#[derive(Debug)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    namespace: String,
}

impl DiagnosticSink {
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            diagnostics: Vec::new(),
            namespace: namespace.into(),
        }
    }

    pub fn push(&mut self, mut diagnostic: Diagnostic) {
        if diagnostic.code.is_none() {
            diagnostic.code = Some(self.auto_code(&diagnostic));
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn push_error(&mut self, message: impl Into<String>, span: Option<Span>) {
        self.push(Diagnostic::error(message, span));
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.push(diagnostic);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity.is_error())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn auto_code(&self, diagnostic: &Diagnostic) -> DiagnosticCode {
        let mut hasher = Hasher::new();
        hasher.update(self.namespace.as_bytes());
        hasher.update(diagnostic.message.as_bytes());
        if let Some(label) = diagnostic.primary_label.as_ref() {
            hasher.update(&label.span.start.to_le_bytes());
            hasher.update(&label.span.end.to_le_bytes());
        }
        let hash = hasher.finalize();
        let mut prefix = [0u8; 4];
        prefix.copy_from_slice(&hash.as_bytes()[..4]);
        let suffix = u32::from_le_bytes(prefix) % 100_000;
        let code = format!("{}{:05}", self.namespace.to_ascii_uppercase(), suffix);
        DiagnosticCode::new(code, Some(self.namespace.clone()))
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new("GEN")
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self
            .code
            .as_ref()
            .map(|c| c.code.as_str())
            .unwrap_or("UNKNOWN");
        write!(f, "{}[{code}]: {}", self.severity.as_str(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_assigns_namespaced_codes_to_uncoded_diagnostics() {
        let mut sink = DiagnosticSink::new("lex");
        sink.push_error("unterminated string literal", Some(Span::new(3, 9)));
        let diagnostics = sink.into_vec();
        let code = diagnostics[0].code_str().unwrap_or_default();
        assert!(code.starts_with("LEX"), "unexpected code {code}");
        assert_eq!(code.len(), 8);
    }

    #[test]
    fn sink_keeps_explicit_codes() {
        let mut sink = DiagnosticSink::default();
        sink.push(
            Diagnostic::error("boom", None).with_code(DiagnosticCode::new("CAP001", None)),
        );
        assert_eq!(sink.as_slice()[0].code_str(), Some("CAP001"));
        assert!(sink.has_errors());
    }

    #[test]
    fn auto_codes_are_stable_for_identical_input() {
        let mut first = DiagnosticSink::new("gen");
        let mut second = DiagnosticSink::new("gen");
        first.push_error("same", Some(Span::new(1, 2)));
        second.push_error("same", Some(Span::new(1, 2)));
        assert_eq!(
            first.as_slice()[0].code_str(),
            second.as_slice()[0].code_str()
        );
    }

    #[test]
    fn display_includes_severity_and_code() {
        let diagnostic =
            Diagnostic::error("bad", None).with_code(DiagnosticCode::new("NAV001", None));
        assert_eq!(diagnostic.to_string(), "error[NAV001]: bad");
    }

    #[test]
    fn join_spans_prefers_present_side() {
        let joined = join_spans(Some(Span::new(4, 6)), Some(Span::new(1, 2)));
        assert_eq!(joined, Some(Span::new(1, 6)));
        assert_eq!(join_spans(None, Some(Span::new(1, 2))), Some(Span::new(1, 2)));
        assert_eq!(join_spans(None, None), None);
    }
}
