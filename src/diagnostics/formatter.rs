use serde::Serialize;

use super::{Diagnostic, DiagnosticCode, FileCache, LineCol, Span};

pub const JSON_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorFormat {
    Human,
    Json,
    Short,
}

impl ErrorFormat {
    pub fn parse(spec: &str) -> Option<Self> {
        match spec.to_ascii_lowercase().as_str() {
            "human" | "text" => Some(Self::Human),
            "json" => Some(Self::Json),
            "short" => Some(Self::Short),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    pub format: ErrorFormat,
}

impl FormatOptions {
    #[must_use]
    pub fn new(format: ErrorFormat) -> Self {
        Self { format }
    }
}

/// Render a collection of diagnostics to a single string.
#[must_use]
pub fn format_diagnostics(
    diagnostics: &[Diagnostic],
    files: &FileCache,
    options: FormatOptions,
) -> String {
    let mut rendered = String::new();
    for (index, diagnostic) in diagnostics.iter().enumerate() {
        if index > 0 {
            rendered.push('\n');
        }
        let chunk = match options.format {
            ErrorFormat::Human => render_human(diagnostic, files),
            ErrorFormat::Short => render_short(diagnostic, files),
            ErrorFormat::Json => render_json(diagnostic, files),
        };
        rendered.push_str(&chunk);
    }
    rendered
}

fn render_human(diagnostic: &Diagnostic, files: &FileCache) -> String {
    let mut out = String::new();
    let (path, location) = locate_primary(diagnostic, files);
    out.push_str(&format_header(diagnostic));
    out.push('\n');
    out.push_str(&format_location_arrow(&path, location.as_ref()));
    if let Some(label) = diagnostic.primary_label.as_ref() {
        out.push_str(&render_snippet(label.span, &label.message, files));
    }
    for label in &diagnostic.secondary_labels {
        out.push_str(&render_snippet(label.span, &label.message, files));
    }
    for note in &diagnostic.notes {
        out.push_str(&format!("\nnote: {note}"));
    }
    for suggestion in &diagnostic.suggestions {
        let mut line = format!("\nhelp: {}", suggestion.message);
        if let Some(replacement) = &suggestion.replacement {
            line.push_str(&format!(" replace with `{replacement}`"));
        }
        out.push_str(&line);
    }
    out
}

fn render_short(diagnostic: &Diagnostic, files: &FileCache) -> String {
    let (path, location) = locate_primary(diagnostic, files);
    let severity = diagnostic.severity.as_str();
    let code = diagnostic.code_str().unwrap_or("UNKNOWN");
    let (line, column) = location
        .map(|loc| (loc.line.to_string(), loc.column.to_string()))
        .unwrap_or_else(|| ("?".into(), "?".into()));
    let mut out = format!(
        "{}:{}:{}: {}[{code}]: {}",
        path, line, column, severity, diagnostic.message
    );
    if !diagnostic.notes.is_empty() {
        out.push_str(&format!(" (notes: {})", diagnostic.notes.len()));
    }
    for suggestion in &diagnostic.suggestions {
        out.push_str(&format!("; suggestion: {}", suggestion.message));
    }
    out
}

fn render_json(diagnostic: &Diagnostic, files: &FileCache) -> String {
    let primary_span = diagnostic
        .primary_label
        .as_ref()
        .and_then(|label| JsonSpan::from_span(label.span, files));
    let mut labels = Vec::new();
    if let Some(span) = diagnostic.primary_label.as_ref() {
        labels.push(JsonLabel::from_label(span, files));
    }
    for label in &diagnostic.secondary_labels {
        labels.push(JsonLabel::from_label(label, files));
    }
    let suggestions: Vec<JsonSuggestion> = diagnostic
        .suggestions
        .iter()
        .map(|s| JsonSuggestion::from_suggestion(s, files))
        .collect();

    let payload = JsonDiagnostic {
        version: JSON_SCHEMA_VERSION.to_string(),
        severity: diagnostic.severity.as_str().to_string(),
        code: diagnostic.code.clone(),
        message: diagnostic.message.clone(),
        primary_span,
        labels,
        notes: diagnostic.notes.clone(),
        suggestions,
    };
    serde_json::to_string(&payload).unwrap_or_else(|_| "{}".into())
}

fn format_header(diagnostic: &Diagnostic) -> String {
    let severity = diagnostic.severity.as_str();
    let code = diagnostic.code_str().unwrap_or("UNKNOWN");
    format!("{severity}[{code}]: {}", diagnostic.message)
}

fn format_location_arrow(path: &str, loc: Option<&LineCol>) -> String {
    match loc {
        Some(loc) => format!("  --> {path}:{}:{}\n   |\n", loc.line, loc.column),
        None => format!("  --> {path}:?:?\n   |\n"),
    }
}

fn render_snippet(span: Span, message: &str, files: &FileCache) -> String {
    let mut out = String::new();
    let Some(file) = files.get(span.file_id) else {
        return out;
    };
    let Some(loc) = file.line_col(span.start) else {
        return out;
    };
    if let Some(line) = file.line(loc.line) {
        let display_line = line.trim_end_matches('\n');
        let line_start = span.start + 1 - loc.column;
        let rel_start = span.start.saturating_sub(line_start).min(display_line.len());
        let rel_end = span.end.saturating_sub(line_start).min(display_line.len());
        let caret_count = display_line
            .get(rel_start..rel_end)
            .map_or(1, |text| text.chars().count().max(1));
        let column = display_line
            .get(..rel_start)
            .map_or(0, |prefix| prefix.chars().count());
        out.push_str(&format!("{:>4} | {}\n", loc.line, display_line));
        out.push_str(&format!(
            "{:>4} | {}{} {}",
            "",
            " ".repeat(column),
            "^".repeat(caret_count),
            message
        ));
    }
    out
}

fn locate_primary(diagnostic: &Diagnostic, files: &FileCache) -> (String, Option<LineCol>) {
    if let Some(label) = diagnostic.primary_label.as_ref()
        && let Some(path) = files.path(label.span.file_id)
    {
        let loc = files.line_col(label.span.file_id, label.span.start);
        return (path.display().to_string(), loc);
    }
    ("<unknown>".into(), None)
}

#[derive(Serialize)]
struct JsonDiagnostic {
    version: String,
    severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<DiagnosticCode>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_span: Option<JsonSpan>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    labels: Vec<JsonLabel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    suggestions: Vec<JsonSuggestion>,
}

#[derive(Serialize)]
struct JsonSpan {
    file: String,
    start: usize,
    end: usize,
    line_start: usize,
    column_start: usize,
}

impl JsonSpan {
    fn from_span(span: Span, files: &FileCache) -> Option<Self> {
        let file = files.get(span.file_id)?;
        let line_col = file.line_col(span.start)?;
        Some(Self {
            file: file.path.display().to_string(),
            start: span.start,
            end: span.end,
            line_start: line_col.line,
            column_start: line_col.column,
        })
    }
}

#[derive(Serialize)]
struct JsonLabel {
    message: String,
    span: JsonSpan,
    is_primary: bool,
}

impl JsonLabel {
    fn from_label(label: &super::Label, files: &FileCache) -> JsonLabel {
        JsonLabel {
            message: label.message.clone(),
            span: JsonSpan::from_span(label.span, files).unwrap_or(JsonSpan {
                file: "<unknown>".into(),
                start: label.span.start,
                end: label.span.end,
                line_start: 0,
                column_start: 0,
            }),
            is_primary: label.is_primary,
        }
    }
}

#[derive(Serialize)]
struct JsonSuggestion {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    span: Option<JsonSpan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    replacement: Option<String>,
}

impl JsonSuggestion {
    fn from_suggestion(suggestion: &super::Suggestion, files: &FileCache) -> Self {
        Self {
            message: suggestion.message.clone(),
            span: suggestion
                .span
                .and_then(|span| JsonSpan::from_span(span, files)),
            replacement: suggestion.replacement.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Diagnostic, DiagnosticCode, Suggestion};
    use serde_json::Value;

    fn sample_file() -> (FileCache, Span) {
        let mut files = FileCache::default();
        let source = "class Person(string last)\n{\n    string Name => last;\n}\n";
        let file_id = files.add_file("person.cl", source);
        let start = source.rfind("last").expect("sample references last");
        let span = Span::in_file(file_id, start, start + 4);
        (files, span)
    }

    fn base_diagnostic(span: Span) -> Diagnostic {
        Diagnostic::error("parameter `last` is not available here", Some(span))
            .with_primary_label("referenced after construction")
            .with_code(DiagnosticCode::new("CAP001", Some("capture".into())))
    }

    #[test]
    fn human_format_includes_snippet_and_metadata() {
        let (files, span) = sample_file();
        let diagnostic = base_diagnostic(span)
            .with_note("stage: capture")
            .with_suggestion(Suggestion::new(
                "capture the parameter",
                Some(span),
                Some("private readonly string last".into()),
            ));
        let rendered =
            format_diagnostics(&[diagnostic], &files, FormatOptions::new(ErrorFormat::Human));
        assert!(
            rendered.contains("error[CAP001]: parameter `last` is not available here"),
            "header should contain severity and code: {rendered}"
        );
        assert!(
            rendered.contains("--> person.cl:3:20"),
            "location arrow should include path and line/col: {rendered}"
        );
        assert!(
            rendered.contains("^^^^ referenced after construction"),
            "primary label should be underlined: {rendered}"
        );
        assert!(rendered.contains("note: stage: capture"), "{rendered}");
        assert!(
            rendered.contains("help: capture the parameter replace with"),
            "{rendered}"
        );
    }

    #[test]
    fn short_format_is_single_line() {
        let (files, span) = sample_file();
        let diagnostic = base_diagnostic(span).with_note("stage: capture");
        let rendered =
            format_diagnostics(&[diagnostic], &files, FormatOptions::new(ErrorFormat::Short));
        assert!(
            rendered.starts_with("person.cl:3:20: error[CAP001]:"),
            "short format should start with path/line/col: {rendered}"
        );
        assert!(rendered.contains("(notes: 1)"), "{rendered}");
        assert_eq!(rendered.lines().count(), 1);
    }

    #[test]
    fn json_format_emits_schema_versioned_payload() {
        let (files, span) = sample_file();
        let diagnostic = base_diagnostic(span).with_suggestion(Suggestion::new(
            "capture the parameter",
            Some(span),
            None,
        ));
        let rendered =
            format_diagnostics(&[diagnostic], &files, FormatOptions::new(ErrorFormat::Json));
        let value: Value = serde_json::from_str(&rendered).expect("valid json diagnostic");
        assert_eq!(value["version"], JSON_SCHEMA_VERSION);
        assert_eq!(value["severity"], "error");
        assert_eq!(value["code"]["code"], "CAP001");
        assert_eq!(value["code"]["category"], "capture");
        assert_eq!(value["primary_span"]["line_start"], 3);
        assert!(
            value["suggestions"]
                .as_array()
                .is_some_and(|list| !list.is_empty()),
            "suggestions should serialize: {value}"
        );
    }

    #[test]
    fn unknown_locations_render_placeholders() {
        let files = FileCache::default();
        let diagnostic = Diagnostic::error("detached", None);
        let rendered =
            format_diagnostics(&[diagnostic], &files, FormatOptions::new(ErrorFormat::Short));
        assert!(rendered.starts_with("<unknown>:?:?: error[UNKNOWN]: detached"));
    }

    #[test]
    fn error_format_parses_known_names() {
        assert_eq!(ErrorFormat::parse("JSON"), Some(ErrorFormat::Json));
        assert_eq!(ErrorFormat::parse("text"), Some(ErrorFormat::Human));
        assert_eq!(ErrorFormat::parse("short"), Some(ErrorFormat::Short));
        assert_eq!(ErrorFormat::parse("toon"), None);
    }
}
