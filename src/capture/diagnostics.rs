use crate::diagnostics::{Diagnostic, DiagnosticCode, Label, Span, Suggestion};

pub mod codes {
    pub const ILLEGAL_PARAMETER_REFERENCE: &str = "CAP001";
    pub const INVALID_CAPTURE_QUALIFIER: &str = "CAP002";
}

fn error(code: &'static str, message: impl Into<String>, span: Option<Span>) -> Diagnostic {
    Diagnostic::error(message, span).with_code(DiagnosticCode::new(code, Some("capture".into())))
}

/// Bare use of a primary constructor parameter after construction finished.
#[must_use]
pub fn illegal_parameter_reference(name: &str, span: Span, captured: bool) -> Diagnostic {
    let diagnostic = error(
        codes::ILLEGAL_PARAMETER_REFERENCE,
        format!("primary constructor parameter `{name}` is only available during initialization"),
        Some(span),
    )
    .with_primary_label("referenced after construction");
    if captured {
        diagnostic.with_suggestion(Suggestion::new(
            format!("use the captured field `{name}`"),
            Some(span),
            Some(format!("this.{name}")),
        ))
    } else {
        diagnostic.with_note(format!(
            "add an accessibility modifier such as `private readonly` to `{name}` \
             to keep it in a field"
        ))
    }
}

#[must_use]
pub fn invalid_capture_qualifier(message: impl Into<String>, span: Span) -> Diagnostic {
    error(codes::INVALID_CAPTURE_QUALIFIER, message, Some(span))
}

/// A captured parameter whose field name is already taken by a declared member.
#[must_use]
pub fn capture_conflicts_with_member(name: &str, parameter: Span, member: Span) -> Diagnostic {
    invalid_capture_qualifier(
        format!("captured parameter `{name}` conflicts with member `{name}`"),
        parameter,
    )
    .with_secondary(Label::secondary(member, "member declared here"))
    .with_note("the captured field takes the parameter's name; rename one of them")
}
