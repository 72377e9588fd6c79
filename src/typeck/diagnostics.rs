use crate::diagnostics::{Diagnostic, DiagnosticCode, Span};

pub mod codes {
    pub const UNKNOWN_TYPE: &str = "TCK001";
    pub const DUPLICATE_TYPE: &str = "TCK002";
    pub const DUPLICATE_MEMBER: &str = "TCK003";
    pub const INVALID_MODIFIER: &str = "TCK010";
    pub const INVALID_BASE: &str = "TCK020";

    pub const UNKNOWN_NAME: &str = "TCK100";
    pub const UNKNOWN_MEMBER: &str = "TCK101";
    pub const NO_INDEXER: &str = "TCK102";
    pub const NOT_INVOCABLE: &str = "TCK103";
    pub const ARITY_MISMATCH: &str = "TCK104";
    pub const METHOD_GROUP_VALUE: &str = "TCK105";
    pub const THIS_IN_STATIC: &str = "TCK106";
    pub const INSTANCE_FROM_STATIC: &str = "TCK107";

    pub const TYPE_MISMATCH: &str = "TCK200";
    pub const BAD_OPERANDS: &str = "TCK201";
    pub const NOT_ASSIGNABLE: &str = "TCK202";
    pub const COALESCE_NON_NULLABLE: &str = "TCK203";

    pub const DISALLOWED_NAVIGATION_FORM: &str = "NAV001";
    pub const UNKNOWN_TYPE_CATEGORY: &str = "NAV002";
    pub const INVALID_NAVIGATION_OPERAND: &str = "NAV003";
}

#[must_use]
pub fn error(code: &'static str, message: impl Into<String>, span: Option<Span>) -> Diagnostic {
    Diagnostic::error(message, span).with_code(DiagnosticCode::new(code, Some("typeck".into())))
}

#[must_use]
pub fn navigation_error(
    code: &'static str,
    message: impl Into<String>,
    span: Option<Span>,
) -> Diagnostic {
    Diagnostic::error(message, span)
        .with_code(DiagnosticCode::new(code, Some("navigation".into())))
}
