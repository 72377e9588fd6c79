use std::path::PathBuf;

use crate::capture::ResolvedType;
use crate::capture::scope::ParameterScope;
use crate::diagnostics::{Diagnostic, FileCache};
use crate::frontend::ast::CompilationUnit;
use crate::lowering::LoweredExpr;
use crate::typeck::NavigationRecord;

/// Everything `check` learned about one source file.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub input: PathBuf,
    pub files: FileCache,
    /// The unit with captured fields inserted.
    pub unit: CompilationUnit,
    pub declarations: Vec<ResolvedType>,
    pub navigation: Vec<NavigationRecord>,
    pub lowered: Vec<LoweredExpr>,
    /// Parse warnings, then capture, declaration and body diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity.is_error())
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity.is_error())
            .count()
    }

    /// Parameter references recorded for the declaration named `ty`.
    #[must_use]
    pub fn scope(&self, ty: &str) -> Option<&ParameterScope> {
        self.declarations
            .iter()
            .find(|resolved| resolved.name == ty)
            .map(|resolved| &resolved.scope)
    }

    pub fn scopes(&self) -> impl Iterator<Item = (&str, &ParameterScope)> {
        self.declarations
            .iter()
            .map(|resolved| (resolved.name.as_str(), &resolved.scope))
    }

    /// Codes of every diagnostic, in report order.
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter_map(Diagnostic::code_str)
            .collect()
    }
}
