//! Primary constructor parameter capture.
//!
//! A parameter is captured exactly when it carries an accessibility modifier.
//! Captured parameters get a synthesized field named after the parameter,
//! inserted ahead of every declared member so initializers that read it see
//! it assigned. The bare parameter name stays an initializer-only binding for
//! every parameter: [`scope::collect_references`] finds the references that
//! escape construction and each one becomes a `CAP001` error.
//!
//! Declarations are resolved independently, so a unit fans out across
//! threads and the results are merged back in declaration order.

pub mod diagnostics;
pub mod qualifiers;
pub mod scope;


use rayon::prelude::*;
use tracing::debug;

use self::qualifiers::{FieldSite, validate_field_modifiers, validate_parameter_attributes};
use self::scope::{ParameterScope, collect_references};
use crate::diagnostics::{Diagnostic, Span};
use crate::frontend::ast::{
    Attribute, CompilationUnit, FieldDecl, FieldOrigin, Member, Modifier,
    PrimaryConstructorParameter, TypeDecl, TypeExpr, Visibility,
};
use crate::syntax::expr::ExprNode;

/// Field produced for a captured parameter.
#[derive(Debug, Clone)]
pub struct SynthesizedField {
    pub name: String,
    pub ty: TypeExpr,
    pub visibility: Visibility,
    pub readonly: bool,
    /// `[field: ...]` attributes of the parameter with the target removed.
    pub attributes: Vec<Attribute>,
    /// The parameter's name, which is also the initializer expression.
    pub span: Span,
    modifiers: Vec<Modifier>,
}

impl SynthesizedField {
    fn from_parameter(param: &PrimaryConstructorParameter, visibility: Visibility) -> Self {
        let attributes = param
            .attributes
            .iter()
            .filter(|attribute| attribute.target.as_deref() == Some("field"))
            .map(|attribute| Attribute {
                target: None,
                ..attribute.clone()
            })
            .collect();
        Self {
            name: param.name.clone(),
            ty: param.ty.clone(),
            visibility,
            readonly: param.is_readonly(),
            attributes,
            span: param.name_span,
            modifiers: param.modifiers.clone(),
        }
    }

    /// The member inserted into the declaration.
    #[must_use]
    pub fn to_field_decl(&self) -> FieldDecl {
        FieldDecl {
            attributes: self.attributes.clone(),
            modifiers: self.modifiers.clone(),
            ty: self.ty.clone(),
            name: self.name.clone(),
            name_span: self.span,
            initializer: Some(ExprNode::identifier(self.name.clone(), self.span)),
            origin: FieldOrigin::Captured {
                parameter: self.name.clone(),
            },
            span: self.span,
        }
    }
}

#[derive(Debug, Clone)]
pub enum CaptureDecision {
    Captured(SynthesizedField),
    /// The parameter only exists while the instance is constructed. A
    /// captured parameter whose field could not be created also ends here.
    InitializerOnly,
}

impl CaptureDecision {
    #[must_use]
    pub fn field(&self) -> Option<&SynthesizedField> {
        match self {
            CaptureDecision::Captured(field) => Some(field),
            CaptureDecision::InitializerOnly => None,
        }
    }
}

/// Capture outcome for one type declaration.
#[derive(Debug, Clone)]
pub struct ResolvedType {
    pub name: String,
    /// One decision per primary constructor parameter, in parameter order.
    pub decisions: Vec<(String, CaptureDecision)>,
    pub scope: ParameterScope,
}

impl ResolvedType {
    pub fn synthesized_fields(&self) -> impl Iterator<Item = &SynthesizedField> {
        self.decisions.iter().filter_map(|(_, decision)| decision.field())
    }
}

/// A unit with captured fields inserted, plus what was decided for it.
#[derive(Debug, Clone, Default)]
pub struct CaptureOutput {
    pub unit: CompilationUnit,
    pub types: Vec<ResolvedType>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolve every declaration of `unit`.
#[must_use]
pub fn resolve_unit(unit: &CompilationUnit, parallel: bool) -> CaptureOutput {
    let resolved: Vec<(TypeDecl, ResolvedType, Vec<Diagnostic>)> = if parallel {
        unit.types.par_iter().map(resolve_type).collect()
    } else {
        unit.types.iter().map(resolve_type).collect()
    };

    let mut output = CaptureOutput::default();
    for (decl, resolved, diagnostics) in resolved {
        output.unit.types.push(decl);
        output.types.push(resolved);
        output.diagnostics.extend(diagnostics);
    }
    output
}

/// Resolve the primary constructor parameters of one declaration.
///
/// Returns the declaration with captured fields inserted, the per-parameter
/// decisions and the diagnostics for this declaration.
#[must_use]
pub fn resolve_type(decl: &TypeDecl) -> (TypeDecl, ResolvedType, Vec<Diagnostic>) {
    let mut sink = Vec::new();
    let scope = collect_references(decl);

    let mut decisions: Vec<(String, CaptureDecision)> = Vec::new();
    for param in decl.primary_parameters() {
        let problems =
            validate_field_modifiers(&param.modifiers, decl.kind, FieldSite::CapturedParameter);
        for problem in problems
            .into_iter()
            .chain(validate_parameter_attributes(param))
        {
            sink.push(diagnostics::invalid_capture_qualifier(problem.message, problem.span));
        }
        decisions.push((param.name.clone(), capture_decision(decl, param, &decisions, &mut sink)));
    }

    for (name, span) in scope.illegal_references() {
        let captured = decisions
            .iter()
            .any(|(parameter, decision)| parameter == name && decision.field().is_some());
        sink.push(diagnostics::illegal_parameter_reference(name, span, captured));
    }

    let mut rewritten = decl.clone();
    let synthesized: Vec<Member> = decisions
        .iter()
        .filter_map(|(_, decision)| decision.field())
        .map(|field| Member::Field(field.to_field_decl()))
        .collect();
    if !synthesized.is_empty() {
        rewritten.members.splice(0..0, synthesized);
    }

    let resolved = ResolvedType {
        name: decl.name.clone(),
        decisions,
        scope,
    };
    debug!(
        target: "capture",
        ty = %decl.name,
        parameters = decl.primary_parameters().len(),
        captured = resolved.synthesized_fields().count(),
        diagnostics = sink.len(),
        "resolved primary constructor parameters"
    );
    (rewritten, resolved, sink)
}

fn capture_decision(
    decl: &TypeDecl,
    param: &PrimaryConstructorParameter,
    earlier: &[(String, CaptureDecision)],
    sink: &mut Vec<Diagnostic>,
) -> CaptureDecision {
    let Some(visibility) = param.accessibility() else {
        return CaptureDecision::InitializerOnly;
    };
    if let Some(member) = decl.find_member(&param.name) {
        sink.push(diagnostics::capture_conflicts_with_member(
            &param.name,
            param.name_span,
            member.name_span(),
        ));
        return CaptureDecision::InitializerOnly;
    }
    if earlier.iter().any(|(name, _)| *name == param.name) {
        return CaptureDecision::InitializerOnly;
    }
    CaptureDecision::Captured(SynthesizedField::from_parameter(param, visibility))
}
