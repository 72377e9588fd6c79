//! Modifier validation shared by declared fields and captured parameters.
//!
//! Both sites produce a field, so both go through [`validate_field_modifiers`].
//! Callers decide which diagnostic code a problem maps to.

use crate::diagnostics::Span;
use crate::frontend::ast::{
    Attribute, Modifier, ModifierKind, PrimaryConstructorParameter, TypeKind, Visibility,
};

/// Where the field being validated comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSite {
    Declared,
    CapturedParameter,
}

impl FieldSite {
    fn noun(self) -> &'static str {
        match self {
            FieldSite::Declared => "a field",
            FieldSite::CapturedParameter => "a primary constructor parameter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifierProblem {
    pub message: String,
    pub span: Span,
}

impl QualifierProblem {
    fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// Validate a modifier list that will end up on a field of `owner`.
#[must_use]
pub fn validate_field_modifiers(
    modifiers: &[Modifier],
    owner: TypeKind,
    site: FieldSite,
) -> Vec<QualifierProblem> {
    let mut problems = Vec::new();
    let mut accessibility: Vec<(Visibility, Span)> = Vec::new();
    let mut readonly: Option<Span> = None;
    let mut storage: Option<&Modifier> = None;

    for modifier in modifiers {
        match modifier.kind() {
            ModifierKind::Accessibility(visibility) => {
                if accessibility.iter().any(|(seen, _)| *seen == visibility) {
                    problems.push(QualifierProblem::new(
                        format!("duplicate accessibility modifier `{visibility}`"),
                        modifier.span,
                    ));
                    continue;
                }
                if let Some((first, _)) = accessibility.first() {
                    let pair = [*first, visibility];
                    let legal_pair = accessibility.len() == 1
                        && (pair == [Visibility::Protected, Visibility::Internal]
                            || pair == [Visibility::Internal, Visibility::Protected]);
                    if !legal_pair {
                        problems.push(QualifierProblem::new(
                            format!(
                                "conflicting accessibility modifiers `{first}` and `{visibility}`"
                            ),
                            modifier.span,
                        ));
                        continue;
                    }
                }
                if owner == TypeKind::Struct && visibility == Visibility::Protected {
                    problems.push(QualifierProblem::new(
                        "`protected` is not valid on members of a struct",
                        modifier.span,
                    ));
                }
                accessibility.push((visibility, modifier.span));
            }
            ModifierKind::Readonly => {
                if readonly.is_some() {
                    problems.push(QualifierProblem::new(
                        "duplicate `readonly` modifier",
                        modifier.span,
                    ));
                }
                readonly.get_or_insert(modifier.span);
            }
            ModifierKind::Static | ModifierKind::Const => {
                if site == FieldSite::CapturedParameter {
                    problems.push(QualifierProblem::new(
                        format!(
                            "`{}` is not valid on a primary constructor parameter; \
                             captured values are per instance",
                            modifier.text
                        ),
                        modifier.span,
                    ));
                    continue;
                }
                match storage {
                    Some(previous) if previous.text == modifier.text => {
                        problems.push(QualifierProblem::new(
                            format!("duplicate `{}` modifier", modifier.text),
                            modifier.span,
                        ));
                    }
                    Some(previous) => problems.push(QualifierProblem::new(
                        format!("`{}` cannot be combined with `{}`", modifier.text, previous.text),
                        modifier.span,
                    )),
                    None => storage = Some(modifier),
                }
            }
            ModifierKind::Other => problems.push(QualifierProblem::new(
                format!("`{}` is not valid on {}", modifier.text, site.noun()),
                modifier.span,
            )),
        }
    }

    if let (Some(span), Some(storage)) = (readonly, storage) {
        if storage.text == "const" {
            problems.push(QualifierProblem::new(
                "`readonly` cannot be combined with `const`",
                span,
            ));
        }
    }
    if site == FieldSite::CapturedParameter && accessibility.is_empty() {
        if let Some(span) = readonly {
            problems.push(QualifierProblem::new(
                "`readonly` without an accessibility modifier does not capture the parameter; \
                 add one such as `private readonly`",
                span,
            ));
        }
    }
    problems
}

/// Attribute targets are only meaningful on parameters that become fields.
#[must_use]
pub fn validate_parameter_attributes(
    parameter: &PrimaryConstructorParameter,
) -> Vec<QualifierProblem> {
    parameter
        .attributes
        .iter()
        .filter_map(|attribute| attribute_problem(attribute, parameter.is_captured()))
        .collect()
}

fn attribute_problem(attribute: &Attribute, captured: bool) -> Option<QualifierProblem> {
    match attribute.target.as_deref() {
        None | Some("param") => None,
        Some("field") if captured => None,
        Some("field") => Some(QualifierProblem::new(
            format!(
                "attribute `{attribute}` targets a field, but the parameter is not captured"
            ),
            attribute.span,
        )),
        Some(other) => Some(QualifierProblem::new(
            format!(
                "`{other}` is not a valid attribute target for a primary constructor parameter"
            ),
            attribute.span,
        )),
    }
}
