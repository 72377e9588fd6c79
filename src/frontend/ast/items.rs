use super::statements::Block;
use super::types::TypeExpr;
use crate::diagnostics::Span;
use crate::syntax::expr::ExprNode;
use std::fmt;

/// Parsed source file: a flat list of type declarations.
#[derive(Debug, Clone, Default)]
pub struct CompilationUnit {
    pub types: Vec<TypeDecl>,
}

impl CompilationUnit {
    #[must_use]
    pub fn find_type(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|decl| decl.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Struct,
}

impl TypeKind {
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Internal,
    Protected,
    ProtectedInternal,
    Private,
}

impl Visibility {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Internal => "internal",
            Visibility::Protected => "protected",
            Visibility::ProtectedInternal => "protected internal",
            Visibility::Private => "private",
        }
    }

    /// Map a single accessibility keyword.
    #[must_use]
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text {
            "public" => Some(Visibility::Public),
            "internal" => Some(Visibility::Internal),
            "protected" => Some(Visibility::Protected),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Modifier exactly as written; validation happens during semantic analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKind {
    Accessibility(Visibility),
    Readonly,
    Static,
    Const,
    Other,
}

impl Modifier {
    #[must_use]
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ModifierKind {
        if let Some(visibility) = Visibility::from_keyword(&self.text) {
            return ModifierKind::Accessibility(visibility);
        }
        match self.text.as_str() {
            "readonly" => ModifierKind::Readonly,
            "static" => ModifierKind::Static,
            "const" => ModifierKind::Const,
            _ => ModifierKind::Other,
        }
    }

    #[must_use]
    pub fn is_accessibility(&self) -> bool {
        matches!(self.kind(), ModifierKind::Accessibility(_))
    }
}

/// Accessibility spelled by a modifier list, folding `protected internal`.
///
/// Returns the first accessibility when the list is conflicting; callers that
/// care about conflicts run the modifier validator first.
#[must_use]
pub fn visibility_of(modifiers: &[Modifier]) -> Option<Visibility> {
    let mut found: Vec<Visibility> = Vec::new();
    for modifier in modifiers {
        if let ModifierKind::Accessibility(visibility) = modifier.kind() {
            if !found.contains(&visibility) {
                found.push(visibility);
            }
        }
    }
    match found.as_slice() {
        [] => None,
        [Visibility::Protected, Visibility::Internal]
        | [Visibility::Internal, Visibility::Protected] => Some(Visibility::ProtectedInternal),
        [first, ..] => Some(*first),
    }
}

#[must_use]
pub fn has_modifier(modifiers: &[Modifier], kind: ModifierKind) -> bool {
    modifiers.iter().any(|modifier| modifier.kind() == kind)
}

/// `[target: Name]` attribute entry. A list `[field: A, B]` yields one entry per name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub target: Option<String>,
    pub name: String,
    pub span: Span,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "[{target}: {}]", self.name),
            None => write!(f, "[{}]", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenericConstraint {
    Class,
    Struct,
    Type(TypeExpr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParam {
    pub name: String,
    pub span: Span,
    pub constraint: Option<GenericConstraint>,
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub modifiers: Vec<Modifier>,
    pub kind: TypeKind,
    pub name: String,
    pub name_span: Span,
    pub generics: Vec<GenericParam>,
    /// `None` when the header has no parameter list at all.
    pub primary_parameters: Option<Vec<PrimaryConstructorParameter>>,
    pub base: Option<BaseSpec>,
    pub members: Vec<Member>,
    pub span: Span,
}

impl TypeDecl {
    #[must_use]
    pub fn primary_parameters(&self) -> &[PrimaryConstructorParameter] {
        self.primary_parameters.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn find_member(&self, name: &str) -> Option<&Member> {
        self.members
            .iter()
            .find(|member| member.name() == Some(name))
    }

    /// Fields synthesized from captured primary constructor parameters.
    pub fn captured_fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|member| match member {
            Member::Field(field) if field.origin.is_captured() => Some(field),
            _ => None,
        })
    }
}

/// Base class reference with optional base-constructor arguments.
#[derive(Debug, Clone)]
pub struct BaseSpec {
    pub ty: TypeExpr,
    pub args: Option<Vec<ExprNode>>,
    pub span: Span,
}

/// One entry of a type's primary constructor parameter list.
#[derive(Debug, Clone)]
pub struct PrimaryConstructorParameter {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub ty: TypeExpr,
    pub name: String,
    pub name_span: Span,
    pub default: Option<ExprNode>,
    pub span: Span,
}

impl PrimaryConstructorParameter {
    /// Captured parameters are exactly those carrying an accessibility modifier.
    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.modifiers.iter().any(Modifier::is_accessibility)
    }

    #[must_use]
    pub fn accessibility(&self) -> Option<Visibility> {
        visibility_of(&self.modifiers)
    }

    #[must_use]
    pub fn is_readonly(&self) -> bool {
        has_modifier(&self.modifiers, ModifierKind::Readonly)
    }
}

#[derive(Debug, Clone)]
pub enum Member {
    Field(FieldDecl),
    Property(PropertyDecl),
    Method(MethodDecl),
    Indexer(IndexerDecl),
}

impl Member {
    /// Declared name; indexers are anonymous.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Member::Field(field) => Some(&field.name),
            Member::Property(property) => Some(&property.name),
            Member::Method(method) => Some(&method.name),
            Member::Indexer(_) => None,
        }
    }

    #[must_use]
    pub fn modifiers(&self) -> &[Modifier] {
        match self {
            Member::Field(field) => &field.modifiers,
            Member::Property(property) => &property.modifiers,
            Member::Method(method) => &method.modifiers,
            Member::Indexer(indexer) => &indexer.modifiers,
        }
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        let modifiers = self.modifiers();
        has_modifier(modifiers, ModifierKind::Static)
            || has_modifier(modifiers, ModifierKind::Const)
    }

    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Member::Field(field) => field.span,
            Member::Property(property) => property.span,
            Member::Method(method) => method.span,
            Member::Indexer(indexer) => indexer.span,
        }
    }

    #[must_use]
    pub fn name_span(&self) -> Span {
        match self {
            Member::Field(field) => field.name_span,
            Member::Property(property) => property.name_span,
            Member::Method(method) => method.name_span,
            Member::Indexer(indexer) => indexer.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOrigin {
    Declared,
    /// Synthesized from the named primary constructor parameter.
    Captured { parameter: String },
}

impl FieldOrigin {
    #[must_use]
    pub fn is_captured(&self) -> bool {
        matches!(self, FieldOrigin::Captured { .. })
    }
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub ty: TypeExpr,
    pub name: String,
    pub name_span: Span,
    pub initializer: Option<ExprNode>,
    pub origin: FieldOrigin,
    pub span: Span,
}

impl FieldDecl {
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        has_modifier(&self.modifiers, ModifierKind::Readonly)
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        visibility_of(&self.modifiers).unwrap_or(Visibility::Private)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Get,
    Set,
}

#[derive(Debug, Clone)]
pub enum FunctionBody {
    Expression(ExprNode),
    Block(Block),
}

#[derive(Debug, Clone)]
pub struct Accessor {
    pub kind: AccessorKind,
    /// `None` for auto-implemented accessors (`get;`).
    pub body: Option<FunctionBody>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum PropertyBody {
    /// `=> expr;` shorthand getter.
    Expression(ExprNode),
    Accessors(Vec<Accessor>),
}

#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub ty: TypeExpr,
    pub name: String,
    pub name_span: Span,
    pub body: PropertyBody,
    pub initializer: Option<ExprNode>,
    pub span: Span,
}

impl PropertyDecl {
    #[must_use]
    pub fn is_auto(&self) -> bool {
        match &self.body {
            PropertyBody::Accessors(accessors) => {
                accessors.iter().all(|accessor| accessor.body.is_none())
            }
            PropertyBody::Expression(_) => false,
        }
    }

    #[must_use]
    pub fn has_setter(&self) -> bool {
        match &self.body {
            PropertyBody::Accessors(accessors) => accessors
                .iter()
                .any(|accessor| accessor.kind == AccessorKind::Set),
            PropertyBody::Expression(_) => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub ty: TypeExpr,
    pub name: String,
    pub name_span: Span,
    pub default: Option<ExprNode>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub return_type: TypeExpr,
    pub name: String,
    pub name_span: Span,
    pub parameters: Vec<Parameter>,
    pub body: FunctionBody,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IndexerDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub ty: TypeExpr,
    pub parameters: Vec<Parameter>,
    pub body: PropertyBody,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modifiers(words: &[&str]) -> Vec<Modifier> {
        words
            .iter()
            .map(|word| Modifier::new(*word, Span::new(0, 0)))
            .collect()
    }

    #[test]
    fn protected_internal_folds_into_single_visibility() {
        assert_eq!(
            visibility_of(&modifiers(&["internal", "protected"])),
            Some(Visibility::ProtectedInternal)
        );
        assert_eq!(
            visibility_of(&modifiers(&["readonly", "private"])),
            Some(Visibility::Private)
        );
        assert_eq!(visibility_of(&modifiers(&["readonly"])), None);
    }

    #[test]
    fn modifier_kinds_cover_keywords() {
        let kinds: Vec<_> = modifiers(&["public", "readonly", "static", "const", "virtual"])
            .iter()
            .map(Modifier::kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ModifierKind::Accessibility(Visibility::Public),
                ModifierKind::Readonly,
                ModifierKind::Static,
                ModifierKind::Const,
                ModifierKind::Other,
            ]
        );
    }
}
