//! Symbol table for declared and built-in types.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::diagnostics::{codes, error};
use super::types::{ParamConstraint, Ty, TypeCategory, numeric_rank};
use crate::capture::qualifiers::{FieldSite, validate_field_modifiers};
use crate::diagnostics::{Diagnostic, Span};
use crate::frontend::ast::{
    AccessorKind, CompilationUnit, FieldOrigin, GenericConstraint, GenericParam, IndexerDecl,
    Member, PropertyBody, TypeDecl, TypeExpr, TypeKind, TypeSuffix,
};
use crate::syntax::expr::MemberName;

const MAX_BASE_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSig {
    pub name: String,
    pub ty: Ty,
    pub has_default: bool,
}

impl ParamSig {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Ty) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default: false,
        }
    }

    fn substitute(&self, map: &HashMap<String, Ty>) -> Self {
        Self {
            name: self.name.clone(),
            ty: self.ty.substitute(map),
            has_default: self.has_default,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    Field { readonly: bool },
    Property { settable: bool },
    Method { params: Vec<ParamSig> },
}

/// Resolved member signature. `ty` is the value type for fields and
/// properties and the return type for methods.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSig {
    pub name: String,
    pub kind: MemberKind,
    pub ty: Ty,
    pub is_static: bool,
    pub owner: String,
}

impl MemberSig {
    fn property(owner: &str, name: &str, ty: Ty) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Property { settable: false },
            ty,
            is_static: false,
            owner: owner.into(),
        }
    }

    fn method(owner: &str, name: &str, params: Vec<ParamSig>, ret: Ty) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Method { params },
            ty: ret,
            is_static: false,
            owner: owner.into(),
        }
    }

    #[must_use]
    pub fn is_method(&self) -> bool {
        matches!(self.kind, MemberKind::Method { .. })
    }

    /// Whether assignment through this member is allowed.
    #[must_use]
    pub fn is_settable(&self) -> bool {
        match self.kind {
            MemberKind::Field { readonly } => !readonly,
            MemberKind::Property { settable } => settable,
            MemberKind::Method { .. } => false,
        }
    }

    fn substitute(&self, map: &HashMap<String, Ty>) -> Self {
        let kind = match &self.kind {
            MemberKind::Method { params } => MemberKind::Method {
                params: params.iter().map(|param| param.substitute(map)).collect(),
            },
            other => other.clone(),
        };
        Self {
            name: self.name.clone(),
            kind,
            ty: self.ty.substitute(map),
            is_static: self.is_static,
            owner: self.owner.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexerSig {
    pub params: Vec<ParamSig>,
    pub ty: Ty,
    pub settable: bool,
}

impl IndexerSig {
    fn substitute(&self, map: &HashMap<String, Ty>) -> Self {
        Self {
            params: self.params.iter().map(|param| param.substitute(map)).collect(),
            ty: self.ty.substitute(map),
            settable: self.settable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericInfo {
    pub name: String,
    pub constraint: ParamConstraint,
}

impl GenericInfo {
    #[must_use]
    pub fn as_ty(&self) -> Ty {
        Ty::Param {
            name: self.name.clone(),
            constraint: self.constraint.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub name: String,
    pub category: TypeCategory,
    pub generics: Vec<GenericInfo>,
    pub base: Option<Ty>,
    pub members: Vec<MemberSig>,
    pub indexers: Vec<IndexerSig>,
    /// Primary constructor parameters; empty for a parameterless constructor.
    pub constructor: Vec<ParamSig>,
    pub builtin: bool,
    pub span: Option<Span>,
}

impl TypeInfo {
    fn builtin(name: &str, category: TypeCategory) -> Self {
        Self {
            name: name.into(),
            category,
            generics: Vec::new(),
            base: None,
            members: Vec::new(),
            indexers: Vec::new(),
            constructor: Vec::new(),
            builtin: true,
            span: None,
        }
    }

    fn with_generics(mut self, names: &[&str]) -> Self {
        self.generics = names
            .iter()
            .map(|name| GenericInfo {
                name: (*name).into(),
                constraint: ParamConstraint::None,
            })
            .collect();
        self
    }

    /// The type as seen from inside its own declaration.
    #[must_use]
    pub fn self_ty(&self) -> Ty {
        Ty::generic(
            self.name.clone(),
            self.generics.iter().map(GenericInfo::as_ty).collect(),
        )
    }

    #[must_use]
    pub fn find_member(&self, name: &str) -> Option<&MemberSig> {
        self.members.iter().find(|member| member.name == name)
    }

    fn substitution(&self, args: &[Ty]) -> HashMap<String, Ty> {
        self.generics
            .iter()
            .zip(args)
            .map(|(generic, arg)| (generic.name.clone(), arg.clone()))
            .collect()
    }

    fn param(&self, name: &str) -> Ty {
        self.generics
            .iter()
            .find(|generic| generic.name == name)
            .map_or(Ty::Error, GenericInfo::as_ty)
    }
}

/// Queries the analyzers make against the symbol table.
pub trait TypeOracle: Sync {
    fn lookup_type(&self, name: &str) -> Option<&TypeInfo>;
    fn classify(&self, ty: &Ty) -> TypeCategory;
    fn resolve_member(&self, ty: &Ty, name: &MemberName) -> Option<MemberSig>;
    fn resolve_indexer(&self, ty: &Ty, arity: usize) -> Option<IndexerSig>;
}

#[derive(Debug, Clone)]
pub struct TypeTable {
    types: HashMap<String, TypeInfo>,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl TypeTable {
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut table = Self {
            types: HashMap::new(),
        };
        for builtin in builtin_types() {
            table.types.insert(builtin.name.clone(), builtin);
        }
        table
    }

    /// Build the table for `unit`, reporting declaration-level problems.
    #[must_use]
    pub fn build(unit: &CompilationUnit) -> (Self, Vec<Diagnostic>) {
        let mut table = Self::with_builtins();
        let mut diagnostics = Vec::new();

        let mut registered = Vec::new();
        for decl in &unit.types {
            if let Some(existing) = table.types.get(&decl.name) {
                let message = if existing.builtin {
                    format!("type `{}` conflicts with a built-in type", decl.name)
                } else {
                    format!("type `{}` is declared more than once", decl.name)
                };
                diagnostics.push(error(codes::DUPLICATE_TYPE, message, Some(decl.name_span)));
                continue;
            }
            table.types.insert(decl.name.clone(), skeleton(decl));
            registered.push(decl);
        }

        let resolved: Vec<_> = registered
            .iter()
            .map(|decl| table.resolve_signatures(decl, &mut diagnostics))
            .collect();
        for (decl, signatures) in registered.iter().zip(resolved) {
            if let Some(info) = table.types.get_mut(&decl.name) {
                info.base = signatures.base;
                info.members = signatures.members;
                info.indexers = signatures.indexers;
                info.constructor = signatures.constructor;
            }
        }
        for decl in &registered {
            table.check_base_cycle(decl, &mut diagnostics);
        }
        debug!(target: "typeck", types = registered.len(), "type table built");
        (table, diagnostics)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.values()
    }

    /// Resolve a written type with `scope` providing generic parameters.
    ///
    /// # Errors
    /// Returns a `TCK001` diagnostic when the type cannot be found or its
    /// argument count is wrong.
    pub fn resolve_type_expr(
        &self,
        expr: &TypeExpr,
        scope: &[GenericInfo],
    ) -> Result<Ty, Diagnostic> {
        let mut ty = self.resolve_named(expr, scope)?;
        for suffix in &expr.suffixes {
            ty = match suffix {
                TypeSuffix::Array => Ty::Array(Box::new(ty)),
                // `string?` is an annotation only: references are already nullable.
                TypeSuffix::Nullable => match self.classify(&ty) {
                    TypeCategory::Reference => ty,
                    _ => Ty::nullable(ty),
                },
            };
        }
        Ok(ty)
    }

    fn resolve_named(&self, expr: &TypeExpr, scope: &[GenericInfo]) -> Result<Ty, Diagnostic> {
        if let Some(generic) = scope.iter().find(|generic| generic.name == expr.name) {
            if !expr.args.is_empty() {
                return Err(error(
                    codes::UNKNOWN_TYPE,
                    format!("generic parameter `{}` does not take type arguments", expr.name),
                    Some(expr.span),
                ));
            }
            return Ok(generic.as_ty());
        }
        if expr.name == "void" && expr.args.is_empty() {
            return Ok(Ty::Void);
        }
        let Some(info) = self.types.get(&expr.name) else {
            return Err(error(
                codes::UNKNOWN_TYPE,
                format!("unknown type `{}`", expr.name),
                Some(expr.span),
            ));
        };
        if info.generics.len() != expr.args.len() {
            return Err(error(
                codes::UNKNOWN_TYPE,
                format!(
                    "type `{}` expects {} type argument(s), found {}",
                    info.name,
                    info.generics.len(),
                    expr.args.len()
                ),
                Some(expr.span),
            ));
        }
        let args = expr
            .args
            .iter()
            .map(|arg| self.resolve_type_expr(arg, scope))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Ty::generic(info.name.clone(), args))
    }

    /// Generic parameters visible inside `decl`.
    #[must_use]
    pub fn generic_scope(&self, decl: &TypeDecl) -> Vec<GenericInfo> {
        self.types
            .get(&decl.name)
            .map(|info| info.generics.clone())
            .unwrap_or_else(|| generic_infos(&decl.generics))
    }

    fn resolve_signatures(&self, decl: &TypeDecl, diagnostics: &mut Vec<Diagnostic>) -> Signatures {
        let scope = self.generic_scope(decl);
        let mut resolve = |expr: &TypeExpr, diagnostics: &mut Vec<Diagnostic>| {
            self.resolve_type_expr(expr, &scope).unwrap_or_else(|diagnostic| {
                diagnostics.push(diagnostic);
                Ty::Error
            })
        };

        for generic in &decl.generics {
            if let Some(GenericConstraint::Type(constraint)) = &generic.constraint {
                match resolve(constraint, diagnostics) {
                    ty @ Ty::Named { .. } if self.classify(&ty) == TypeCategory::Reference => {}
                    Ty::Error => {}
                    other => diagnostics.push(error(
                        codes::INVALID_BASE,
                        format!("`{other}` cannot be used as a constraint; only class types can"),
                        Some(constraint.span),
                    )),
                }
            }
        }

        let base = decl.base.as_ref().and_then(|base| {
            if decl.kind == TypeKind::Struct {
                diagnostics.push(error(
                    codes::INVALID_BASE,
                    format!("struct `{}` cannot declare a base type", decl.name),
                    Some(base.ty.span),
                ));
                return None;
            }
            match resolve(&base.ty, diagnostics) {
                Ty::Error => None,
                ty @ Ty::Named { .. }
                    if self.classify(&ty) == TypeCategory::Reference
                        && !ty.is_named("string") =>
                {
                    Some(ty)
                }
                other => {
                    diagnostics.push(error(
                        codes::INVALID_BASE,
                        format!("base type `{other}` of `{}` is not a class", decl.name),
                        Some(base.ty.span),
                    ));
                    None
                }
            }
        });

        let constructor = decl
            .primary_parameters()
            .iter()
            .map(|param| {
                let ty = resolve(&param.ty, diagnostics);
                ParamSig {
                    name: param.name.clone(),
                    ty: value_type(ty, &param.ty, diagnostics),
                    has_default: param.default.is_some(),
                }
            })
            .collect();

        let mut members = Vec::new();
        let mut indexers: Vec<IndexerSig> = Vec::new();
        let mut seen = HashSet::new();
        for member in &decl.members {
            if let Member::Field(field) = member {
                if field.origin == FieldOrigin::Declared {
                    let problems =
                        validate_field_modifiers(&field.modifiers, decl.kind, FieldSite::Declared);
                    for problem in problems {
                        diagnostics.push(error(
                            codes::INVALID_MODIFIER,
                            problem.message,
                            Some(problem.span),
                        ));
                    }
                }
            }
            if let Member::Indexer(indexer) = member {
                let signature = self.indexer_signature(indexer, &mut resolve, diagnostics);
                if indexers.iter().any(|existing| existing.params.len() == signature.params.len()) {
                    diagnostics.push(error(
                        codes::DUPLICATE_MEMBER,
                        format!(
                            "`{}` already declares an indexer with {} parameter(s)",
                            decl.name,
                            signature.params.len()
                        ),
                        Some(indexer.span),
                    ));
                } else {
                    indexers.push(signature);
                }
                continue;
            }
            let Some(name) = member.name() else {
                continue;
            };
            if !seen.insert(name.to_string()) {
                diagnostics.push(error(
                    codes::DUPLICATE_MEMBER,
                    format!("`{}` already declares a member named `{name}`", decl.name),
                    Some(member.name_span()),
                ));
                continue;
            }
            if name == decl.name {
                diagnostics.push(error(
                    codes::DUPLICATE_MEMBER,
                    format!("member `{name}` cannot have the same name as its enclosing type"),
                    Some(member.name_span()),
                ));
            }
            if let Some(signature) =
                self.member_signature(decl, member, &mut resolve, diagnostics)
            {
                members.push(signature);
            }
        }

        Signatures {
            base,
            members,
            indexers,
            constructor,
        }
    }

    fn member_signature(
        &self,
        decl: &TypeDecl,
        member: &Member,
        resolve: &mut impl FnMut(&TypeExpr, &mut Vec<Diagnostic>) -> Ty,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<MemberSig> {
        let is_static = member.is_static();
        let (name, kind, ty) = match member {
            Member::Field(field) => {
                // Captured fields share their type with the constructor parameter,
                // which already reported any problem with it.
                let mut scratch = Vec::new();
                let sink = if field.origin.is_captured() {
                    &mut scratch
                } else {
                    &mut *diagnostics
                };
                let ty = value_type(resolve(&field.ty, sink), &field.ty, sink);
                (
                    field.name.clone(),
                    MemberKind::Field {
                        readonly: field.is_readonly(),
                    },
                    ty,
                )
            }
            Member::Property(property) => (
                property.name.clone(),
                MemberKind::Property {
                    settable: property.has_setter(),
                },
                value_type(resolve(&property.ty, diagnostics), &property.ty, diagnostics),
            ),
            Member::Method(method) => {
                let params = method
                    .parameters
                    .iter()
                    .map(|param| ParamSig {
                        name: param.name.clone(),
                        ty: value_type(resolve(&param.ty, diagnostics), &param.ty, diagnostics),
                        has_default: param.default.is_some(),
                    })
                    .collect();
                (
                    method.name.clone(),
                    MemberKind::Method { params },
                    resolve(&method.return_type, diagnostics),
                )
            }
            Member::Indexer(_) => return None,
        };
        Some(MemberSig {
            name,
            kind,
            ty,
            is_static,
            owner: decl.name.clone(),
        })
    }

    fn indexer_signature(
        &self,
        indexer: &IndexerDecl,
        resolve: &mut impl FnMut(&TypeExpr, &mut Vec<Diagnostic>) -> Ty,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> IndexerSig {
        let params = indexer
            .parameters
            .iter()
            .map(|param| ParamSig {
                name: param.name.clone(),
                ty: value_type(resolve(&param.ty, diagnostics), &param.ty, diagnostics),
                has_default: param.default.is_some(),
            })
            .collect();
        let settable = match &indexer.body {
            PropertyBody::Accessors(accessors) => accessors
                .iter()
                .any(|accessor| accessor.kind == AccessorKind::Set),
            PropertyBody::Expression(_) => false,
        };
        IndexerSig {
            params,
            ty: value_type(resolve(&indexer.ty, diagnostics), &indexer.ty, diagnostics),
            settable,
        }
    }

    fn check_base_cycle(&self, decl: &TypeDecl, diagnostics: &mut Vec<Diagnostic>) {
        let mut current = self.types.get(&decl.name).and_then(|info| info.base.clone());
        let mut depth = 0;
        while let Some(Ty::Named { name, .. }) = current {
            if name == decl.name || depth > MAX_BASE_DEPTH {
                let span = decl.base.as_ref().map_or(decl.name_span, |base| base.ty.span);
                diagnostics.push(error(
                    codes::INVALID_BASE,
                    format!("circular base type dependency involving `{}`", decl.name),
                    Some(span),
                ));
                return;
            }
            current = self.types.get(&name).and_then(|info| info.base.clone());
            depth += 1;
        }
    }

    fn member_in_chain(&self, type_name: &str, args: &[Ty], member: &str) -> Option<MemberSig> {
        let mut current = (type_name.to_string(), args.to_vec());
        for _ in 0..MAX_BASE_DEPTH {
            let info = self.types.get(&current.0)?;
            let map = info.substitution(&current.1);
            if let Some(found) = info.find_member(member) {
                return Some(found.substitute(&map));
            }
            match info.base.as_ref().map(|base| base.substitute(&map)) {
                Some(Ty::Named { name, args }) => current = (name, args),
                _ => return None,
            }
        }
        None
    }

    fn indexer_in_chain(
        &self,
        type_name: &str,
        args: &[Ty],
        accept: &dyn Fn(&IndexerSig) -> bool,
    ) -> Option<IndexerSig> {
        let mut current = (type_name.to_string(), args.to_vec());
        for _ in 0..MAX_BASE_DEPTH {
            let info = self.types.get(&current.0)?;
            let map = info.substitution(&current.1);
            if let Some(found) = info
                .indexers
                .iter()
                .map(|indexer| indexer.substitute(&map))
                .find(|indexer| accept(indexer))
            {
                return Some(found);
            }
            match info.base.as_ref().map(|base| base.substitute(&map)) {
                Some(Ty::Named { name, args }) => current = (name, args),
                _ => return None,
            }
        }
        None
    }

    fn lookup_member(&self, ty: &Ty, name: &str) -> Option<MemberSig> {
        let specific = match ty {
            Ty::Named { name: type_name, args } => self.member_in_chain(type_name, args, name),
            Ty::Array(_) => {
                (name == "Length").then(|| MemberSig::property("Array", name, Ty::int()))
            }
            Ty::Nullable(inner) => match name {
                "HasValue" => Some(MemberSig::property("Nullable", name, Ty::bool())),
                "Value" => Some(MemberSig::property("Nullable", name, (**inner).clone())),
                "GetValueOrDefault" => Some(MemberSig::method(
                    "Nullable",
                    name,
                    Vec::new(),
                    (**inner).clone(),
                )),
                _ => None,
            },
            Ty::Param {
                constraint: ParamConstraint::Base(base),
                ..
            } => return self.lookup_member(&Ty::named(base.clone()), name),
            Ty::Param { .. } => None,
            Ty::Delegate { params, ret } => (name == "Invoke").then(|| {
                let params = params
                    .iter()
                    .enumerate()
                    .map(|(index, ty)| ParamSig::new(format!("arg{index}"), ty.clone()))
                    .collect();
                MemberSig::method("Delegate", name, params, (**ret).clone())
            }),
            Ty::Null | Ty::Void | Ty::Error => return None,
        };
        specific.or_else(|| self.member_in_chain("object", &[], name))
    }

    fn find_indexer(&self, ty: &Ty, accept: &dyn Fn(&IndexerSig) -> bool) -> Option<IndexerSig> {
        match ty {
            Ty::Named { name, args } => self.indexer_in_chain(name, args, accept),
            Ty::Array(element) => {
                let indexer = IndexerSig {
                    params: vec![ParamSig::new("index", Ty::int())],
                    ty: (**element).clone(),
                    settable: true,
                };
                accept(&indexer).then_some(indexer)
            }
            Ty::Param {
                constraint: ParamConstraint::Base(base),
                ..
            } => self.find_indexer(&Ty::named(base.clone()), accept),
            _ => None,
        }
    }
}

struct Signatures {
    base: Option<Ty>,
    members: Vec<MemberSig>,
    indexers: Vec<IndexerSig>,
    constructor: Vec<ParamSig>,
}

impl TypeOracle for TypeTable {
    fn lookup_type(&self, name: &str) -> Option<&TypeInfo> {
        self.types.get(name)
    }

    fn classify(&self, ty: &Ty) -> TypeCategory {
        match ty {
            Ty::Named { name, .. } => self
                .types
                .get(name)
                .map_or(TypeCategory::Unknown, |info| info.category),
            Ty::Array(_) | Ty::Delegate { .. } | Ty::Null => TypeCategory::Reference,
            Ty::Nullable(inner) => match self.classify(inner) {
                TypeCategory::Value => TypeCategory::NullableValue,
                TypeCategory::Reference => TypeCategory::Reference,
                _ => TypeCategory::Unknown,
            },
            Ty::Param { constraint, .. } => match constraint {
                ParamConstraint::Class => TypeCategory::Reference,
                ParamConstraint::Struct => TypeCategory::Value,
                ParamConstraint::Base(base) => match self.types.get(base) {
                    Some(info) if info.category == TypeCategory::Reference => {
                        TypeCategory::Reference
                    }
                    _ => TypeCategory::Unknown,
                },
                ParamConstraint::None => TypeCategory::Unknown,
            },
            Ty::Void => TypeCategory::Void,
            Ty::Error => TypeCategory::Unknown,
        }
    }

    fn resolve_member(&self, ty: &Ty, name: &MemberName) -> Option<MemberSig> {
        match name {
            MemberName::Static(text) => self.lookup_member(ty, text),
            MemberName::Indexed(text) => {
                let indexer = self.find_indexer(ty, &|indexer| {
                    matches!(indexer.params.as_slice(), [param] if param.ty.is_named("string"))
                })?;
                Some(MemberSig {
                    name: format!("${text}"),
                    kind: MemberKind::Property {
                        settable: indexer.settable,
                    },
                    ty: indexer.ty,
                    is_static: false,
                    owner: ty.to_string(),
                })
            }
        }
    }

    fn resolve_indexer(&self, ty: &Ty, arity: usize) -> Option<IndexerSig> {
        self.find_indexer(ty, &|indexer| indexer.params.len() == arity)
    }
}

/// Whether a value of type `from` may be stored where `to` is expected.
#[must_use]
pub fn is_assignable(oracle: &dyn TypeOracle, from: &Ty, to: &Ty) -> bool {
    if from == to || from.is_error() || to.is_error() {
        return true;
    }
    match (from, to) {
        (Ty::Void, _) | (_, Ty::Void) => false,
        (Ty::Null, _) => matches!(
            oracle.classify(to),
            TypeCategory::Reference | TypeCategory::NullableValue
        ),
        (Ty::Nullable(from_inner), Ty::Nullable(to_inner)) => {
            is_assignable(oracle, from_inner, to_inner)
        }
        (_, Ty::Nullable(to_inner)) => is_assignable(oracle, from, to_inner),
        (Ty::Param {
            constraint: ParamConstraint::Base(base),
            ..
        }, _) => is_assignable(oracle, &Ty::named(base.clone()), to),
        (Ty::Delegate { params: from_params, ret: from_ret }, Ty::Delegate { params, ret }) => {
            from_params.len() == params.len()
                && from_params
                    .iter()
                    .zip(params)
                    .all(|(from, to)| from == to || from.is_error() || to.is_error())
                && (ret.as_ref() == &Ty::Void || is_assignable(oracle, from_ret, ret))
        }
        _ if to.is_named("object") => oracle.classify(from) != TypeCategory::Void,
        (Ty::Named { .. }, Ty::Named { .. }) => {
            if let (Some(from_rank), Some(to_rank)) = (numeric_rank(from), numeric_rank(to)) {
                return from_rank <= to_rank;
            }
            derives_from(oracle, from, to)
        }
        _ => false,
    }
}

fn derives_from(oracle: &dyn TypeOracle, from: &Ty, to: &Ty) -> bool {
    let mut current = from.clone();
    for _ in 0..MAX_BASE_DEPTH {
        if &current == to {
            return true;
        }
        let Ty::Named { name, args } = &current else {
            return false;
        };
        let Some(info) = oracle.lookup_type(name) else {
            return false;
        };
        let map = info.substitution(args);
        match info.base.as_ref() {
            Some(base) => current = base.substitute(&map),
            None => return false,
        }
    }
    false
}

fn value_type(ty: Ty, written: &TypeExpr, diagnostics: &mut Vec<Diagnostic>) -> Ty {
    if ty == Ty::Void {
        diagnostics.push(error(
            codes::UNKNOWN_TYPE,
            "`void` is only valid as a method return type",
            Some(written.span),
        ));
        return Ty::Error;
    }
    ty
}

fn skeleton(decl: &TypeDecl) -> TypeInfo {
    TypeInfo {
        name: decl.name.clone(),
        category: match decl.kind {
            TypeKind::Class => TypeCategory::Reference,
            TypeKind::Struct => TypeCategory::Value,
        },
        generics: generic_infos(&decl.generics),
        base: None,
        members: Vec::new(),
        indexers: Vec::new(),
        constructor: Vec::new(),
        builtin: false,
        span: Some(decl.name_span),
    }
}

fn generic_infos(generics: &[GenericParam]) -> Vec<GenericInfo> {
    generics
        .iter()
        .map(|generic| GenericInfo {
            name: generic.name.clone(),
            constraint: match &generic.constraint {
                None => ParamConstraint::None,
                Some(GenericConstraint::Class) => ParamConstraint::Class,
                Some(GenericConstraint::Struct) => ParamConstraint::Struct,
                Some(GenericConstraint::Type(ty)) => ParamConstraint::Base(ty.name.clone()),
            },
        })
        .collect()
}

fn builtin_types() -> Vec<TypeInfo> {
    let mut types: Vec<TypeInfo> = ["int", "long", "double", "bool", "char"]
        .into_iter()
        .map(|name| TypeInfo::builtin(name, TypeCategory::Value))
        .collect();

    let mut object = TypeInfo::builtin("object", TypeCategory::Reference);
    object.members = vec![
        MemberSig::method("object", "ToString", Vec::new(), Ty::string()),
        MemberSig::method("object", "GetHashCode", Vec::new(), Ty::int()),
    ];
    types.push(object);

    let mut string = TypeInfo::builtin("string", TypeCategory::Reference);
    string.members = vec![
        MemberSig::property("string", "Length", Ty::int()),
        MemberSig::method("string", "ToUpper", Vec::new(), Ty::string()),
        MemberSig::method("string", "ToLower", Vec::new(), Ty::string()),
        MemberSig::method("string", "Trim", Vec::new(), Ty::string()),
        MemberSig::method(
            "string",
            "Contains",
            vec![ParamSig::new("value", Ty::string())],
            Ty::bool(),
        ),
    ];
    string.indexers = vec![IndexerSig {
        params: vec![ParamSig::new("index", Ty::int())],
        ty: Ty::char(),
        settable: false,
    }];
    types.push(string);

    let mut list = TypeInfo::builtin("List", TypeCategory::Reference).with_generics(&["T"]);
    let element = list.param("T");
    list.members = vec![
        MemberSig::property("List", "Count", Ty::int()),
        MemberSig::method("List", "Add", vec![ParamSig::new("item", element.clone())], Ty::Void),
    ];
    list.indexers = vec![IndexerSig {
        params: vec![ParamSig::new("index", Ty::int())],
        ty: element,
        settable: true,
    }];
    types.push(list);

    let mut dictionary =
        TypeInfo::builtin("Dictionary", TypeCategory::Reference).with_generics(&["TKey", "TValue"]);
    let key = dictionary.param("TKey");
    let value = dictionary.param("TValue");
    dictionary.members = vec![
        MemberSig::property("Dictionary", "Count", Ty::int()),
        MemberSig::method(
            "Dictionary",
            "ContainsKey",
            vec![ParamSig::new("key", key.clone())],
            Ty::bool(),
        ),
    ];
    dictionary.indexers = vec![IndexerSig {
        params: vec![ParamSig::new("key", key)],
        ty: value,
        settable: true,
    }];
    types.push(dictionary);

    types
}

#[cfg(test)]
mod tests;
