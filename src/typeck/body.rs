//! Member body and initializer checking.
//!
//! Each type declaration is checked by its own [`ExprTyper`]; declarations
//! are independent, so the unit is checked in parallel and the per-type
//! results are concatenated in declaration order.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::debug;

use super::diagnostics::{codes, error};
use super::expr::{Expectation, ExprTyper, TyperOutput};
use super::table::{ParamSig, TypeOracle, TypeTable};
use super::types::Ty;
use crate::capture::scope::ReferenceContext;
use crate::diagnostics::Span;
use crate::frontend::ast::{
    AccessorKind, Block, CompilationUnit, FieldDecl, FunctionBody, IndexerDecl, Member,
    MethodDecl, Parameter, PropertyBody, PropertyDecl, Statement, TypeDecl,
};
use crate::syntax::expr::ExprNode;

/// Check every declaration of `unit` against `table`.
#[must_use]
pub fn check_unit(unit: &CompilationUnit, table: &TypeTable, parallel: bool) -> TyperOutput {
    let outputs: Vec<TyperOutput> = if parallel {
        unit.types
            .par_iter()
            .map(|decl| check_type(table, decl))
            .collect()
    } else {
        unit.types.iter().map(|decl| check_type(table, decl)).collect()
    };

    let mut merged = TyperOutput::default();
    for output in outputs {
        merged.diagnostics.extend(output.diagnostics);
        merged.navigation.extend(output.navigation);
        merged.lowered.extend(output.lowered);
    }
    merged
}

/// Check the initializers and member bodies of one declaration.
#[must_use]
pub fn check_type(table: &TypeTable, decl: &TypeDecl) -> TyperOutput {
    let Some(info) = table.lookup_type(&decl.name) else {
        return TyperOutput::default();
    };
    // A second declaration of the same name was reported when the table was built.
    if info.span != Some(decl.name_span) {
        return TyperOutput::default();
    }

    let mut checker = BodyChecker {
        typer: ExprTyper::new(
            table,
            info.self_ty(),
            table.generic_scope(decl),
            info.constructor.clone(),
        ),
    };
    checker.check_primary_defaults(decl, &info.constructor);
    checker.check_base_arguments(table, decl, info.base.as_ref());
    for member in &decl.members {
        checker.check_member(member);
    }
    let output = checker.typer.finish();
    debug!(
        target: "typeck",
        ty = %decl.name,
        diagnostics = output.diagnostics.len(),
        chains = output.navigation.len(),
        "checked member bodies"
    );
    output
}

struct BodyChecker<'a> {
    typer: ExprTyper<'a>,
}

impl BodyChecker<'_> {
    fn check_primary_defaults(&mut self, decl: &TypeDecl, constructor: &[ParamSig]) {
        for (param, sig) in decl.primary_parameters().iter().zip(constructor) {
            if let Some(default) = &param.default {
                self.typer.enter(ReferenceContext::Initializer, false);
                self.typer
                    .check_root(default, Expectation::Type(sig.ty.clone()));
            }
        }
    }

    fn check_base_arguments(&mut self, table: &TypeTable, decl: &TypeDecl, base: Option<&Ty>) {
        let Some(args) = decl.base.as_ref().and_then(|spec| spec.args.as_ref()) else {
            return;
        };
        let params = base.and_then(|base_ty| constructor_for(table, base_ty));

        self.typer.enter(ReferenceContext::Initializer, false);
        let Some(params) = params else {
            for arg in args {
                self.typer.check_root(arg, Expectation::Value);
            }
            return;
        };
        let required = params.iter().filter(|param| !param.has_default).count();
        if args.len() < required || args.len() > params.len() {
            let span = decl
                .base
                .as_ref()
                .map_or(decl.name_span, |spec| spec.span);
            self.typer.report(error(
                codes::ARITY_MISMATCH,
                format!(
                    "base constructor of `{}` takes {} argument(s) but {} were supplied",
                    decl.name,
                    params.len(),
                    args.len()
                ),
                Some(span),
            ));
        }
        for (index, arg) in args.iter().enumerate() {
            let expectation = params
                .get(index)
                .map_or(Expectation::Value, |param| Expectation::Type(param.ty.clone()));
            self.typer.check_root(arg, expectation);
        }
    }

    fn check_member(&mut self, member: &Member) {
        let is_static = member.is_static();
        match member {
            Member::Field(field) => self.check_field(field, is_static),
            Member::Property(property) => self.check_property(property, is_static),
            Member::Method(method) => self.check_method(method, is_static),
            Member::Indexer(indexer) => self.check_indexer(indexer, is_static),
        }
    }

    fn initializer_context(is_static: bool) -> ReferenceContext {
        // Static initializers never see constructor arguments.
        if is_static {
            ReferenceContext::MemberBody
        } else {
            ReferenceContext::Initializer
        }
    }

    fn check_field(&mut self, field: &FieldDecl, is_static: bool) {
        let Some(initializer) = &field.initializer else {
            return;
        };
        let ty = self.typer.resolve_declared_type(&field.ty);
        self.typer.enter(Self::initializer_context(is_static), is_static);
        self.typer.check_root(initializer, Expectation::Type(ty));
    }

    fn check_property(&mut self, property: &PropertyDecl, is_static: bool) {
        let ty = self.typer.resolve_declared_type(&property.ty);
        self.check_property_body(&property.body, &[], &ty, is_static);
        if let Some(initializer) = &property.initializer {
            self.typer.enter(Self::initializer_context(is_static), is_static);
            self.typer.check_root(initializer, Expectation::Type(ty));
        }
    }

    fn check_indexer(&mut self, indexer: &IndexerDecl, is_static: bool) {
        let ty = self.typer.resolve_declared_type(&indexer.ty);
        let params = self.check_parameter_defaults(&indexer.parameters, is_static);
        self.check_property_body(&indexer.body, &params, &ty, is_static);
    }

    fn check_property_body(
        &mut self,
        body: &PropertyBody,
        params: &[(String, Ty)],
        ty: &Ty,
        is_static: bool,
    ) {
        match body {
            PropertyBody::Expression(expr) => {
                self.enter_body(params, is_static);
                self.typer.check_root(expr, Expectation::Type(ty.clone()));
            }
            PropertyBody::Accessors(accessors) => {
                for accessor in accessors {
                    let Some(accessor_body) = &accessor.body else {
                        continue;
                    };
                    self.enter_body(params, is_static);
                    let ret = match accessor.kind {
                        AccessorKind::Get => ty.clone(),
                        AccessorKind::Set => {
                            self.typer.declare("value", ty.clone());
                            Ty::Void
                        }
                    };
                    self.check_function_body(accessor_body, &ret);
                }
            }
        }
    }

    fn check_method(&mut self, method: &MethodDecl, is_static: bool) {
        let ret = self.typer.resolve_declared_type(&method.return_type);
        let params = self.check_parameter_defaults(&method.parameters, is_static);
        self.enter_body(&params, is_static);
        self.check_function_body(&method.body, &ret);
    }

    /// Type parameter defaults; they are evaluated at each call, after construction.
    fn check_parameter_defaults(
        &mut self,
        parameters: &[Parameter],
        is_static: bool,
    ) -> Vec<(String, Ty)> {
        parameters
            .iter()
            .map(|param| {
                let ty = self.typer.resolve_declared_type(&param.ty);
                if let Some(default) = &param.default {
                    self.typer.enter(ReferenceContext::MemberBody, is_static);
                    self.typer.check_root(default, Expectation::Type(ty.clone()));
                }
                (param.name.clone(), ty)
            })
            .collect()
    }

    fn enter_body(&mut self, params: &[(String, Ty)], is_static: bool) {
        self.typer.enter(ReferenceContext::MemberBody, is_static);
        for (name, ty) in params {
            self.typer.declare(name.clone(), ty.clone());
        }
    }

    fn check_function_body(&mut self, body: &FunctionBody, ret: &Ty) {
        match body {
            FunctionBody::Expression(expr) if *ret == Ty::Void => {
                self.typer.check_root(expr, Expectation::Discard);
            }
            FunctionBody::Expression(expr) => {
                self.typer.check_root(expr, Expectation::Type(ret.clone()));
            }
            FunctionBody::Block(block) => self.check_block(block, ret),
        }
    }

    fn check_block(&mut self, block: &Block, ret: &Ty) {
        self.typer.push_scope();
        for statement in &block.statements {
            self.check_statement(statement, ret);
        }
        self.typer.pop_scope();
    }

    fn check_statement(&mut self, statement: &Statement, ret: &Ty) {
        match statement {
            Statement::Block(block) => self.check_block(block, ret),
            Statement::Return { value, span } => self.check_return(value.as_ref(), ret, *span),
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.typer.check_root(condition, Expectation::Type(Ty::bool()));
                self.check_nested_statement(then_branch, ret);
                if let Some(else_branch) = else_branch {
                    self.check_nested_statement(else_branch, ret);
                }
            }
            Statement::Local {
                ty,
                name,
                name_span,
                initializer,
                ..
            } => {
                let local_ty = match (ty, initializer) {
                    (Some(written), initializer) => {
                        let declared = self.typer.resolve_type(written);
                        if let Some(initializer) = initializer {
                            self.typer
                                .check_root(initializer, Expectation::Type(declared.clone()));
                        }
                        declared
                    }
                    (None, Some(initializer)) => {
                        let inferred = self.typer.check_root(initializer, Expectation::Value);
                        self.infer_local(name, *name_span, inferred)
                    }
                    (None, None) => Ty::Error,
                };
                self.typer.declare(name.clone(), local_ty);
            }
            Statement::Expression(expr) => {
                self.typer.check_root(expr, Expectation::Discard);
            }
        }
    }

    /// A branch of `if` gets its own scope even when it is a single statement.
    fn check_nested_statement(&mut self, statement: &Statement, ret: &Ty) {
        self.typer.push_scope();
        self.check_statement(statement, ret);
        self.typer.pop_scope();
    }

    fn infer_local(&mut self, name: &str, span: Span, inferred: Ty) -> Ty {
        match inferred {
            Ty::Null => {
                self.typer.report(error(
                    codes::TYPE_MISMATCH,
                    format!("cannot infer the type of `{name}` from `null`"),
                    Some(span),
                ));
                Ty::Error
            }
            Ty::Delegate { ref params, .. } if params.iter().any(Ty::is_error) => {
                self.typer.report(error(
                    codes::TYPE_MISMATCH,
                    format!("cannot infer the parameter types of the lambda assigned to `{name}`"),
                    Some(span),
                ));
                Ty::Error
            }
            other => other,
        }
    }

    fn check_return(&mut self, value: Option<&ExprNode>, ret: &Ty, span: Span) {
        match (value, ret) {
            (Some(value), Ty::Void) => {
                self.typer.check_root(value, Expectation::Discard);
                self.typer.report(error(
                    codes::TYPE_MISMATCH,
                    "a `void` member cannot return a value",
                    Some(value.span),
                ));
            }
            (Some(value), _) => {
                self.typer.check_root(value, Expectation::Type(ret.clone()));
            }
            (None, Ty::Void | Ty::Error) => {}
            (None, _) => self.typer.report(error(
                codes::TYPE_MISMATCH,
                format!("missing return value of type `{ret}`"),
                Some(span),
            )),
        }
    }
}

/// Constructor parameters of the base type `base_ty`, with its generic
/// arguments substituted.
fn constructor_for(table: &TypeTable, base_ty: &Ty) -> Option<Vec<ParamSig>> {
    let Ty::Named { name, args } = base_ty else {
        return None;
    };
    let info = table.lookup_type(name)?;
    let map: HashMap<_, _> = info
        .generics
        .iter()
        .zip(args)
        .map(|(generic, arg)| (generic.name.clone(), arg.clone()))
        .collect();
    Some(
        info.constructor
            .iter()
            .map(|param| ParamSig {
                ty: param.ty.substitute(&map),
                ..param.clone()
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests;
