//! Expression typing for member bodies and initializers.

mod access;
mod operators;

use std::collections::HashMap;

use super::diagnostics::{codes, error};
use super::navigation::{ChainPlan, NavigationRecord, decompose};
use super::table::{
    GenericInfo, MemberKind, MemberSig, ParamSig, TypeOracle, TypeTable, is_assignable,
};
use super::types::Ty;
use crate::capture::scope::ReferenceContext;
use crate::diagnostics::{Diagnostic, Span};
use crate::frontend::ast::TypeExpr;
use crate::lowering::{LoweredExpr, lower_root};
use crate::syntax::expr::{ExprKind, ExprNode, Literal, MemberName};

/// Result of typing an expression before it is used as a value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    Value(Ty),
    /// A named method not yet invoked.
    Method {
        name: String,
        params: Vec<ParamSig>,
        ret: Ty,
    },
}

impl Operand {
    fn from_member(sig: MemberSig) -> Self {
        match sig.kind {
            MemberKind::Method { params } => Operand::Method {
                name: sig.name,
                params,
                ret: sig.ty,
            },
            MemberKind::Field { .. } | MemberKind::Property { .. } => Operand::Value(sig.ty),
        }
    }
}

/// What the surrounding code expects from a root expression.
#[derive(Debug, Clone)]
pub enum Expectation {
    Type(Ty),
    Value,
    /// Expression statement: any result, including `void`, is discarded.
    Discard,
}

/// Types expressions inside one type declaration.
///
/// The typer is reused across the members of a type; [`ExprTyper::enter`]
/// resets the local scope and the evaluation context for each body.
pub struct ExprTyper<'a> {
    table: &'a TypeTable,
    self_ty: Ty,
    generics: Vec<GenericInfo>,
    primary: Vec<ParamSig>,
    context: ReferenceContext,
    is_static: bool,
    scopes: Vec<Vec<(String, Ty)>>,
    lambda_depth: usize,
    diagnostics: Vec<Diagnostic>,
    navigation: Vec<NavigationRecord>,
    plans: HashMap<Span, ChainPlan>,
    lowered: Vec<LoweredExpr>,
}

/// Everything produced while typing one declaration.
#[derive(Debug, Default)]
pub struct TyperOutput {
    pub diagnostics: Vec<Diagnostic>,
    pub navigation: Vec<NavigationRecord>,
    pub lowered: Vec<LoweredExpr>,
}

impl<'a> ExprTyper<'a> {
    #[must_use]
    pub fn new(
        table: &'a TypeTable,
        self_ty: Ty,
        generics: Vec<GenericInfo>,
        primary: Vec<ParamSig>,
    ) -> Self {
        Self {
            table,
            self_ty,
            generics,
            primary,
            context: ReferenceContext::MemberBody,
            is_static: false,
            scopes: vec![Vec::new()],
            lambda_depth: 0,
            diagnostics: Vec::new(),
            navigation: Vec::new(),
            plans: HashMap::new(),
            lowered: Vec::new(),
        }
    }

    /// Start typing a new body or initializer.
    pub fn enter(&mut self, context: ReferenceContext, is_static: bool) {
        self.context = context;
        self.is_static = is_static;
        self.scopes = vec![Vec::new()];
        self.lambda_depth = 0;
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Vec::new());
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn declare(&mut self, name: impl Into<String>, ty: Ty) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.push((name.into(), ty));
        }
    }

    #[must_use]
    pub fn finish(self) -> TyperOutput {
        TyperOutput {
            diagnostics: self.diagnostics,
            navigation: self.navigation,
            lowered: self.lowered,
        }
    }

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn oracle(&self) -> &'a TypeTable {
        self.table
    }

    pub(crate) fn record_chain(&mut self, record: NavigationRecord, plan: Option<ChainPlan>) {
        if let Some(plan) = plan {
            self.plans.insert(record.guard_span, plan);
        }
        self.navigation.push(record);
    }

    /// Resolve a written type, reporting failures.
    pub fn resolve_type(&mut self, expr: &TypeExpr) -> Ty {
        match self.table.resolve_type_expr(expr, &self.generics) {
            Ok(ty) => ty,
            Err(diagnostic) => {
                self.report(diagnostic);
                Ty::Error
            }
        }
    }

    /// Resolve a written type whose problems were already reported.
    #[must_use]
    pub fn resolve_declared_type(&self, expr: &TypeExpr) -> Ty {
        self.table
            .resolve_type_expr(expr, &self.generics)
            .unwrap_or(Ty::Error)
    }

    /// Type a complete expression and lower it when it navigates.
    pub fn check_root(&mut self, expr: &ExprNode, expectation: Expectation) -> Ty {
        let records_before = self.navigation.len();
        let ty = match expectation {
            Expectation::Type(expected) => {
                self.check_expr_against(expr, &expected);
                expected
            }
            Expectation::Value => {
                let ty = self.type_expr(expr);
                self.require_value(ty, expr.span)
            }
            Expectation::Discard => self.type_expr(expr),
        };
        if expr.contains_navigation() {
            let output = lower_root(&self.plans, expr);
            for record in &mut self.navigation[records_before..] {
                record.lowered = output.chains.get(&record.guard_span).cloned();
            }
            self.lowered.push(LoweredExpr {
                span: expr.span,
                lowered: output.root,
            });
        }
        ty
    }

    /// Type `expr` as a value; method groups are rejected.
    pub fn type_expr(&mut self, expr: &ExprNode) -> Ty {
        let operand = self.type_operand(expr);
        self.expect_value(operand, expr.span)
    }

    pub(crate) fn type_operand(&mut self, expr: &ExprNode) -> Operand {
        if let Some(chain) = decompose(expr) {
            return Operand::Value(self.analyze_chain(&chain));
        }
        match &expr.kind {
            ExprKind::Literal(literal) => Operand::Value(literal_type(literal)),
            ExprKind::Identifier(name) => self.lookup_name(name, expr.span),
            ExprKind::This => {
                if self.is_static {
                    self.report(error(
                        codes::THIS_IN_STATIC,
                        "`this` is not available in a static context",
                        Some(expr.span),
                    ));
                    return Operand::Value(Ty::Error);
                }
                Operand::Value(self.self_ty.clone())
            }
            ExprKind::Parenthesized(inner) => self.type_operand(inner),
            ExprKind::Unary { op, expr: operand } => {
                Operand::Value(self.type_unary(*op, operand, expr.span))
            }
            ExprKind::Binary { op, left, right } => {
                Operand::Value(self.type_binary(*op, left, right, expr.span))
            }
            ExprKind::Conditional {
                condition,
                then_branch,
                else_branch,
            } => Operand::Value(self.type_conditional(condition, then_branch, else_branch)),
            ExprKind::Assign { target, value } => Operand::Value(self.type_assign(target, value)),
            ExprKind::Lambda(lambda) => Operand::Value(self.type_lambda(lambda, None)),
            ExprKind::New(new_expr) => Operand::Value(self.type_new(new_expr, expr.span)),
            ExprKind::Member { base, .. }
            | ExprKind::IndexedMember { base, .. }
            | ExprKind::Index { base, .. } => {
                let receiver = self.type_operand(base);
                self.apply_postfix(receiver, expr)
            }
            ExprKind::Call { callee, .. } => {
                let receiver = self.type_operand(callee);
                self.apply_postfix(receiver, expr)
            }
        }
    }

    pub(crate) fn expect_value(&mut self, operand: Operand, span: Span) -> Ty {
        match operand {
            Operand::Value(ty) => ty,
            Operand::Method { name, .. } => {
                self.report(error(
                    codes::METHOD_GROUP_VALUE,
                    format!("method `{name}` must be invoked; a method is not a value"),
                    Some(span),
                ));
                Ty::Error
            }
        }
    }

    pub(crate) fn require_value(&mut self, ty: Ty, span: Span) -> Ty {
        if ty == Ty::Void {
            self.report(error(
                codes::TYPE_MISMATCH,
                "expression does not produce a value",
                Some(span),
            ));
            return Ty::Error;
        }
        ty
    }

    /// Type `expr` and require it to fit `expected`.
    pub fn check_expr_against(&mut self, expr: &ExprNode, expected: &Ty) {
        let actual = match (&expr.kind, expected) {
            (ExprKind::Lambda(lambda), Ty::Delegate { .. }) => {
                self.type_lambda(lambda, Some(expected))
            }
            _ => {
                let ty = self.type_expr(expr);
                self.require_value(ty, expr.span)
            }
        };
        if !is_assignable(self.table, &actual, expected) {
            self.report(error(
                codes::TYPE_MISMATCH,
                format!("expected `{expected}`, found `{actual}`"),
                Some(expr.span),
            ));
        }
    }

    fn lookup_name(&mut self, name: &str, span: Span) -> Operand {
        let local = self
            .scopes
            .iter()
            .rev()
            .find_map(|scope| scope.iter().rev().find(|(local, _)| local == name));
        if let Some((_, ty)) = local {
            return Operand::Value(ty.clone());
        }

        if let Some(param) = self.primary.iter().find(|param| param.name == name) {
            // Outside initializer context the capture pass reports the reference.
            let visible = self.context == ReferenceContext::Initializer && self.lambda_depth == 0;
            return Operand::Value(if visible { param.ty.clone() } else { Ty::Error });
        }

        let member = self
            .table
            .resolve_member(&self.self_ty, &MemberName::Static(name.to_string()));
        match member {
            Some(sig) if self.is_static && !sig.is_static => {
                self.report(error(
                    codes::INSTANCE_FROM_STATIC,
                    format!("instance member `{name}` cannot be used from a static context"),
                    Some(span),
                ));
                Operand::Value(Ty::Error)
            }
            Some(sig) => Operand::from_member(sig),
            None => {
                self.report(error(
                    codes::UNKNOWN_NAME,
                    format!("cannot find `{name}` in this scope"),
                    Some(span),
                ));
                Operand::Value(Ty::Error)
            }
        }
    }

    /// Check call arguments against `params`, allowing trailing defaults.
    pub(crate) fn check_arguments(
        &mut self,
        callee: &str,
        params: &[ParamSig],
        args: &[ExprNode],
        span: Span,
    ) {
        let required = params.iter().filter(|param| !param.has_default).count();
        if args.len() < required || args.len() > params.len() {
            let expected = if required == params.len() {
                params.len().to_string()
            } else {
                format!("{required} to {}", params.len())
            };
            self.report(error(
                codes::ARITY_MISMATCH,
                format!(
                    "`{callee}` takes {expected} argument(s) but {} were supplied",
                    args.len()
                ),
                Some(span),
            ));
        }
        for (index, arg) in args.iter().enumerate() {
            match params.get(index) {
                Some(param) => self.check_expr_against(arg, &param.ty),
                None => {
                    self.type_expr(arg);
                }
            }
        }
    }
}

fn literal_type(literal: &Literal) -> Ty {
    match literal {
        Literal::Int(_) => Ty::int(),
        Literal::Str(_) => Ty::string(),
        Literal::Bool(_) => Ty::bool(),
        Literal::Null => Ty::Null,
    }
}

#[cfg(test)]
mod tests;
