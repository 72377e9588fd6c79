use super::{ExprTyper, Operand};
use crate::capture::scope::ReferenceContext;
use crate::diagnostics::Span;
use crate::syntax::expr::{BinOp, ExprKind, ExprNode, LambdaExpr, MemberName, UnOp};
use crate::typeck::diagnostics::{codes, error};
use crate::typeck::table::{TypeOracle, is_assignable};
use crate::typeck::types::{Ty, TypeCategory, numeric_rank};

impl ExprTyper<'_> {
    pub(crate) fn type_unary(&mut self, op: UnOp, operand: &ExprNode, span: Span) -> Ty {
        let ty = self.type_expr(operand);
        let ty = self.require_value(ty, operand.span);
        if ty.is_error() {
            return Ty::Error;
        }
        let valid = match op {
            UnOp::Not => ty == Ty::bool(),
            UnOp::Neg => lifted_numeric(&ty).is_some(),
        };
        if valid {
            return ty;
        }
        self.report(error(
            codes::BAD_OPERANDS,
            format!("operator `{}` cannot be applied to `{ty}`", op.symbol()),
            Some(span),
        ));
        Ty::Error
    }

    pub(crate) fn type_binary(
        &mut self,
        op: BinOp,
        left: &ExprNode,
        right: &ExprNode,
        span: Span,
    ) -> Ty {
        if op == BinOp::NullCoalesce {
            return self.type_coalesce(left, right, span);
        }
        let left_ty = self.type_expr(left);
        let left_ty = self.require_value(left_ty, left.span);
        let right_ty = self.type_expr(right);
        let right_ty = self.require_value(right_ty, right.span);
        if left_ty.is_error() || right_ty.is_error() {
            return if op.is_comparison() || op.is_equality() || op.is_logical() {
                Ty::bool()
            } else {
                Ty::Error
            };
        }

        let result = if op.is_logical() {
            (left_ty == Ty::bool() && right_ty == Ty::bool()).then(Ty::bool)
        } else if op.is_equality() {
            self.equality_operands_compatible(&left_ty, &right_ty)
                .then(Ty::bool)
        } else if op.is_comparison() {
            let numeric = lifted_numeric(&left_ty).is_some() && lifted_numeric(&right_ty).is_some();
            let chars = left_ty == Ty::char() && right_ty == Ty::char();
            (numeric || chars).then(Ty::bool)
        } else if op == BinOp::Add && (left_ty == Ty::string() || right_ty == Ty::string()) {
            Some(Ty::string())
        } else {
            arithmetic_result(&left_ty, &right_ty)
        };

        result.unwrap_or_else(|| {
            self.report(error(
                codes::BAD_OPERANDS,
                format!(
                    "operator `{}` cannot be applied to `{left_ty}` and `{right_ty}`",
                    op.symbol()
                ),
                Some(span),
            ));
            Ty::Error
        })
    }

    fn equality_operands_compatible(&self, left: &Ty, right: &Ty) -> bool {
        let table = self.oracle();
        match (left, right) {
            (Ty::Null, other) | (other, Ty::Null) => {
                *other == Ty::Null || table.classify(other) != TypeCategory::Value
            }
            _ => {
                is_assignable(table, left, right)
                    || is_assignable(table, right, left)
                    || (lifted_numeric(left).is_some() && lifted_numeric(right).is_some())
            }
        }
    }

    fn type_coalesce(&mut self, left: &ExprNode, right: &ExprNode, span: Span) -> Ty {
        let left_ty = self.type_expr(left);
        let left_ty = self.require_value(left_ty, left.span);
        let right_ty = self.type_expr(right);
        let right_ty = self.require_value(right_ty, right.span);
        if left_ty.is_error() || right_ty.is_error() {
            return Ty::Error;
        }
        if left_ty == Ty::Null {
            return right_ty;
        }

        let table = self.oracle();
        let result = match table.classify(&left_ty) {
            TypeCategory::NullableValue => {
                let inner = left_ty.nullable_inner().cloned().unwrap_or(Ty::Error);
                if is_assignable(table, &right_ty, &inner) {
                    Some(inner)
                } else if is_assignable(table, &right_ty, &left_ty) {
                    Some(left_ty.clone())
                } else {
                    None
                }
            }
            TypeCategory::Reference | TypeCategory::Unknown => {
                if is_assignable(table, &right_ty, &left_ty) {
                    Some(left_ty.clone())
                } else if is_assignable(table, &left_ty, &right_ty) {
                    Some(right_ty.clone())
                } else {
                    None
                }
            }
            TypeCategory::Value | TypeCategory::Void => {
                self.report(error(
                    codes::COALESCE_NON_NULLABLE,
                    format!("left operand of `??` has non-nullable type `{left_ty}`"),
                    Some(left.span),
                ));
                return left_ty;
            }
        };
        result.unwrap_or_else(|| {
            self.report(error(
                codes::TYPE_MISMATCH,
                format!("`??` operands have incompatible types `{left_ty}` and `{right_ty}`"),
                Some(span),
            ));
            Ty::Error
        })
    }

    pub(crate) fn type_conditional(
        &mut self,
        condition: &ExprNode,
        then_branch: &ExprNode,
        else_branch: &ExprNode,
    ) -> Ty {
        self.check_expr_against(condition, &Ty::bool());
        let then_ty = self.type_expr(then_branch);
        let then_ty = self.require_value(then_ty, then_branch.span);
        let else_ty = self.type_expr(else_branch);
        let else_ty = self.require_value(else_ty, else_branch.span);
        if let Some(ty) = self.unify_branches(&then_ty, &else_ty) {
            return ty;
        }
        self.report(error(
            codes::TYPE_MISMATCH,
            format!("conditional branches have incompatible types `{then_ty}` and `{else_ty}`"),
            Some(then_branch.span.join(else_branch.span)),
        ));
        Ty::Error
    }

    fn unify_branches(&self, left: &Ty, right: &Ty) -> Option<Ty> {
        let table = self.oracle();
        if left == right {
            return Some(left.clone());
        }
        if left.is_error() || right.is_error() {
            return Some(Ty::Error);
        }
        match (left, right) {
            (Ty::Null, other) | (other, Ty::Null) => match table.classify(other) {
                TypeCategory::Value => Some(Ty::nullable(other.clone())),
                TypeCategory::Reference | TypeCategory::NullableValue => Some(other.clone()),
                TypeCategory::Void | TypeCategory::Unknown => None,
            },
            _ if is_assignable(table, left, right) => Some(right.clone()),
            _ if is_assignable(table, right, left) => Some(left.clone()),
            _ => None,
        }
    }

    pub(crate) fn type_assign(&mut self, target: &ExprNode, value: &ExprNode) -> Ty {
        let target_ty = self.assignment_target(target);
        self.check_expr_against(value, &target_ty);
        target_ty
    }

    /// Type the left side of `=`, reporting targets that cannot be stored to.
    fn assignment_target(&mut self, target: &ExprNode) -> Ty {
        if target.starts_navigation_chain() {
            self.type_expr(target);
            self.report(error(
                codes::NOT_ASSIGNABLE,
                "a null-conditional access cannot be assigned to",
                Some(target.span),
            ));
            return Ty::Error;
        }
        let table = self.oracle();
        let (ty, settable) = match &target.kind {
            ExprKind::Identifier(name) => {
                (self.type_expr(target), self.identifier_is_settable(name))
            }
            ExprKind::Member { base, member, .. } => {
                let receiver = self.type_expr(base);
                let ty = self.type_postfix_on(&receiver, target);
                let name = MemberName::Static(member.clone());
                let settable = table
                    .resolve_member(&receiver, &name)
                    .is_none_or(|member| member.is_settable());
                (ty, settable)
            }
            ExprKind::IndexedMember { base, name, .. } => {
                let receiver = self.type_expr(base);
                let ty = self.type_postfix_on(&receiver, target);
                let settable = table
                    .resolve_member(&receiver, &MemberName::Indexed(name.clone()))
                    .is_none_or(|member| member.is_settable());
                (ty, settable)
            }
            ExprKind::Index { base, indices, .. } => {
                let receiver = self.type_expr(base);
                let ty = self.type_postfix_on(&receiver, target);
                let settable = table
                    .resolve_indexer(&receiver, indices.len())
                    .is_none_or(|indexer| indexer.settable);
                (ty, settable)
            }
            ExprKind::Parenthesized(inner) => return self.assignment_target(inner),
            _ => (self.type_expr(target), false),
        };
        if !settable && !ty.is_error() {
            self.report(error(
                codes::NOT_ASSIGNABLE,
                "left side of an assignment must be a variable, a settable property or an indexer",
                Some(target.span),
            ));
            return Ty::Error;
        }
        ty
    }

    fn type_postfix_on(&mut self, receiver: &Ty, node: &ExprNode) -> Ty {
        let operand = self.apply_postfix(Operand::Value(receiver.clone()), node);
        self.expect_value(operand, node.span)
    }

    fn identifier_is_settable(&self, name: &str) -> bool {
        if self.is_local(name) {
            return true;
        }
        if self.primary.iter().any(|param| param.name == name) {
            return true;
        }
        self.oracle()
            .resolve_member(&self.self_ty, &MemberName::Static(name.to_string()))
            .is_none_or(|member| member.is_settable())
    }

    fn is_local(&self, name: &str) -> bool {
        self.scopes
            .iter()
            .any(|scope| scope.iter().any(|(local, _)| local == name))
    }

    /// Type a lambda, taking parameter and return types from `expected`
    /// when it is a delegate of the same arity.
    pub(crate) fn type_lambda(&mut self, lambda: &LambdaExpr, expected: Option<&Ty>) -> Ty {
        let expected = match expected {
            Some(Ty::Delegate { params, ret }) if params.len() == lambda.params.len() => {
                Some((params.clone(), (**ret).clone()))
            }
            _ => None,
        };
        let params: Vec<Ty> = lambda
            .params
            .iter()
            .enumerate()
            .map(|(index, param)| match (&param.ty, &expected) {
                (Some(written), _) => self.resolve_type(written),
                (None, Some((params, _))) => params[index].clone(),
                (None, None) => Ty::Error,
            })
            .collect();

        let saved_context = self.context;
        self.context = ReferenceContext::MemberBody;
        self.lambda_depth += 1;
        self.push_scope();
        for (param, ty) in lambda.params.iter().zip(&params) {
            self.declare(param.name.clone(), ty.clone());
        }
        let ret = match &expected {
            Some((_, ret)) if *ret != Ty::Void => {
                self.check_expr_against(&lambda.body, ret);
                ret.clone()
            }
            _ => self.type_expr(&lambda.body),
        };
        self.pop_scope();
        self.lambda_depth -= 1;
        self.context = saved_context;

        Ty::Delegate {
            params,
            ret: Box::new(ret),
        }
    }
}

/// Numeric type of `ty`, looking through `?`.
fn lifted_numeric(ty: &Ty) -> Option<u8> {
    numeric_rank(ty).or_else(|| ty.nullable_inner().and_then(numeric_rank))
}

fn arithmetic_result(left: &Ty, right: &Ty) -> Option<Ty> {
    let left_rank = lifted_numeric(left)?;
    let right_rank = lifted_numeric(right)?;
    let wider = if left_rank >= right_rank { left } else { right };
    let base = wider.nullable_inner().unwrap_or(wider).clone();
    if left.nullable_inner().is_some() || right.nullable_inner().is_some() {
        Some(Ty::nullable(base))
    } else {
        Some(base)
    }
}
