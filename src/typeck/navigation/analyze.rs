use super::{
    ChainPlan, InferredResultType, LinkKind, NavigationChain, NavigationRecord, classify_result,
};
use crate::diagnostics::Suggestion;
use crate::syntax::expr::{ExprKind, ExprNode, Literal, format_expression};
use crate::typeck::diagnostics::{codes, navigation_error};
use crate::typeck::expr::{ExprTyper, Operand};
use crate::typeck::table::TypeOracle;
use crate::typeck::types::{Ty, TypeCategory};

impl ExprTyper<'_> {
    /// Type one chain and record its classification.
    ///
    /// The root is typed first, so a nested chain in root position is
    /// analyzed (and recorded) before the chain that guards its result.
    pub(crate) fn analyze_chain(&mut self, chain: &NavigationChain<'_>) -> Ty {
        let root_ty = self.type_expr(chain.root);

        if let Some(first) = chain.links.first() {
            if first.kind == LinkKind::Invocation {
                self.report_guarded_invocation(chain, first.node);
                return Ty::Error;
            }
        }

        if is_null_literal(chain.root) || root_ty == Ty::Null {
            self.report(navigation_error(
                codes::INVALID_NAVIGATION_OPERAND,
                "the `null` literal cannot be the operand of a null-conditional access",
                Some(chain.root.span),
            ));
            return Ty::Error;
        }
        if root_ty.is_error() {
            return Ty::Error;
        }

        let mut operand_valid = true;
        let (receiver, unwrap_root) = match self.oracle().classify(&root_ty) {
            TypeCategory::NullableValue => match root_ty.nullable_inner() {
                Some(inner) => (inner.clone(), true),
                None => (root_ty.clone(), false),
            },
            TypeCategory::Value => {
                operand_valid = false;
                self.report(
                    navigation_error(
                        codes::INVALID_NAVIGATION_OPERAND,
                        format!(
                            "`{}` has non-nullable value type `{root_ty}` and can never be null",
                            format_expression(chain.root)
                        ),
                        Some(chain.root.span),
                    )
                    .with_note("use `.` instead of `?.`, or make the operand nullable")
                    .with_note(
                        "null-conditional access is reserved for reference and nullable \
                         value operands, as in the host language",
                    ),
                );
                (root_ty.clone(), false)
            }
            TypeCategory::Void => {
                self.report(navigation_error(
                    codes::INVALID_NAVIGATION_OPERAND,
                    "the operand of a null-conditional access does not produce a value",
                    Some(chain.root.span),
                ));
                return Ty::Error;
            }
            TypeCategory::Reference | TypeCategory::Unknown => (root_ty.clone(), false),
        };

        let mut operand = Operand::Value(receiver);
        for link in &chain.links {
            operand = self.apply_postfix(operand, link.node);
        }
        let link_ty = self.expect_value(operand, chain.span);
        if link_ty.is_error() {
            return Ty::Error;
        }

        let result = classify_result(self.oracle(), &link_ty);
        if result.is_error() {
            let mut diagnostic = navigation_error(
                codes::UNKNOWN_TYPE_CATEGORY,
                format!(
                    "cannot tell whether `{link_ty}` is a reference or a value type, \
                     so the result of `{}` has no static type",
                    format_expression(chain.top)
                ),
                Some(chain.span),
            );
            if let Ty::Param { name, .. } = &link_ty {
                diagnostic = diagnostic.with_note(format!(
                    "constrain `{name}` with `where {name} : class` or `where {name} : struct`"
                ));
            }
            self.report(diagnostic);
        }

        let plan = (operand_valid && !result.is_error()).then(|| ChainPlan {
            unwrap_root,
            wrap: matches!(result, InferredResultType::NullableValue(_)).then(|| result.ty()),
            result: result.ty(),
        });
        let ty = result.ty();
        self.record_chain(
            NavigationRecord {
                span: chain.span,
                guard_span: chain.guard_span,
                text: format_expression(chain.top),
                result,
                lowered: None,
            },
            plan,
        );
        ty
    }

    fn report_guarded_invocation(&mut self, chain: &NavigationChain<'_>, call: &ExprNode) {
        let args = match &call.kind {
            ExprKind::Call { args, .. } => args.as_slice(),
            _ => &[],
        };
        for arg in args {
            self.type_expr(arg);
        }
        let rendered_args = args
            .iter()
            .map(format_expression)
            .collect::<Vec<_>>()
            .join(", ");
        let replacement = format!("{}?.Invoke({rendered_args})", format_expression(chain.root));
        self.report(
            navigation_error(
                codes::DISALLOWED_NAVIGATION_FORM,
                "a null-conditional access cannot guard an invocation",
                Some(chain.guard_span),
            )
            .with_suggestion(Suggestion::new(
                "call `Invoke` explicitly",
                Some(call.span),
                Some(replacement),
            )),
        );
    }
}

fn is_null_literal(expr: &ExprNode) -> bool {
    match &expr.kind {
        ExprKind::Literal(Literal::Null) => true,
        ExprKind::Parenthesized(inner) => is_null_literal(inner),
        _ => false,
    }
}
