use std::collections::HashMap;

use super::{ExprTyper, Operand};
use crate::diagnostics::Span;
use crate::syntax::expr::{ExprKind, ExprNode, InitializerTarget, MemberName, NewExpr};
use crate::typeck::diagnostics::{codes, error};
use crate::typeck::table::{ParamSig, TypeOracle};
use crate::typeck::types::Ty;

impl ExprTyper<'_> {
    /// Apply the access performed by postfix `node` to an already typed receiver.
    pub(crate) fn apply_postfix(&mut self, receiver: Operand, node: &ExprNode) -> Operand {
        match &node.kind {
            ExprKind::Member {
                member, member_span, ..
            } => self.access_member(receiver, &MemberName::Static(member.clone()), *member_span),
            ExprKind::IndexedMember {
                name, name_span, ..
            } => self.access_member(receiver, &MemberName::Indexed(name.clone()), *name_span),
            ExprKind::Index { indices, .. } => {
                Operand::Value(self.access_element(receiver, indices, node.span))
            }
            ExprKind::Call { args, .. } => Operand::Value(self.invoke(receiver, args, node.span)),
            _ => self.type_operand(node),
        }
    }

    fn access_member(&mut self, receiver: Operand, name: &MemberName, span: Span) -> Operand {
        let receiver_ty = self.expect_value(receiver, span);
        if receiver_ty.is_error() {
            return Operand::Value(Ty::Error);
        }
        if let Some(sig) = self.oracle().resolve_member(&receiver_ty, name) {
            return Operand::from_member(sig);
        }
        let diagnostic = match name {
            MemberName::Static(text) => error(
                codes::UNKNOWN_MEMBER,
                format!("type `{receiver_ty}` has no member named `{text}`"),
                Some(span),
            ),
            MemberName::Indexed(_) => error(
                codes::NO_INDEXER,
                format!("`{name}` needs a `string` indexer, but type `{receiver_ty}` has none"),
                Some(span),
            ),
        };
        self.report(diagnostic);
        Operand::Value(Ty::Error)
    }

    fn access_element(&mut self, receiver: Operand, indices: &[ExprNode], span: Span) -> Ty {
        let receiver_ty = self.expect_value(receiver, span);
        if receiver_ty.is_error() {
            for index in indices {
                self.type_expr(index);
            }
            return Ty::Error;
        }
        let Some(indexer) = self.oracle().resolve_indexer(&receiver_ty, indices.len()) else {
            self.report(error(
                codes::NO_INDEXER,
                format!(
                    "type `{receiver_ty}` has no indexer taking {} argument(s)",
                    indices.len()
                ),
                Some(span),
            ));
            for index in indices {
                self.type_expr(index);
            }
            return Ty::Error;
        };
        for (index, param) in indices.iter().zip(&indexer.params) {
            self.check_expr_against(index, &param.ty);
        }
        indexer.ty
    }

    fn invoke(&mut self, callee: Operand, args: &[ExprNode], span: Span) -> Ty {
        match callee {
            Operand::Method { name, params, ret } => {
                self.check_arguments(&name, &params, args, span);
                ret
            }
            Operand::Value(Ty::Delegate { params, ret }) => {
                let params: Vec<_> = params
                    .into_iter()
                    .enumerate()
                    .map(|(index, ty)| ParamSig::new(format!("arg{index}"), ty))
                    .collect();
                self.check_arguments("delegate", &params, args, span);
                *ret
            }
            Operand::Value(other) => {
                if !other.is_error() {
                    self.report(error(
                        codes::NOT_INVOCABLE,
                        format!("a value of type `{other}` cannot be invoked"),
                        Some(span),
                    ));
                }
                for arg in args {
                    self.type_expr(arg);
                }
                Ty::Error
            }
        }
    }

    pub(crate) fn type_new(&mut self, new_expr: &NewExpr, span: Span) -> Ty {
        let ty = self.resolve_type(&new_expr.ty);
        let constructor = match &ty {
            Ty::Named { name, args } => self.oracle().lookup_type(name).map(|info| {
                let map: HashMap<_, _> = info
                    .generics
                    .iter()
                    .zip(args)
                    .map(|(generic, arg)| (generic.name.clone(), arg.clone()))
                    .collect();
                info.constructor
                    .iter()
                    .map(|param| ParamSig {
                        ty: param.ty.substitute(&map),
                        ..param.clone()
                    })
                    .collect::<Vec<_>>()
            }),
            Ty::Error => None,
            other => {
                self.report(error(
                    codes::TYPE_MISMATCH,
                    format!("cannot create an instance of `{other}`"),
                    Some(new_expr.ty.span),
                ));
                None
            }
        };
        match constructor {
            Some(params) => {
                let callee = format!("new {ty}");
                self.check_arguments(&callee, &params, &new_expr.args, span);
            }
            None => {
                for arg in &new_expr.args {
                    self.type_expr(arg);
                }
            }
        }

        for initializer in &new_expr.initializers {
            let target_ty = if ty.is_error() {
                Ty::Error
            } else {
                self.initializer_target_type(&ty, &initializer.target)
            };
            self.check_expr_against(&initializer.value, &target_ty);
        }
        ty
    }

    fn initializer_target_type(&mut self, ty: &Ty, target: &InitializerTarget) -> Ty {
        let (found, label) = match target {
            InitializerTarget::Member { name, .. } => (
                self.oracle()
                    .resolve_member(ty, &MemberName::Static(name.clone()))
                    .map(|sig| (sig.is_settable(), sig.ty)),
                name.clone(),
            ),
            InitializerTarget::IndexedMember { name, .. } => (
                self.oracle()
                    .resolve_member(ty, &MemberName::Indexed(name.clone()))
                    .map(|sig| (sig.is_settable(), sig.ty)),
                format!("${name}"),
            ),
            InitializerTarget::Index { indices, .. } => {
                let indexer = self.oracle().resolve_indexer(ty, indices.len());
                match &indexer {
                    Some(indexer) => {
                        for (index, param) in indices.iter().zip(&indexer.params) {
                            self.check_expr_against(index, &param.ty);
                        }
                    }
                    None => {
                        for index in indices {
                            self.type_expr(index);
                        }
                    }
                }
                (
                    indexer.map(|indexer| (indexer.settable, indexer.ty)),
                    "indexer".to_string(),
                )
            }
        };
        match found {
            Some((true, target_ty)) => target_ty,
            Some((false, _)) => {
                self.report(error(
                    codes::NOT_ASSIGNABLE,
                    format!("`{label}` of `{ty}` cannot be assigned in an object initializer"),
                    Some(target.span()),
                ));
                Ty::Error
            }
            None => {
                self.report(error(
                    codes::UNKNOWN_MEMBER,
                    format!("type `{ty}` has no settable `{label}`"),
                    Some(target.span()),
                ));
                Ty::Error
            }
        }
    }
}
