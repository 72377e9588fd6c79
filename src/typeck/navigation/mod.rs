//! Safe-navigation (`?.`, `?[`) chain recovery, typing and classification.
//!
//! A chain is the run of postfix accesses that share one `?` guard:
//! `order?.Customer.$nickname[0]` is one chain with three links rooted at
//! `order`. Nested guards (`a?.b?.c`) form separate chains where the inner
//! chain is the root of the outer one.

mod analyze;

use std::fmt;

use super::table::TypeOracle;
use super::types::{Ty, TypeCategory};
use crate::diagnostics::Span;
use crate::lowering::Lowered;
use crate::syntax::expr::{ExprKind, ExprNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Member,
    IndexedMember,
    Element,
    Invocation,
}

impl LinkKind {
    fn of(node: &ExprNode) -> Option<Self> {
        match node.kind {
            ExprKind::Member { .. } => Some(LinkKind::Member),
            ExprKind::IndexedMember { .. } => Some(LinkKind::IndexedMember),
            ExprKind::Index { .. } => Some(LinkKind::Element),
            ExprKind::Call { .. } => Some(LinkKind::Invocation),
            _ => None,
        }
    }
}

/// One postfix access inside a chain. `node` is the full postfix node; its
/// receiver is ignored because the chain supplies it.
#[derive(Debug, Clone, Copy)]
pub struct Link<'e> {
    pub kind: LinkKind,
    pub node: &'e ExprNode,
}

#[derive(Debug, Clone)]
pub struct NavigationChain<'e> {
    pub root: &'e ExprNode,
    pub links: Vec<Link<'e>>,
    /// From the end of the root through the guarded link (`?.name`).
    pub guard_span: Span,
    pub span: Span,
    pub top: &'e ExprNode,
}

/// Recover the chain whose outermost node is `expr`.
///
/// Returns `None` when `expr` is not a postfix node or no `?` guards its
/// postfix spine.
#[must_use]
pub fn decompose(expr: &ExprNode) -> Option<NavigationChain<'_>> {
    let mut segments = Vec::new();
    let mut current = expr;
    let root = loop {
        let base = current.postfix_base()?;
        segments.push(current);
        if current.is_null_conditional() {
            break base;
        }
        current = base;
    };
    let guard = current;
    segments.reverse();
    let links = segments
        .into_iter()
        .filter_map(|node| LinkKind::of(node).map(|kind| Link { kind, node }))
        .collect();
    Some(NavigationChain {
        root,
        links,
        guard_span: Span::in_file(guard.span.file_id, root.span.end, guard.span.end),
        span: expr.span,
        top: expr,
    })
}

/// Static result of a navigation chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferredResultType {
    ReferenceType(Ty),
    /// Value-typed result `T`, lifted to `T?`.
    NullableValue(Ty),
    /// Result already of nullable value type; not wrapped again.
    KnownNullableUnwrapped(Ty),
    Void,
    TypeError,
}

impl InferredResultType {
    /// Type of the whole chain expression.
    #[must_use]
    pub fn ty(&self) -> Ty {
        match self {
            InferredResultType::ReferenceType(ty)
            | InferredResultType::KnownNullableUnwrapped(ty) => ty.clone(),
            InferredResultType::NullableValue(ty) => Ty::nullable(ty.clone()),
            InferredResultType::Void => Ty::Void,
            InferredResultType::TypeError => Ty::Error,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, InferredResultType::TypeError)
    }
}

impl fmt::Display for InferredResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferredResultType::ReferenceType(ty) => write!(f, "reference {ty}"),
            InferredResultType::NullableValue(ty) => write!(f, "lifted {ty}?"),
            InferredResultType::KnownNullableUnwrapped(ty) => write!(f, "nullable {ty}"),
            InferredResultType::Void => f.write_str("void"),
            InferredResultType::TypeError => f.write_str("error"),
        }
    }
}

/// Classify the type `ty` produced by a chain's links.
#[must_use]
pub fn classify_result(oracle: &dyn TypeOracle, ty: &Ty) -> InferredResultType {
    match oracle.classify(ty) {
        TypeCategory::Reference => InferredResultType::ReferenceType(ty.clone()),
        TypeCategory::Value => InferredResultType::NullableValue(ty.clone()),
        TypeCategory::NullableValue => InferredResultType::KnownNullableUnwrapped(ty.clone()),
        TypeCategory::Void => InferredResultType::Void,
        TypeCategory::Unknown => InferredResultType::TypeError,
    }
}

/// What lowering needs to know about a successfully analyzed chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainPlan {
    pub unwrap_root: bool,
    /// Set when a value-typed result must be lifted to this nullable type.
    pub wrap: Option<Ty>,
    /// Type of the short-circuit `null`.
    pub result: Ty,
}

/// One analyzed chain, for downstream consumers.
#[derive(Debug, Clone)]
pub struct NavigationRecord {
    pub span: Span,
    pub guard_span: Span,
    pub text: String,
    pub result: InferredResultType,
    pub lowered: Option<Lowered>,
}
