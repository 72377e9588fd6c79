//! Rewrite of null-conditional chains into explicit temporaries and tests.
//!
//! `e?.m(a, b)` becomes
//!
//! ```text
//! let $t0 = e in ($t0 == null ? null : $t0.m(a, b))
//! ```
//!
//! The receiver is evaluated exactly once into a fresh temporary, and the
//! links of the chain only run on the non-null branch. Value-typed results
//! are wrapped into their nullable form so both branches agree; nullable
//! value receivers are unwrapped before the first link.
//!
//! Lowering runs after typing and consumes the [`ChainPlan`]s that the
//! typer recorded for chains it accepted. A chain without a plan had errors
//! and is left as source.

use std::collections::HashMap;
use std::fmt;

use crate::diagnostics::Span;
use crate::syntax::expr::{
    BinOp, ExprKind, ExprNode, InitializerTarget, Literal, UnOp, format_expression,
};
use crate::typeck::navigation::{ChainPlan, NavigationChain, decompose};
use crate::typeck::types::Ty;

/// Compiler-introduced local holding a chain receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TempId(pub usize);

impl fmt::Display for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$t{}", self.0)
    }
}

/// Lowered expression form.
#[derive(Debug, Clone)]
pub enum Lowered {
    /// Source subtree with no navigation left in it.
    Source(ExprNode),
    Temp(TempId),
    /// `let temp = value in body`; `value` is evaluated once.
    Bind {
        temp: TempId,
        value: Box<Lowered>,
        body: Box<Lowered>,
    },
    Conditional {
        condition: Box<Lowered>,
        then_branch: Box<Lowered>,
        else_branch: Box<Lowered>,
    },
    IsNull(Box<Lowered>),
    /// `null` of the given result type.
    Null(Ty),
    /// Underlying value of a non-null nullable value.
    Unwrap(Box<Lowered>),
    /// Lift a value into `ty`, which is `T?`.
    Wrap {
        ty: Ty,
        value: Box<Lowered>,
    },
    Member {
        base: Box<Lowered>,
        name: String,
    },
    Index {
        base: Box<Lowered>,
        indices: Vec<Lowered>,
    },
    Invoke {
        callee: Box<Lowered>,
        args: Vec<Lowered>,
    },
    Binary {
        op: BinOp,
        left: Box<Lowered>,
        right: Box<Lowered>,
    },
    Unary {
        op: UnOp,
        operand: Box<Lowered>,
    },
    Assign {
        target: Box<Lowered>,
        value: Box<Lowered>,
    },
}

impl Lowered {
    fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Temporaries bound anywhere in this form, in binding order.
    #[must_use]
    pub fn bound_temps(&self) -> Vec<TempId> {
        let mut temps = Vec::new();
        self.collect_temps(&mut temps);
        temps
    }

    fn collect_temps(&self, out: &mut Vec<TempId>) {
        match self {
            Lowered::Source(_) | Lowered::Temp(_) | Lowered::Null(_) => {}
            Lowered::Bind { temp, value, body } => {
                value.collect_temps(out);
                out.push(*temp);
                body.collect_temps(out);
            }
            Lowered::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                condition.collect_temps(out);
                then_branch.collect_temps(out);
                else_branch.collect_temps(out);
            }
            Lowered::IsNull(inner) | Lowered::Unwrap(inner) => inner.collect_temps(out),
            Lowered::Wrap { value, .. } => value.collect_temps(out),
            Lowered::Member { base, .. } => base.collect_temps(out),
            Lowered::Index { base, indices } => {
                base.collect_temps(out);
                indices.iter().for_each(|index| index.collect_temps(out));
            }
            Lowered::Invoke { callee, args } => {
                callee.collect_temps(out);
                args.iter().for_each(|arg| arg.collect_temps(out));
            }
            Lowered::Binary { left, right, .. } => {
                left.collect_temps(out);
                right.collect_temps(out);
            }
            Lowered::Unary { operand, .. } => operand.collect_temps(out),
            Lowered::Assign { target, value } => {
                target.collect_temps(out);
                value.collect_temps(out);
            }
        }
    }

    /// Forms that need parentheses when used as a receiver or operand.
    fn is_compound(&self) -> bool {
        match self {
            Lowered::Bind { .. }
            | Lowered::Binary { .. }
            | Lowered::Unary { .. }
            | Lowered::Assign { .. }
            | Lowered::IsNull(_) => true,
            Lowered::Source(expr) => !matches!(
                expr.kind,
                ExprKind::Literal(_)
                    | ExprKind::Identifier(_)
                    | ExprKind::This
                    | ExprKind::Parenthesized(_)
                    | ExprKind::Member { .. }
                    | ExprKind::IndexedMember { .. }
                    | ExprKind::Index { .. }
                    | ExprKind::Call { .. }
                    | ExprKind::New(_)
            ),
            _ => false,
        }
    }
}

struct Operand<'a>(&'a Lowered);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_compound() {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Writes `value`, parenthesizing a `let` so its body cannot swallow what follows.
fn write_value(f: &mut fmt::Formatter<'_>, value: &Lowered) -> fmt::Result {
    if matches!(value, Lowered::Bind { .. }) {
        write!(f, "({value})")
    } else {
        write!(f, "{value}")
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Lowered]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write_value(f, item)?;
    }
    Ok(())
}

impl fmt::Display for Lowered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lowered::Source(expr) => f.write_str(&format_expression(expr)),
            Lowered::Temp(temp) => write!(f, "{temp}"),
            Lowered::Bind { temp, value, body } => {
                write!(f, "let {temp} = ")?;
                write_value(f, value)?;
                write!(f, " in {body}")
            }
            Lowered::Conditional {
                condition,
                then_branch,
                else_branch,
            } => write!(
                f,
                "({condition} ? {} : {})",
                Operand(then_branch),
                Operand(else_branch)
            ),
            Lowered::IsNull(inner) => write!(f, "{} == null", Operand(inner)),
            Lowered::Null(_) => f.write_str("null"),
            Lowered::Unwrap(inner) => write!(f, "unwrap({inner})"),
            Lowered::Wrap { ty, value } => write!(f, "({ty})({value})"),
            Lowered::Member { base, name } => write!(f, "{}.{name}", Operand(base)),
            Lowered::Index { base, indices } => {
                write!(f, "{}[", Operand(base))?;
                write_list(f, indices)?;
                f.write_str("]")
            }
            Lowered::Invoke { callee, args } => {
                write!(f, "{}(", Operand(callee))?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Lowered::Binary { op, left, right } => {
                write!(f, "{} {} {}", Operand(left), op.symbol(), Operand(right))
            }
            Lowered::Unary { op, operand } => write!(f, "{}{}", op.symbol(), Operand(operand)),
            Lowered::Assign { target, value } => {
                write!(f, "{} = ", Operand(target))?;
                write_value(f, value)
            }
        }
    }
}

/// Lowered form of one root expression.
#[derive(Debug, Clone)]
pub struct LoweredExpr {
    pub span: Span,
    pub lowered: Lowered,
}

impl fmt::Display for LoweredExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lowered)
    }
}

#[derive(Debug, Clone)]
pub struct LoweredRoot {
    pub root: Lowered,
    /// Each lowered chain keyed by its guard span.
    pub chains: HashMap<Span, Lowered>,
}

/// Lower `expr`, rewriting every chain that has a plan.
///
/// Temporaries are numbered from `$t0` within each root; an inner chain in
/// receiver position is numbered before the chain that guards it.
#[must_use]
pub fn lower_root(plans: &HashMap<Span, ChainPlan>, expr: &ExprNode) -> LoweredRoot {
    let mut lowerer = Lowerer {
        plans,
        next_temp: 0,
        chains: HashMap::new(),
    };
    let root = lowerer.lower(expr);
    LoweredRoot {
        root,
        chains: lowerer.chains,
    }
}

struct Lowerer<'p> {
    plans: &'p HashMap<Span, ChainPlan>,
    next_temp: usize,
    chains: HashMap<Span, Lowered>,
}

impl Lowerer<'_> {
    fn fresh_temp(&mut self) -> TempId {
        let temp = TempId(self.next_temp);
        self.next_temp += 1;
        temp
    }

    fn lower(&mut self, expr: &ExprNode) -> Lowered {
        if !expr.contains_navigation() {
            return Lowered::Source(expr.clone());
        }
        if let Some(chain) = decompose(expr) {
            return match self.plans.get(&chain.guard_span).cloned() {
                Some(plan) => self.lower_chain(&chain, &plan),
                None => {
                    self.lower_nested(chain.root);
                    for link in &chain.links {
                        self.lower_link_operands(link.node);
                    }
                    Lowered::Source(expr.clone())
                }
            };
        }
        match &expr.kind {
            ExprKind::Parenthesized(inner) => self.lower(inner),
            ExprKind::Unary { op, expr: operand } => Lowered::Unary {
                op: *op,
                operand: self.lower(operand).boxed(),
            },
            ExprKind::Binary { op, left, right } => Lowered::Binary {
                op: *op,
                left: self.lower(left).boxed(),
                right: self.lower(right).boxed(),
            },
            ExprKind::Conditional {
                condition,
                then_branch,
                else_branch,
            } => Lowered::Conditional {
                condition: self.lower(condition).boxed(),
                then_branch: self.lower(then_branch).boxed(),
                else_branch: self.lower(else_branch).boxed(),
            },
            ExprKind::Assign { target, value } => Lowered::Assign {
                target: self.lower(target).boxed(),
                value: self.lower(value).boxed(),
            },
            ExprKind::Lambda(lambda) => {
                self.lower_nested(&lambda.body);
                Lowered::Source(expr.clone())
            }
            ExprKind::New(new_expr) => {
                for arg in &new_expr.args {
                    self.lower_nested(arg);
                }
                for initializer in &new_expr.initializers {
                    if let InitializerTarget::Index { indices, .. } = &initializer.target {
                        indices.iter().for_each(|index| self.lower_nested(index));
                    }
                    self.lower_nested(&initializer.value);
                }
                Lowered::Source(expr.clone())
            }
            ExprKind::Member { base, member, .. } => Lowered::Member {
                base: self.lower(base).boxed(),
                name: member.clone(),
            },
            ExprKind::IndexedMember {
                base,
                name,
                name_span,
                ..
            } => Lowered::Index {
                base: self.lower(base).boxed(),
                indices: vec![name_key(name, *name_span)],
            },
            ExprKind::Index { base, indices, .. } => Lowered::Index {
                base: self.lower(base).boxed(),
                indices: indices.iter().map(|index| self.lower(index)).collect(),
            },
            ExprKind::Call { callee, args, .. } => Lowered::Invoke {
                callee: self.lower(callee).boxed(),
                args: args.iter().map(|arg| self.lower(arg)).collect(),
            },
            ExprKind::Literal(_) | ExprKind::Identifier(_) | ExprKind::This => {
                Lowered::Source(expr.clone())
            }
        }
    }

    /// Lower a subtree that stays as source in its parent, keeping only the
    /// chains it contains.
    fn lower_nested(&mut self, expr: &ExprNode) {
        if expr.contains_navigation() {
            self.lower(expr);
        }
    }

    fn lower_link_operands(&mut self, node: &ExprNode) {
        match &node.kind {
            ExprKind::Index { indices, .. } => {
                indices.iter().for_each(|index| self.lower_nested(index))
            }
            ExprKind::Call { args, .. } => args.iter().for_each(|arg| self.lower_nested(arg)),
            _ => {}
        }
    }

    fn lower_chain(&mut self, chain: &NavigationChain<'_>, plan: &ChainPlan) -> Lowered {
        let receiver = self.lower(chain.root);
        let temp = self.fresh_temp();

        let mut access = Lowered::Temp(temp);
        if plan.unwrap_root {
            access = Lowered::Unwrap(access.boxed());
        }
        for link in &chain.links {
            access = self.apply_link(access, link.node);
        }
        if let Some(ty) = &plan.wrap {
            access = Lowered::Wrap {
                ty: ty.clone(),
                value: access.boxed(),
            };
        }

        let lowered = Lowered::Bind {
            temp,
            value: receiver.boxed(),
            body: Lowered::Conditional {
                condition: Lowered::IsNull(Lowered::Temp(temp).boxed()).boxed(),
                then_branch: Lowered::Null(plan.result.clone()).boxed(),
                else_branch: access.boxed(),
            }
            .boxed(),
        };
        self.chains.insert(chain.guard_span, lowered.clone());
        lowered
    }

    fn apply_link(&mut self, receiver: Lowered, node: &ExprNode) -> Lowered {
        match &node.kind {
            ExprKind::Member { member, .. } => Lowered::Member {
                base: receiver.boxed(),
                name: member.clone(),
            },
            ExprKind::IndexedMember {
                name, name_span, ..
            } => Lowered::Index {
                base: receiver.boxed(),
                indices: vec![name_key(name, *name_span)],
            },
            ExprKind::Index { indices, .. } => Lowered::Index {
                base: receiver.boxed(),
                indices: indices.iter().map(|index| self.lower(index)).collect(),
            },
            ExprKind::Call { args, .. } => Lowered::Invoke {
                callee: receiver.boxed(),
                args: args.iter().map(|arg| self.lower(arg)).collect(),
            },
            _ => receiver,
        }
    }
}

/// `$name` reads the string indexer with the literal key `"name"`.
fn name_key(name: &str, span: Span) -> Lowered {
    Lowered::Source(ExprNode::literal(Literal::Str(name.to_string()), span))
}
