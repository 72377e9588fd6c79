//! Expression AST definitions shared by the expression parser, the
//! formatter, and the semantic passes.

use crate::diagnostics::Span;
use crate::frontend::ast::TypeExpr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Str(String),
    Bool(bool),
    Null,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    NullCoalesce,
}

impl BinOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::NullCoalesce => "??",
        }
    }

    #[must_use]
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Rem
        )
    }

    #[must_use]
    pub fn is_comparison(self) -> bool {
        matches!(self, BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge)
    }

    #[must_use]
    pub fn is_equality(self) -> bool {
        matches!(self, BinOp::Eq | BinOp::Ne)
    }

    #[must_use]
    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    Not,
    Neg,
}

impl UnOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Not => "!",
            UnOp::Neg => "-",
        }
    }
}

/// Lambda parameter; `ty` is `None` for implicitly typed parameters.
#[derive(Clone, Debug)]
pub struct LambdaParam {
    pub ty: Option<TypeExpr>,
    pub name: String,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct LambdaExpr {
    pub params: Vec<LambdaParam>,
    pub body: Box<ExprNode>,
}

/// Left-hand side of an object initializer entry.
#[derive(Clone, Debug)]
pub enum InitializerTarget {
    /// `Name = value`
    Member { name: String, span: Span },
    /// `$name = value`
    IndexedMember { name: String, span: Span },
    /// `[a, b] = value`
    Index { indices: Vec<ExprNode>, span: Span },
}

impl InitializerTarget {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            InitializerTarget::Member { span, .. }
            | InitializerTarget::IndexedMember { span, .. }
            | InitializerTarget::Index { span, .. } => *span,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ObjectInitializer {
    pub target: InitializerTarget,
    pub value: ExprNode,
}

/// `new T(args) { initializers }`
#[derive(Clone, Debug)]
pub struct NewExpr {
    pub ty: TypeExpr,
    pub args: Vec<ExprNode>,
    pub initializers: Vec<ObjectInitializer>,
}

/// Name reached by a member-style access.
///
/// The two shapes come from different productions and stay distinct in the
/// tree; semantic lookup accepts either through this enum.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberName {
    Static(String),
    Indexed(String),
}

impl MemberName {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            MemberName::Static(name) | MemberName::Indexed(name) => name,
        }
    }
}

impl std::fmt::Display for MemberName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberName::Static(name) => f.write_str(name),
            MemberName::Indexed(name) => write!(f, "${name}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Literal(Literal),
    Identifier(String),
    This,
    Unary {
        op: UnOp,
        expr: Box<ExprNode>,
    },
    Binary {
        op: BinOp,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },
    Conditional {
        condition: Box<ExprNode>,
        then_branch: Box<ExprNode>,
        else_branch: Box<ExprNode>,
    },
    Assign {
        target: Box<ExprNode>,
        value: Box<ExprNode>,
    },
    Lambda(LambdaExpr),
    Parenthesized(Box<ExprNode>),
    Member {
        base: Box<ExprNode>,
        member: String,
        member_span: Span,
        null_conditional: bool,
    },
    IndexedMember {
        base: Box<ExprNode>,
        name: String,
        name_span: Span,
        null_conditional: bool,
    },
    Index {
        base: Box<ExprNode>,
        indices: Vec<ExprNode>,
        null_conditional: bool,
    },
    Call {
        callee: Box<ExprNode>,
        args: Vec<ExprNode>,
        null_conditional: bool,
    },
    New(NewExpr),
}

impl ExprNode {
    #[must_use]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    #[must_use]
    pub fn identifier(name: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::Identifier(name.into()), span)
    }

    #[must_use]
    pub fn literal(literal: Literal, span: Span) -> Self {
        Self::new(ExprKind::Literal(literal), span)
    }

    #[must_use]
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Whether this node is a postfix access guarded by `?`.
    #[must_use]
    pub fn is_null_conditional(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Member {
                null_conditional: true,
                ..
            } | ExprKind::IndexedMember {
                null_conditional: true,
                ..
            } | ExprKind::Index {
                null_conditional: true,
                ..
            } | ExprKind::Call {
                null_conditional: true,
                ..
            }
        )
    }

    /// Receiver of a postfix node.
    #[must_use]
    pub fn postfix_base(&self) -> Option<&ExprNode> {
        match &self.kind {
            ExprKind::Member { base, .. }
            | ExprKind::IndexedMember { base, .. }
            | ExprKind::Index { base, .. } => Some(base),
            ExprKind::Call { callee, .. } => Some(callee),
            _ => None,
        }
    }

    /// Whether a `?` appears anywhere on this node's postfix spine.
    #[must_use]
    pub fn starts_navigation_chain(&self) -> bool {
        let mut current = self;
        loop {
            if current.is_null_conditional() {
                return true;
            }
            match current.postfix_base() {
                Some(base) => current = base,
                None => return false,
            }
        }
    }

    /// Visit every direct child expression.
    pub fn for_each_child<'a>(&'a self, mut visit: impl FnMut(&'a ExprNode)) {
        match &self.kind {
            ExprKind::Literal(_) | ExprKind::Identifier(_) | ExprKind::This => {}
            ExprKind::Unary { expr, .. } | ExprKind::Parenthesized(expr) => visit(&**expr),
            ExprKind::Binary { left, right, .. } => {
                visit(&**left);
                visit(&**right);
            }
            ExprKind::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                visit(&**condition);
                visit(&**then_branch);
                visit(&**else_branch);
            }
            ExprKind::Assign { target, value } => {
                visit(&**target);
                visit(&**value);
            }
            ExprKind::Lambda(lambda) => visit(&*lambda.body),
            ExprKind::Member { base, .. } | ExprKind::IndexedMember { base, .. } => visit(&**base),
            ExprKind::Index { base, indices, .. } => {
                visit(&**base);
                indices.iter().for_each(visit);
            }
            ExprKind::Call { callee, args, .. } => {
                visit(&**callee);
                args.iter().for_each(visit);
            }
            ExprKind::New(new_expr) => {
                new_expr.args.iter().for_each(&mut visit);
                for initializer in &new_expr.initializers {
                    if let InitializerTarget::Index { indices, .. } = &initializer.target {
                        indices.iter().for_each(&mut visit);
                    }
                    visit(&initializer.value);
                }
            }
        }
    }

    /// Whether any node in this tree starts a navigation chain.
    #[must_use]
    pub fn contains_navigation(&self) -> bool {
        if self.is_null_conditional() {
            return true;
        }
        let mut found = false;
        self.for_each_child(|child| {
            if !found && child.contains_navigation() {
                found = true;
            }
        });
        found
    }
}
