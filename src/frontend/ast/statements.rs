use super::types::TypeExpr;
use crate::diagnostics::Span;
use crate::syntax::expr::ExprNode;

#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Statement {
    Block(Block),
    Return {
        value: Option<ExprNode>,
        span: Span,
    },
    If {
        condition: ExprNode,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
        span: Span,
    },
    /// `var x = e;` (`ty` is `None`) or `T x = e;`.
    Local {
        ty: Option<TypeExpr>,
        name: String,
        name_span: Span,
        initializer: Option<ExprNode>,
        span: Span,
    },
    Expression(ExprNode),
}

impl Statement {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Statement::Block(block) => block.span,
            Statement::Return { span, .. }
            | Statement::If { span, .. }
            | Statement::Local { span, .. } => *span,
            Statement::Expression(expr) => expr.span,
        }
    }
}
