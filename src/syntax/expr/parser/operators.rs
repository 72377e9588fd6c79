use super::{ExprError, ExprParser};
use crate::syntax::expr::builders::{ExprKind, ExprNode};
use crate::syntax::expr::precedence::{
    binary_precedence, is_assignment_operator, is_right_associative, unary_operator,
};

impl<'a> ExprParser<'a> {
    pub(crate) fn parse_expression(&mut self) -> Result<ExprNode, ExprError> {
        self.parse_assignment()
    }

    pub(super) fn parse_assignment(&mut self) -> Result<ExprNode, ExprError> {
        let start = self.index;
        let left = self.parse_conditional()?;
        if let Some(token) = self.peek()
            && is_assignment_operator(token)
        {
            self.advance();
            let value = self.parse_assignment()?;
            let span = self.span_since(start);
            return Ok(ExprNode::new(
                ExprKind::Assign {
                    target: left.boxed(),
                    value: value.boxed(),
                },
                span,
            ));
        }
        Ok(left)
    }

    pub(super) fn parse_conditional(&mut self) -> Result<ExprNode, ExprError> {
        let start = self.index;
        let condition = self.parse_binary(0)?;
        if !self.peek_punctuation('?') {
            return Ok(condition);
        }
        let question_span = self.current_span();
        self.advance();
        self.open_conditionals += 1;
        let then_branch = self.parse_assignment();
        self.open_conditionals -= 1;
        let then_branch = then_branch?;
        if !self.expect_punctuation(':') {
            let span = self.current_span().or(question_span);
            return Err(ExprError::new(
                "expected `:` after `?` branch in conditional expression",
                span,
            ));
        }
        let else_branch = self.parse_assignment()?;
        Ok(ExprNode::new(
            ExprKind::Conditional {
                condition: condition.boxed(),
                then_branch: then_branch.boxed(),
                else_branch: else_branch.boxed(),
            },
            self.span_since(start),
        ))
    }

    pub(super) fn parse_binary(&mut self, min_precedence: u8) -> Result<ExprNode, ExprError> {
        let start = self.index;
        let mut left = self.parse_unary()?;
        loop {
            let Some((precedence, op)) = self.peek().and_then(binary_precedence) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            self.advance();
            let next_min = if is_right_associative(op) {
                precedence
            } else {
                precedence + 1
            };
            let right = self.parse_binary(next_min)?;
            left = ExprNode::new(
                ExprKind::Binary {
                    op,
                    left: left.boxed(),
                    right: right.boxed(),
                },
                self.span_since(start),
            );
        }
        Ok(left)
    }

    pub(super) fn parse_unary(&mut self) -> Result<ExprNode, ExprError> {
        let start = self.index;
        if let Some(op) = self.peek().and_then(unary_operator) {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(ExprNode::new(
                ExprKind::Unary {
                    op,
                    expr: operand.boxed(),
                },
                self.span_since(start),
            ));
        }
        self.parse_postfix()
    }
}
