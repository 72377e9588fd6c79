use super::{ExprError, ExprParser};
use crate::frontend::lexer::{Keyword, TokenKind};
use crate::frontend::parser::types::scan_type;
use crate::syntax::expr::builders::{
    ExprKind, ExprNode, InitializerTarget, LambdaExpr, LambdaParam, Literal, NewExpr,
    ObjectInitializer,
};

impl<'a> ExprParser<'a> {
    pub(super) fn parse_primary(&mut self) -> Result<ExprNode, ExprError> {
        let start = self.index;
        let Some(token) = self.peek() else {
            return Err(ExprError::new(
                "expected expression",
                self.current_span(),
            ));
        };
        match &token.kind {
            TokenKind::Identifier => {
                if self.peek_n(1).is_some_and(|next| next.kind == TokenKind::Operator("=>")) {
                    return self.parse_simple_lambda();
                }
                self.advance();
                Ok(ExprNode::identifier(token.lexeme.clone(), token.span))
            }
            TokenKind::NumberLiteral(value) => {
                self.advance();
                Ok(ExprNode::literal(Literal::Int(*value), token.span))
            }
            TokenKind::StringLiteral(value) => {
                self.advance();
                Ok(ExprNode::literal(Literal::Str(value.clone()), token.span))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(ExprNode::literal(Literal::Bool(true), token.span))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(ExprNode::literal(Literal::Bool(false), token.span))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(ExprNode::literal(Literal::Null, token.span))
            }
            TokenKind::Keyword(Keyword::This) => {
                self.advance();
                Ok(ExprNode::new(ExprKind::This, token.span))
            }
            TokenKind::Keyword(Keyword::New) => self.parse_new(),
            TokenKind::Punctuation('(') => {
                if self.parenthesis_starts_lambda() {
                    return self.parse_parenthesized_lambda();
                }
                self.advance();
                let inner = self.nested(Self::parse_expression)?;
                self.require_punctuation(')', "to close parenthesized expression")?;
                Ok(ExprNode::new(
                    ExprKind::Parenthesized(inner.boxed()),
                    self.span_since(start),
                ))
            }
            TokenKind::Punctuation('$') => Err(ExprError::new(
                "indexed member name `$name` requires a receiver, as in `value.$name`",
                Some(token.span),
            )),
            _ => Err(ExprError::new(
                format!("expected expression, found `{}`", token.lexeme),
                Some(token.span),
            )),
        }
    }

    fn parenthesis_starts_lambda(&self) -> bool {
        self.matching_close(self.index)
            .and_then(|close| self.tokens.get(close + 1))
            .is_some_and(|token| token.kind == TokenKind::Operator("=>"))
    }

    /// `x => body`
    fn parse_simple_lambda(&mut self) -> Result<ExprNode, ExprError> {
        let start = self.index;
        let name = self.expect_identifier("as lambda parameter")?;
        let params = vec![LambdaParam {
            ty: None,
            name: name.lexeme.clone(),
            span: name.span,
        }];
        self.finish_lambda(start, params)
    }

    /// `(a, b) => body`, `(int a) => body`, `() => body`
    fn parse_parenthesized_lambda(&mut self) -> Result<ExprNode, ExprError> {
        let start = self.index;
        self.require_punctuation('(', "to open lambda parameters")?;
        let mut params = Vec::new();
        if !self.expect_punctuation(')') {
            loop {
                params.push(self.parse_lambda_param()?);
                if self.expect_punctuation(',') {
                    continue;
                }
                break;
            }
            self.require_punctuation(')', "to close lambda parameters")?;
        }
        self.finish_lambda(start, params)
    }

    fn parse_lambda_param(&mut self) -> Result<LambdaParam, ExprError> {
        if let Some((ty, next)) = scan_type(self.tokens, self.index)
            && self
                .tokens
                .get(next)
                .is_some_and(|token| matches!(token.kind, TokenKind::Identifier))
        {
            self.index = next;
            let name = self.expect_identifier("as lambda parameter name")?;
            return Ok(LambdaParam {
                ty: Some(ty),
                name: name.lexeme.clone(),
                span: name.span,
            });
        }
        let name = self.expect_identifier("as lambda parameter")?;
        Ok(LambdaParam {
            ty: None,
            name: name.lexeme.clone(),
            span: name.span,
        })
    }

    fn finish_lambda(
        &mut self,
        start: usize,
        params: Vec<LambdaParam>,
    ) -> Result<ExprNode, ExprError> {
        if !self.peek_operator("=>") {
            return Err(ExprError::new(
                "expected `=>` after lambda parameters",
                self.current_span(),
            ));
        }
        self.advance();
        if self.peek_punctuation('{') {
            return Err(ExprError::new(
                "lambda bodies must be expressions",
                self.current_span(),
            ));
        }
        let body = self.parse_assignment()?;
        Ok(ExprNode::new(
            ExprKind::Lambda(LambdaExpr {
                params,
                body: body.boxed(),
            }),
            self.span_since(start),
        ))
    }

    /// `new T(args) { Name = e, $name = e, [e] = e }`
    fn parse_new(&mut self) -> Result<ExprNode, ExprError> {
        let start = self.index;
        let new_span = self.current_span();
        self.advance();
        let Some((ty, next)) = scan_type(self.tokens, self.index) else {
            return Err(ExprError::new(
                "expected type name after `new`",
                self.current_span().or(new_span),
            ));
        };
        self.index = next;
        let mut args = Vec::new();
        let has_args = self.expect_punctuation('(');
        if has_args {
            args = self.parse_argument_list()?;
        }
        let mut initializers = Vec::new();
        let has_initializers = self.peek_punctuation('{');
        if has_initializers {
            initializers = self.parse_object_initializers()?;
        }
        if !has_args && !has_initializers {
            return Err(ExprError::new(
                format!("expected `(` or `{{` after `new {ty}`"),
                self.current_span(),
            ));
        }
        Ok(ExprNode::new(
            ExprKind::New(NewExpr {
                ty,
                args,
                initializers,
            }),
            self.span_since(start),
        ))
    }

    fn parse_object_initializers(&mut self) -> Result<Vec<ObjectInitializer>, ExprError> {
        self.require_punctuation('{', "to open object initializer")?;
        let mut entries = Vec::new();
        while !self.peek_punctuation('}') {
            let target_start = self.index;
            let target = if self.peek_punctuation('$') {
                let (name, span) = self.parse_indexed_member_name()?;
                InitializerTarget::IndexedMember { name, span }
            } else if self.peek_punctuation('[') {
                let indices = self.parse_bracketed_list()?;
                InitializerTarget::Index {
                    indices,
                    span: self.span_since(target_start),
                }
            } else {
                let name = self.expect_identifier("as initializer member")?;
                InitializerTarget::Member {
                    name: name.lexeme.clone(),
                    span: name.span,
                }
            };
            if !self.peek_operator("=") {
                return Err(ExprError::new(
                    "expected `=` in object initializer entry",
                    self.current_span(),
                ));
            }
            self.advance();
            let value = self.nested(Self::parse_expression)?;
            entries.push(ObjectInitializer { target, value });
            if !self.expect_punctuation(',') {
                break;
            }
        }
        self.require_punctuation('}', "to close object initializer")?;
        Ok(entries)
    }
}
