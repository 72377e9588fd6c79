use super::*;

parser_impl! {
    pub(super) fn parse_block(&mut self) -> Block {
        let start = self.index;
        self.expect_punctuation('{');
        let mut statements = Vec::new();
        while let Some(token) = self.peek() {
            if token.kind == TokenKind::Punctuation('}') {
                break;
            }
            let before = self.index;
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            if self.index == before {
                self.advance();
            }
        }
        self.expect_punctuation('}');
        Block {
            statements,
            span: self.span_from(start),
        }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        let start = self.index;
        if self.check_punctuation('{') {
            return Some(Statement::Block(self.parse_block()));
        }
        if self.consume_keyword(Keyword::Return) {
            let value = if self.check_punctuation(';') {
                None
            } else {
                Some(self.parse_expression()?)
            };
            if !self.expect_punctuation(';') {
                self.synchronize_statement();
            }
            return Some(Statement::Return {
                value,
                span: self.span_from(start),
            });
        }
        if self.consume_keyword(Keyword::If) {
            return self.parse_if(start);
        }
        if self.consume_keyword(Keyword::Var) {
            return self.parse_local(start, None);
        }
        if self.local_declaration_ahead() {
            let ty = self.parse_type("for local")?;
            return self.parse_local(start, Some(ty));
        }

        let expr = self.parse_expression()?;
        if !self.expect_punctuation(';') {
            self.synchronize_statement();
        }
        Some(Statement::Expression(expr))
    }

    fn parse_if(&mut self, start: usize) -> Option<Statement> {
        if !self.expect_punctuation('(') {
            self.synchronize_statement();
            return None;
        }
        let condition = self.parse_expression()?;
        if !self.expect_punctuation(')') {
            self.synchronize_statement();
            return None;
        }
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.consume_keyword(Keyword::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Some(Statement::If {
            condition,
            then_branch,
            else_branch,
            span: self.span_from(start),
        })
    }

    fn parse_local(&mut self, start: usize, ty: Option<TypeExpr>) -> Option<Statement> {
        let Some((name, name_span)) = self.consume_identifier("expected local name") else {
            self.synchronize_statement();
            return None;
        };
        let initializer = if self.consume_operator("=") {
            Some(self.parse_expression()?)
        } else {
            None
        };
        if ty.is_none() && initializer.is_none() {
            self.push_error(
                format!("`var {name}` needs an initializer to infer its type"),
                Some(name_span),
            );
        }
        if !self.expect_punctuation(';') {
            self.synchronize_statement();
        }
        Some(Statement::Local {
            ty,
            name,
            name_span,
            initializer,
            span: self.span_from(start),
        })
    }

    /// `Type name` followed by `=` or `;`; anything else is an expression.
    fn local_declaration_ahead(&self) -> bool {
        self.typed_name_ahead()
            .and_then(|after_type| self.tokens.get(after_type + 1))
            .is_some_and(|token| {
                token.kind == TokenKind::Punctuation(';') || token.kind == TokenKind::Operator("=")
            })
    }
}
