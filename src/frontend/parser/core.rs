use super::*;
use crate::syntax::expr::{ExprNode, parse_expression_at};

parser_impl! {
    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    pub(super) fn peek_n(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.index + offset)
    }

    pub(super) fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.index)?;
        self.index += 1;
        Some(token)
    }

    pub(super) fn current_span(&self) -> Option<Span> {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|token| token.span)
    }

    pub(super) fn previous_span(&self) -> Span {
        self.index
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map(|token| token.span)
            .unwrap_or_default()
    }

    /// Span from the token at `start` to the last consumed token.
    pub(super) fn span_from(&self, start: usize) -> Span {
        let first = self
            .tokens
            .get(start)
            .map(|token| token.span)
            .unwrap_or_default();
        if self.index > start {
            first.join(self.previous_span())
        } else {
            first
        }
    }

    pub(super) fn push_error(&mut self, message: impl Into<String>, span: Option<Span>) {
        self.diagnostics.push_error(message, span);
    }

    pub(super) fn check_punctuation(&self, expected: char) -> bool {
        self.peek()
            .is_some_and(|token| token.kind == TokenKind::Punctuation(expected))
    }

    pub(super) fn check_punctuation_n(&self, offset: usize, expected: char) -> bool {
        self.peek_n(offset)
            .is_some_and(|token| token.kind == TokenKind::Punctuation(expected))
    }

    pub(super) fn consume_punctuation(&mut self, expected: char) -> bool {
        if self.check_punctuation(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn expect_punctuation(&mut self, expected: char) -> bool {
        if self.consume_punctuation(expected) {
            return true;
        }
        let found = self.peek().map(|token| token.lexeme.clone());
        let span = self.current_span();
        match found {
            Some(found) => self.push_error(format!("expected `{expected}`, found `{found}`"), span),
            None => self.push_error(format!("expected `{expected}` before end of input"), span),
        }
        false
    }

    pub(super) fn check_operator(&self, op: &str) -> bool {
        self.peek()
            .is_some_and(|token| matches!(token.kind, TokenKind::Operator(found) if found == op))
    }

    pub(super) fn consume_operator(&mut self, op: &str) -> bool {
        if self.check_operator(op) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek()
            .is_some_and(|token| token.kind == TokenKind::Keyword(keyword))
    }

    pub(super) fn consume_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn check_identifier(&self) -> bool {
        self.peek()
            .is_some_and(|token| matches!(token.kind, TokenKind::Identifier))
    }

    /// Consume an identifier, reporting `message` when something else is found.
    pub(super) fn consume_identifier(&mut self, message: &str) -> Option<(String, Span)> {
        let Some(token) = self.peek() else {
            let span = self.current_span();
            self.push_error(message, span);
            return None;
        };
        if matches!(token.kind, TokenKind::Identifier) {
            let result = (token.lexeme.clone(), token.span);
            self.advance();
            return Some(result);
        }
        let span = Some(token.span);
        let found = token.lexeme.clone();
        self.push_error(format!("{message}, found `{found}`"), span);
        None
    }

    /// Parse one expression through the shared expression parser.
    ///
    /// On failure the error is reported and the cursor skips to the end of
    /// the enclosing statement.
    pub(super) fn parse_expression(&mut self) -> Option<ExprNode> {
        match parse_expression_at(&self.tokens, self.index) {
            Ok((expr, next)) => {
                self.index = next;
                Some(expr)
            }
            Err(err) => {
                self.diagnostics.push(err.into_diagnostic());
                self.skip_expression_until_terminator();
                None
            }
        }
    }

    pub(super) fn skip_expression_until_terminator(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Punctuation('(' | '[' | '{') => depth += 1,
                TokenKind::Punctuation(')' | ']' | '}') => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                TokenKind::Punctuation(';' | ',') if depth == 0 => break,
                _ => {}
            }
            self.advance();
        }
    }

    /// Skip to the end of the current member: past the next top-level `;`, or
    /// past a complete `{ ... }` block, stopping at the enclosing `}`.
    pub(super) fn synchronize_member(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Punctuation('{') => depth += 1,
                TokenKind::Punctuation('}') => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                TokenKind::Punctuation(';') if depth == 0 => {
                    self.advance();
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }

    pub(super) fn synchronize_statement(&mut self) {
        self.skip_expression_until_terminator();
        self.consume_punctuation(';');
    }
}
