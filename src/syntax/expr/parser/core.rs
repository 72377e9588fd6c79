use crate::diagnostics::{Diagnostic, Span};
use crate::frontend::lexer::{Keyword, Token, TokenKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExprError {
    pub message: String,
    pub span: Option<Span>,
}

impl ExprError {
    pub fn new(message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    #[must_use]
    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::error(self.message, self.span)
    }
}

/// Recursive-descent expression parser over a borrowed token slice.
///
/// The declaration parser hands over its cursor position and takes it back
/// once the expression ends, so no tokens are copied.
pub(crate) struct ExprParser<'a> {
    pub(crate) tokens: &'a [Token],
    pub(crate) index: usize,
    /// Conditionals at the current bracket level whose `:` is still ahead.
    pub(super) open_conditionals: usize,
}

impl<'a> ExprParser<'a> {
    pub(crate) fn new(tokens: &'a [Token], index: usize) -> Self {
        Self {
            tokens,
            index,
            open_conditionals: 0,
        }
    }

    /// Run `parse` inside a bracketed region, where no enclosing conditional
    /// can claim a `:`.
    pub(super) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ExprError>,
    ) -> Result<T, ExprError> {
        let saved = std::mem::take(&mut self.open_conditionals);
        let result = parse(self);
        self.open_conditionals = saved;
        result
    }

    pub(crate) fn expect_end(&mut self) -> Result<(), ExprError> {
        match self.peek() {
            Some(token) => Err(ExprError::new(
                format!("unexpected token `{}` after expression", token.lexeme),
                Some(token.span),
            )),
            None => Ok(()),
        }
    }

    pub(crate) fn expect_punctuation(&mut self, ch: char) -> bool {
        if self.peek_punctuation(ch) {
            self.advance();
            return true;
        }
        false
    }

    pub(crate) fn require_punctuation(
        &mut self,
        ch: char,
        context: &str,
    ) -> Result<Span, ExprError> {
        if let Some(token) = self.peek()
            && matches!(token.kind, TokenKind::Punctuation(c) if c == ch)
        {
            let span = token.span;
            self.advance();
            return Ok(span);
        }
        Err(ExprError::new(
            format!("expected `{ch}` {context}"),
            self.current_span(),
        ))
    }

    pub(crate) fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    pub(crate) fn peek_n(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.index.saturating_add(offset))
    }

    pub(crate) fn peek_punctuation(&self, ch: char) -> bool {
        self.peek()
            .is_some_and(|token| matches!(token.kind, TokenKind::Punctuation(c) if c == ch))
    }

    pub(crate) fn peek_punctuation_n(&self, offset: usize, ch: char) -> bool {
        self.peek_n(offset)
            .is_some_and(|token| matches!(token.kind, TokenKind::Punctuation(c) if c == ch))
    }

    pub(crate) fn peek_operator(&self, op: &str) -> bool {
        self.peek()
            .is_some_and(|token| matches!(token.kind, TokenKind::Operator(found) if found == op))
    }

    pub(crate) fn peek_keyword(&self, keyword: Keyword) -> bool {
        self.peek()
            .is_some_and(|token| token.kind == TokenKind::Keyword(keyword))
    }

    pub(crate) fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.index)?;
        self.index += 1;
        Some(token)
    }

    /// Span of the next token, or of the last token when input is exhausted.
    pub(crate) fn current_span(&self) -> Option<Span> {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|token| token.span)
    }

    pub(crate) fn previous_span(&self) -> Option<Span> {
        self.index
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map(|token| token.span)
    }

    pub(crate) fn expect_identifier(&mut self, context: &str) -> Result<&'a Token, ExprError> {
        match self.peek() {
            Some(token) if matches!(token.kind, TokenKind::Identifier) => {
                self.index += 1;
                Ok(token)
            }
            Some(token) => Err(ExprError::new(
                format!("expected identifier {context}, found `{}`", token.lexeme),
                Some(token.span),
            )),
            None => Err(ExprError::new(
                format!("expected identifier {context}"),
                self.current_span(),
            )),
        }
    }

    /// Index of the token closing the bracket opened at `open_index`.
    pub(crate) fn matching_close(&self, open_index: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (offset, token) in self.tokens.get(open_index..)?.iter().enumerate() {
            match token.kind {
                TokenKind::Punctuation('(' | '[' | '{') => depth += 1,
                TokenKind::Punctuation(')' | ']' | '}') => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(open_index + offset);
                    }
                }
                _ => {}
            }
        }
        None
    }

    pub(crate) fn span_for_range(&self, start: usize, end: usize) -> Option<Span> {
        if start >= end {
            return None;
        }
        let first = self.tokens.get(start)?;
        let last = self.tokens.get(end - 1)?;
        Some(first.span.join(last.span))
    }

    /// Span covering the tokens consumed since `start`.
    pub(crate) fn span_since(&self, start: usize) -> Span {
        self.span_for_range(start, self.index)
            .or_else(|| self.current_span())
            .unwrap_or_default()
    }
}
