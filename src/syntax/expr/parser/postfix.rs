use super::{ExprError, ExprParser};
use crate::diagnostics::Span;
use crate::frontend::lexer::TokenKind;
use crate::syntax::expr::builders::{ExprKind, ExprNode};

impl<'a> ExprParser<'a> {
    pub(super) fn parse_postfix(&mut self) -> Result<ExprNode, ExprError> {
        let start = self.index;
        let mut expr = self.parse_primary()?;
        loop {
            if self.peek_punctuation('?') {
                if self.peek_punctuation_n(1, '.') {
                    self.advance(); // '?'
                    self.advance(); // '.'
                    expr = self.parse_member_suffix(expr, start, true)?;
                    continue;
                }
                if self.peek_punctuation_n(1, '[') {
                    self.advance(); // '?'
                    expr = self.parse_index_suffix(expr, start, true)?;
                    continue;
                }
                if self.peek_punctuation_n(1, '(') && self.question_starts_invocation() {
                    self.advance(); // '?'
                    expr = self.parse_call_suffix(expr, start, true)?;
                    continue;
                }
                break;
            }
            if self.expect_punctuation('.') {
                expr = self.parse_member_suffix(expr, start, false)?;
                continue;
            }
            if self.peek_punctuation('[') {
                expr = self.parse_index_suffix(expr, start, false)?;
                continue;
            }
            if self.peek_punctuation('(') {
                expr = self.parse_call_suffix(expr, start, false)?;
                continue;
            }
            break;
        }
        Ok(expr)
    }

    /// Member name after `.` or `?.`; `$name` goes through the dedicated production.
    fn parse_member_suffix(
        &mut self,
        base: ExprNode,
        start: usize,
        null_conditional: bool,
    ) -> Result<ExprNode, ExprError> {
        if self.peek_punctuation('$') {
            let (name, name_span) = self.parse_indexed_member_name()?;
            return Ok(ExprNode::new(
                ExprKind::IndexedMember {
                    base: base.boxed(),
                    name,
                    name_span,
                    null_conditional,
                },
                self.span_since(start),
            ));
        }
        let operator = if null_conditional { "`?.`" } else { "`.`" };
        let member = self.expect_identifier(&format!("after {operator}"))?;
        Ok(ExprNode::new(
            ExprKind::Member {
                base: base.boxed(),
                member: member.lexeme.clone(),
                member_span: member.span,
                null_conditional,
            },
            self.span_since(start),
        ))
    }

    fn parse_index_suffix(
        &mut self,
        base: ExprNode,
        start: usize,
        null_conditional: bool,
    ) -> Result<ExprNode, ExprError> {
        let indices = self.parse_bracketed_list()?;
        Ok(ExprNode::new(
            ExprKind::Index {
                base: base.boxed(),
                indices,
                null_conditional,
            },
            self.span_since(start),
        ))
    }

    fn parse_call_suffix(
        &mut self,
        callee: ExprNode,
        start: usize,
        null_conditional: bool,
    ) -> Result<ExprNode, ExprError> {
        self.require_punctuation('(', "to open argument list")?;
        let args = self.parse_argument_list()?;
        Ok(ExprNode::new(
            ExprKind::Call {
                callee: callee.boxed(),
                args,
                null_conditional,
            },
            self.span_since(start),
        ))
    }

    /// The `$identifier` production, shared by every context that admits it.
    ///
    /// It is never reachable from the ordinary identifier rule.
    pub(super) fn parse_indexed_member_name(&mut self) -> Result<(String, Span), ExprError> {
        let dollar_span = self.require_punctuation('$', "to start an indexed member name")?;
        let Some(name) = self.peek() else {
            return Err(ExprError::new(
                "expected identifier after `$`",
                Some(dollar_span),
            ));
        };
        if !matches!(name.kind, TokenKind::Identifier) {
            return Err(ExprError::new(
                format!("expected identifier after `$`, found `{}`", name.lexeme),
                Some(name.span),
            ));
        }
        if name.span.start != dollar_span.end {
            return Err(ExprError::new(
                "`$` must be immediately followed by the member name",
                Some(dollar_span.join(name.span)),
            ));
        }
        self.advance();
        Ok((name.lexeme.clone(), dollar_span.join(name.span)))
    }

    /// `[e, ...]`, also used for `[e] = v` initializer targets.
    pub(super) fn parse_bracketed_list(&mut self) -> Result<Vec<ExprNode>, ExprError> {
        let open = self.require_punctuation('[', "to open index list")?;
        if self.peek_punctuation(']') {
            return Err(ExprError::new(
                "expected index expression before `]`",
                self.current_span().or(Some(open)),
            ));
        }
        let mut indices = Vec::new();
        loop {
            indices.push(self.nested(Self::parse_expression)?);
            if self.expect_punctuation(',') {
                continue;
            }
            break;
        }
        self.require_punctuation(']', "after index expression")?;
        Ok(indices)
    }

    /// Arguments after an already consumed `(`, including the closing `)`.
    pub(super) fn parse_argument_list(&mut self) -> Result<Vec<ExprNode>, ExprError> {
        let mut args = Vec::new();
        if self.expect_punctuation(')') {
            return Ok(args);
        }
        loop {
            args.push(self.nested(Self::parse_expression)?);
            if self.expect_punctuation(',') {
                continue;
            }
            break;
        }
        self.require_punctuation(')', "after argument list")?;
        Ok(args)
    }

    /// Decide whether the `?` at the cursor guards an invocation (`e?(...)`).
    ///
    /// It does unless a `:` pairs with it at the same nesting depth before the
    /// enclosing expression ends, in which case `?` opens a conditional. The
    /// first `:` tokens at this depth belong to conditionals already open
    /// around the cursor, so they are skipped.
    fn question_starts_invocation(&self) -> bool {
        let mut depth = 0usize;
        let mut pending_questions = 0usize;
        let mut claimed_colons = self.open_conditionals;
        let mut index = self.index + 1;
        while let Some(token) = self.tokens.get(index) {
            match token.kind {
                TokenKind::Punctuation('(' | '[' | '{') => depth += 1,
                TokenKind::Punctuation(')' | ']' | '}') => {
                    if depth == 0 {
                        return true;
                    }
                    depth -= 1;
                }
                TokenKind::Punctuation(';' | ',') if depth == 0 => return true,
                TokenKind::Punctuation('?') if depth == 0 => {
                    let guards_access = self.tokens.get(index + 1).is_some_and(|next| {
                        matches!(next.kind, TokenKind::Punctuation('.' | '['))
                    });
                    if !guards_access {
                        pending_questions += 1;
                    }
                }
                TokenKind::Punctuation(':') if depth == 0 => {
                    if pending_questions > 0 {
                        pending_questions -= 1;
                    } else if claimed_colons > 0 {
                        claimed_colons -= 1;
                    } else {
                        return false;
                    }
                }
                _ => {}
            }
            index += 1;
        }
        true
    }
}
