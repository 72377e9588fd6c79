use super::*;
use crate::frontend::ast::TypeSuffix;

/// Try to read a type starting at `start` without reporting anything.
///
/// Grammar: `Ident ('<' type (',' type)* '>')? ('?' | '[' ']')*`. A `?` is
/// only taken as a suffix when it cannot start a safe-navigation operator.
/// Returns the type and the index of the first token after it.
pub(crate) fn scan_type(tokens: &[Token], start: usize) -> Option<(TypeExpr, usize)> {
    let first = tokens.get(start)?;
    if !matches!(first.kind, TokenKind::Identifier) {
        return None;
    }
    let mut ty = TypeExpr::simple(first.lexeme.clone(), first.span);
    let mut index = start + 1;

    if tokens
        .get(index)
        .is_some_and(|token| token.kind == TokenKind::Operator("<"))
    {
        index += 1;
        loop {
            let (arg, next) = scan_type(tokens, index)?;
            ty.args.push(arg);
            index = next;
            let token = tokens.get(index)?;
            match token.kind {
                TokenKind::Punctuation(',') => index += 1,
                TokenKind::Operator(">") => {
                    index += 1;
                    break;
                }
                _ => return None,
            }
        }
    }

    loop {
        let Some(token) = tokens.get(index) else {
            break;
        };
        match token.kind {
            TokenKind::Punctuation('?') => {
                let guards_access = tokens.get(index + 1).is_some_and(|next| {
                    matches!(next.kind, TokenKind::Punctuation('.' | '[' | '('))
                });
                if guards_access {
                    break;
                }
                ty.suffixes.push(TypeSuffix::Nullable);
                index += 1;
            }
            TokenKind::Punctuation('[')
                if tokens
                    .get(index + 1)
                    .is_some_and(|next| next.kind == TokenKind::Punctuation(']')) =>
            {
                ty.suffixes.push(TypeSuffix::Array);
                index += 2;
            }
            _ => break,
        }
    }

    let last = tokens.get(index - 1)?;
    ty.span = ty.span.join(last.span);
    Some((ty, index))
}

parser_impl! {
    pub(super) fn parse_type(&mut self, context: &str) -> Option<TypeExpr> {
        if let Some((ty, next)) = scan_type(&self.tokens, self.index) {
            self.index = next;
            return Some(ty);
        }
        let span = self.current_span();
        let found = self.peek().map(|token| token.lexeme.clone());
        match found {
            Some(found) => {
                self.push_error(format!("expected type {context}, found `{found}`"), span)
            }
            None => self.push_error(format!("expected type {context}"), span),
        }
        None
    }

    /// Whether a type followed by an identifier starts at the cursor.
    pub(super) fn typed_name_ahead(&self) -> Option<usize> {
        let (_, next) = scan_type(&self.tokens, self.index)?;
        self.tokens
            .get(next)
            .is_some_and(|token| matches!(token.kind, TokenKind::Identifier))
            .then_some(next)
    }
}
