//! Expression parser shared by declaration parsing and tests.

use crate::frontend::lexer::{LexOutput, Token, lex};
use crate::syntax::expr::builders::ExprNode;

mod core;
mod operators;
mod postfix;
mod primary;

pub use core::ExprError;
pub(crate) use core::ExprParser;

/// Parse a standalone expression snippet.
///
/// # Errors
/// Returns an [`ExprError`] when lexing or parsing the supplied source fails.
pub fn parse_expression(source: &str) -> Result<ExprNode, ExprError> {
    let output: LexOutput = lex(source);
    if let Some(diag) = output
        .diagnostics
        .iter()
        .find(|diag| diag.severity.is_error())
    {
        return Err(ExprError::new(
            format!("lex error while parsing expression: {}", diag.message),
            diag.span(),
        ));
    }
    let tokens = output.significant_tokens();
    let mut parser = ExprParser::new(&tokens, 0);
    let expr = parser.parse_expression()?;
    parser.expect_end()?;
    Ok(expr)
}

/// Parse one expression starting at `start`, returning it with the index of
/// the first token after it.
///
/// # Errors
/// Returns an [`ExprError`] when no expression can be parsed at `start`.
pub fn parse_expression_at(tokens: &[Token], start: usize) -> Result<(ExprNode, usize), ExprError> {
    let mut parser = ExprParser::new(tokens, start);
    let expr = parser.parse_expression()?;
    Ok((expr, parser.index))
}

#[cfg(test)]
mod tests;
