//! Operator precedence and classification helpers shared between the parser
//! and formatter.

use crate::frontend::lexer::{Keyword, Token, TokenKind};

use super::builders::{BinOp, UnOp};

#[derive(Clone, Copy)]
struct BinaryOpSpec {
    symbol: &'static str,
    precedence: u8,
    op: BinOp,
}

const BINARY_OP_SPECS: &[BinaryOpSpec] = &[
    BinaryOpSpec {
        symbol: "??",
        precedence: 1,
        op: BinOp::NullCoalesce,
    },
    BinaryOpSpec {
        symbol: "||",
        precedence: 2,
        op: BinOp::Or,
    },
    BinaryOpSpec {
        symbol: "&&",
        precedence: 3,
        op: BinOp::And,
    },
    BinaryOpSpec {
        symbol: "==",
        precedence: 4,
        op: BinOp::Eq,
    },
    BinaryOpSpec {
        symbol: "!=",
        precedence: 4,
        op: BinOp::Ne,
    },
    BinaryOpSpec {
        symbol: "<",
        precedence: 5,
        op: BinOp::Lt,
    },
    BinaryOpSpec {
        symbol: "<=",
        precedence: 5,
        op: BinOp::Le,
    },
    BinaryOpSpec {
        symbol: ">",
        precedence: 5,
        op: BinOp::Gt,
    },
    BinaryOpSpec {
        symbol: ">=",
        precedence: 5,
        op: BinOp::Ge,
    },
    BinaryOpSpec {
        symbol: "+",
        precedence: 6,
        op: BinOp::Add,
    },
    BinaryOpSpec {
        symbol: "-",
        precedence: 6,
        op: BinOp::Sub,
    },
    BinaryOpSpec {
        symbol: "*",
        precedence: 7,
        op: BinOp::Mul,
    },
    BinaryOpSpec {
        symbol: "/",
        precedence: 7,
        op: BinOp::Div,
    },
    BinaryOpSpec {
        symbol: "%",
        precedence: 7,
        op: BinOp::Rem,
    },
];

/// Precedence and operator for a binary operator token.
#[must_use]
pub fn binary_precedence(token: &Token) -> Option<(u8, BinOp)> {
    let TokenKind::Operator(symbol) = token.kind else {
        return None;
    };
    BINARY_OP_SPECS
        .iter()
        .find(|spec| spec.symbol == symbol)
        .map(|spec| (spec.precedence, spec.op))
}

/// Precedence used when printing a binary operator.
#[must_use]
pub fn precedence_of(op: BinOp) -> u8 {
    BINARY_OP_SPECS
        .iter()
        .find(|spec| spec.op == op)
        .map_or(0, |spec| spec.precedence)
}

/// `??` groups to the right; every other binary operator to the left.
#[must_use]
pub fn is_right_associative(op: BinOp) -> bool {
    matches!(op, BinOp::NullCoalesce)
}

#[must_use]
pub fn unary_operator(token: &Token) -> Option<UnOp> {
    match token.kind {
        TokenKind::Operator("!") => Some(UnOp::Not),
        TokenKind::Operator("-") => Some(UnOp::Neg),
        _ => None,
    }
}

#[must_use]
pub fn is_assignment_operator(token: &Token) -> bool {
    matches!(token.kind, TokenKind::Operator("="))
}

/// Whether `token` can begin an operand.
#[must_use]
pub fn can_start_unary_expression(token: &Token) -> bool {
    match &token.kind {
        TokenKind::Identifier
        | TokenKind::NumberLiteral(_)
        | TokenKind::StringLiteral(_)
        | TokenKind::Punctuation('(') => true,
        TokenKind::Keyword(keyword) => matches!(
            keyword,
            Keyword::This | Keyword::Null | Keyword::True | Keyword::False | Keyword::New
        ),
        TokenKind::Operator(op) => matches!(*op, "!" | "-"),
        _ => false,
    }
}
