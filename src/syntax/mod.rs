//! Expression syntax: AST, parser, and formatter.

pub mod expr;
