//! Frontend components: lexer, AST, and declaration parser.

pub mod ast;
pub mod lexer;
pub mod parser;
