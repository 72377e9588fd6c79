pub mod builders;
mod parser;
pub mod precedence;
pub mod pretty;

pub use builders::*;
pub use parser::{ExprError, parse_expression, parse_expression_at};
pub use pretty::*;
