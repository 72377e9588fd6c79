//! Abstract syntax tree nodes for declarations, statements and types.
//!
//! Expressions live in [`crate::syntax::expr`]; declarations embed them as
//! [`ExprNode`](crate::syntax::expr::ExprNode) values.

pub mod items;
pub mod statements;
pub mod types;

pub use self::{items::*, statements::*, types::*};
