mod body;
pub mod diagnostics;
pub mod expr;
pub mod navigation;
pub mod table;
pub mod types;

pub use body::{check_type, check_unit};
pub use expr::{Expectation, ExprTyper, TyperOutput};
pub use navigation::{ChainPlan, InferredResultType, NavigationChain, NavigationRecord};
pub use table::{TypeOracle, TypeTable, is_assignable};
pub use types::{ParamConstraint, Ty, TypeCategory};
