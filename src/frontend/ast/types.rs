//! AST type syntax nodes.

use crate::diagnostics::Span;
use std::fmt;

/// Type as written in source: `Name<Args>` followed by `?` / `[]` suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    pub name: String,
    pub args: Vec<TypeExpr>,
    pub suffixes: Vec<TypeSuffix>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSuffix {
    Nullable,
    Array,
}

impl TypeExpr {
    #[must_use]
    pub fn simple(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            suffixes: Vec::new(),
            span,
        }
    }

    #[must_use]
    pub fn with_suffix(mut self, suffix: TypeSuffix) -> Self {
        self.suffixes.push(suffix);
        self
    }

    /// Whether the outermost suffix makes the type nullable.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        matches!(self.suffixes.last(), Some(TypeSuffix::Nullable))
    }

    #[must_use]
    pub fn is_simple_name(&self) -> bool {
        self.args.is_empty() && self.suffixes.is_empty()
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (index, arg) in self.args.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        for suffix in &self.suffixes {
            match suffix {
                TypeSuffix::Nullable => f.write_str("?")?,
                TypeSuffix::Array => f.write_str("[]")?,
            }
        }
        Ok(())
    }
}
