use std::collections::HashMap;
use std::fmt;

/// Constraint carried by a generic parameter from its `where` clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamConstraint {
    None,
    Class,
    Struct,
    /// Constrained to a named base type.
    Base(String),
}

/// Semantic type used by the analyzers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    Named { name: String, args: Vec<Ty> },
    Array(Box<Ty>),
    Nullable(Box<Ty>),
    Param {
        name: String,
        constraint: ParamConstraint,
    },
    Delegate { params: Vec<Ty>, ret: Box<Ty> },
    /// Type of the `null` literal.
    Null,
    Void,
    /// Already reported; suppresses follow-up diagnostics.
    Error,
}

/// Reference/value classification of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Reference,
    Value,
    NullableValue,
    Void,
    Unknown,
}

impl Ty {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Ty::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn generic(name: impl Into<String>, args: Vec<Ty>) -> Self {
        Ty::Named {
            name: name.into(),
            args,
        }
    }

    #[must_use]
    pub fn int() -> Self {
        Ty::named("int")
    }

    #[must_use]
    pub fn bool() -> Self {
        Ty::named("bool")
    }

    #[must_use]
    pub fn string() -> Self {
        Ty::named("string")
    }

    #[must_use]
    pub fn char() -> Self {
        Ty::named("char")
    }

    #[must_use]
    pub fn object() -> Self {
        Ty::named("object")
    }

    /// Wrap in `Nullable`, never producing `T??`.
    #[must_use]
    pub fn nullable(inner: Ty) -> Self {
        match inner {
            Ty::Nullable(_) | Ty::Error => inner,
            other => Ty::Nullable(Box::new(other)),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Ty::Error)
    }

    #[must_use]
    pub fn is_named(&self, expected: &str) -> bool {
        matches!(self, Ty::Named { name, args } if name == expected && args.is_empty())
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        numeric_rank(self).is_some()
    }

    /// Inner type of `T?`.
    #[must_use]
    pub fn nullable_inner(&self) -> Option<&Ty> {
        match self {
            Ty::Nullable(inner) => Some(inner),
            _ => None,
        }
    }

    /// Whether this type or any component is `Ty::Error`.
    #[must_use]
    pub fn contains_error(&self) -> bool {
        match self {
            Ty::Error => true,
            Ty::Named { args, .. } => args.iter().any(Ty::contains_error),
            Ty::Array(inner) | Ty::Nullable(inner) => inner.contains_error(),
            Ty::Delegate { params, ret } => {
                params.iter().any(Ty::contains_error) || ret.contains_error()
            }
            Ty::Param { .. } | Ty::Null | Ty::Void => false,
        }
    }

    /// Replace generic parameters by name.
    #[must_use]
    pub fn substitute(&self, map: &HashMap<String, Ty>) -> Ty {
        if map.is_empty() {
            return self.clone();
        }
        match self {
            Ty::Param { name, .. } => map.get(name).cloned().unwrap_or_else(|| self.clone()),
            Ty::Named { name, args } => Ty::Named {
                name: name.clone(),
                args: args.iter().map(|arg| arg.substitute(map)).collect(),
            },
            Ty::Array(inner) => Ty::Array(Box::new(inner.substitute(map))),
            Ty::Nullable(inner) => Ty::nullable(inner.substitute(map)),
            Ty::Delegate { params, ret } => Ty::Delegate {
                params: params.iter().map(|param| param.substitute(map)).collect(),
                ret: Box::new(ret.substitute(map)),
            },
            Ty::Null | Ty::Void | Ty::Error => self.clone(),
        }
    }
}

/// Widening order of the numeric built-ins.
pub(crate) fn numeric_rank(ty: &Ty) -> Option<u8> {
    match ty {
        Ty::Named { name, args } if args.is_empty() => match name.as_str() {
            "int" => Some(0),
            "long" => Some(1),
            "double" => Some(2),
            _ => None,
        },
        _ => None,
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Named { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    write_list(f, args)?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            Ty::Array(inner) => write!(f, "{inner}[]"),
            Ty::Nullable(inner) => write!(f, "{inner}?"),
            Ty::Param { name, .. } => f.write_str(name),
            Ty::Delegate { params, ret } => {
                f.write_str("(")?;
                write_list(f, params)?;
                write!(f, ") => {ret}")
            }
            Ty::Null => f.write_str("null"),
            Ty::Void => f.write_str("void"),
            Ty::Error => f.write_str("{error}"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Ty]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
