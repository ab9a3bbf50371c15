//! Attribute values: a closed set of variants with total conversions.
//!
//! Every conversion returns `Option` instead of failing, and every comparison
//! across incompatible kinds is simply "not equal".

use serde::{Deserialize, Serialize};

use super::address::Reference;

/// The kind of a [`Value`], used to decide type compatibility when a caller
/// supplies a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Bool,
    Number,
    List,
    Reference,
    Unknown,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::List => "list",
            Self::Reference => "reference",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A literal (or unevaluated reference) as handed over by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    String(String),
    Bool(bool),
    Number(f64),
    List(Vec<Value>),
    Reference(Reference),
    /// An expression the core does not interpret (function calls, conditionals, loops).
    Unknown,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::List(_) => ValueKind::List,
            Self::Reference(_) => ValueKind::Reference,
            Self::Unknown => ValueKind::Unknown,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Bool literals, plus the strings `"true"`/`"false"` (any case), which the
    /// configuration language coerces to bools.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Self::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    /// Number literals, plus strings that parse as numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Convert to `kind` if the value can stand in for it. `Unknown` accepts anything.
    pub fn coerce(&self, kind: ValueKind) -> Option<Value> {
        match kind {
            ValueKind::Unknown => Some(self.clone()),
            ValueKind::String => match self {
                Self::String(_) => Some(self.clone()),
                Self::Bool(b) => Some(Self::String(b.to_string())),
                Self::Number(n) => Some(Self::String(format_number(*n))),
                _ => None,
            },
            ValueKind::Bool => self.as_bool().map(Self::Bool),
            ValueKind::Number => self.as_number().map(Self::Number),
            ValueKind::List => match self {
                Self::List(_) => Some(self.clone()),
                _ => None,
            },
            ValueKind::Reference => match self {
                Self::Reference(_) => Some(self.clone()),
                _ => None,
            },
        }
    }

    /// Comparison by kind. The expected value's kind drives the conversion of
    /// `self`; anything that does not convert is not equal.
    pub fn equals(&self, expected: &Value) -> bool {
        match expected {
            Self::String(s) => self.as_str() == Some(s.as_str()),
            Self::Bool(b) => self.as_bool() == Some(*b),
            Self::Number(n) => self.as_number() == Some(*n),
            Self::List(items) => match self.as_list() {
                Some(own) => own.len() == items.len() && own.iter().zip(items).all(|(a, b)| a.equals(b)),
                None => false,
            },
            Self::Reference(r) => self.as_reference().is_some_and(|own| own.raw() == r.raw()),
            Self::Unknown => false,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Reference(r) => f.write_str(r.raw()),
            Self::Unknown => f.write_str("<unknown>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<Reference> for Value {
    fn from(r: Reference) -> Self {
        Self::Reference(r)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}
