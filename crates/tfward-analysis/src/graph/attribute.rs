//! Attributes, the nil-safe attribute view handed to rules, and the typed
//! values adapters produce.

use serde::{Deserialize, Serialize};
use tfward_core::{Metadata, SourceRange};

use super::block::Block;
use super::value::{Value, ValueKind};

/// A single `name = value` pair on a block.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub(crate) name: String,
    pub(crate) value: Value,
    pub(crate) range: SourceRange,
    pub(crate) reference: String,
    pub(crate) defaulted: bool,
}

impl Attribute {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn range(&self) -> &SourceRange {
        &self.range
    }

    /// True if no literal was present and a caller's fallback was substituted.
    pub fn is_defaulted(&self) -> bool {
        self.defaulted
    }

    pub fn metadata(&self) -> Metadata {
        Metadata::new(self.range.clone(), self.reference.clone())
    }
}

/// Nil-safe view of a possibly absent attribute.
///
/// Every predicate treats an absent attribute as failing, so rules can chain
/// reads without null checks. Use [`Attr::is_nil`] when absence itself matters.
#[derive(Debug, Clone, Copy)]
pub struct Attr<'a> {
    block: &'a Block,
    inner: Option<&'a Attribute>,
}

impl<'a> Attr<'a> {
    pub(crate) fn new(block: &'a Block, inner: Option<&'a Attribute>) -> Self {
        Self { block, inner }
    }

    pub fn is_nil(&self) -> bool {
        self.inner.is_none()
    }

    pub fn is_not_nil(&self) -> bool {
        self.inner.is_some()
    }

    pub fn attribute(&self) -> Option<&'a Attribute> {
        self.inner
    }

    pub fn value(&self) -> Option<&'a Value> {
        self.inner.map(|a| &a.value)
    }

    /// The block the attribute was read from.
    pub fn block(&self) -> &'a Block {
        self.block
    }

    pub fn is_true(&self) -> bool {
        self.value().and_then(Value::as_bool) == Some(true)
    }

    pub fn is_false(&self) -> bool {
        self.value().and_then(Value::as_bool) == Some(false)
    }

    pub fn equals(&self, expected: impl Into<Value>) -> bool {
        let expected = expected.into();
        self.value().is_some_and(|v| v.equals(&expected))
    }

    /// Negation of [`Attr::equals`]; an absent attribute is not equal to anything.
    pub fn not_equal(&self, expected: impl Into<Value>) -> bool {
        !self.equals(expected)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.value()
            .and_then(Value::as_str)
            .is_some_and(|s| s.starts_with(prefix))
    }

    pub fn ends_with(&self, suffix: &str) -> bool {
        self.value()
            .and_then(Value::as_str)
            .is_some_and(|s| s.ends_with(suffix))
    }

    /// Substring match for strings, element match for lists.
    pub fn contains(&self, needle: &str) -> bool {
        match self.value() {
            Some(Value::String(s)) => s.contains(needle),
            Some(Value::List(items)) => items.iter().any(|item| item.as_str() == Some(needle)),
            _ => false,
        }
    }

    /// Inclusive numeric range check.
    pub fn is_in_range(&self, min: f64, max: f64) -> bool {
        self.value()
            .and_then(Value::as_number)
            .is_some_and(|n| n >= min && n <= max)
    }

    /// Empty string or empty list. An absent attribute is not "empty".
    pub fn is_empty(&self) -> bool {
        match self.value() {
            Some(Value::String(s)) => s.is_empty(),
            Some(Value::List(items)) => items.is_empty(),
            _ => false,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.value(), Some(Value::Reference(_)))
    }

    /// Literal string, or `fallback` marked as defaulted.
    pub fn as_string_or_default(&self, fallback: &str) -> StringValue {
        match self.inner.and_then(|a| a.value.coerce(ValueKind::String)) {
            Some(Value::String(s)) => Typed::new(s, self.metadata()),
            _ => Typed::defaulted(fallback.to_string(), self.metadata()),
        }
    }

    /// Literal bool, or `fallback` marked as defaulted.
    pub fn as_bool_or_default(&self, fallback: bool) -> BoolValue {
        match self.value().and_then(Value::as_bool) {
            Some(b) => Typed::new(b, self.metadata()),
            None => Typed::defaulted(fallback, self.metadata()),
        }
    }

    /// Literal integer, or `fallback` marked as defaulted. Fractions truncate.
    pub fn as_int_or_default(&self, fallback: i64) -> IntValue {
        match self.value().and_then(Value::as_number) {
            Some(n) => Typed::new(n as i64, self.metadata()),
            None => Typed::defaulted(fallback, self.metadata()),
        }
    }

    /// The attribute's own location, or the owning block's when absent.
    pub fn metadata(&self) -> Metadata {
        match self.inner {
            Some(attr) => attr.metadata(),
            None => self.block.metadata(),
        }
    }
}

/// A value produced by an adapter, with provenance and a defaulted flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typed<T> {
    value: T,
    metadata: Metadata,
    defaulted: bool,
}

pub type StringValue = Typed<String>;
pub type BoolValue = Typed<bool>;
pub type IntValue = Typed<i64>;

impl<T> Typed<T> {
    /// A value read from a literal in the configuration.
    pub fn new(value: T, metadata: Metadata) -> Self {
        Self {
            value,
            metadata,
            defaulted: false,
        }
    }

    /// A value substituted because nothing was declared.
    pub fn defaulted(value: T, metadata: Metadata) -> Self {
        Self {
            value,
            metadata,
            defaulted: true,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn is_defaulted(&self) -> bool {
        self.defaulted
    }
}

impl<T: PartialEq> Typed<T> {
    pub fn equals(&self, other: &T) -> bool {
        &self.value == other
    }
}

impl Typed<bool> {
    pub fn is_true(&self) -> bool {
        self.value
    }

    pub fn is_false(&self) -> bool {
        !self.value
    }
}

impl Typed<String> {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn eq_str(&self, other: &str) -> bool {
        self.value == other
    }
}
