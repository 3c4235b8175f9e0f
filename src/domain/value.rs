//! Structured metadata values and the key-value mapping they live in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The structured representation of one document's metadata.
///
/// Keys are unique within a mapping; when the raw encoding allows a key to
/// appear more than once, the parse step resolves it last-occurrence-wins.
/// `BTreeMap` keeps iteration deterministic, which the serializers rely on.
pub type Mapping = BTreeMap<String, Value>;

/// A single metadata value.
///
/// Values are recursively a string, a sequence of values, or a nested
/// mapping. Scalars of any textual cue (numbers, booleans, null) are carried
/// as their string form — the engine does structural conversion only and
/// leaves semantic typing to callers.
///
/// # Examples
///
/// ```
/// use notemeta::domain::Value;
///
/// let v = Value::from("hello");
/// assert_eq!(v.as_str(), Some("hello"));
///
/// let seq = Value::Sequence(vec![Value::from("a"), Value::from("b")]);
/// assert_eq!(seq.as_sequence().unwrap().len(), 2);
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A scalar carried verbatim as text.
    String(String),
    /// An ordered sequence of values.
    Sequence(Vec<Value>),
    /// A nested key-value mapping.
    Mapping(Mapping),
}

impl Value {
    /// Returns the string content if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements if this is a `Sequence` value.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries if this is a `Mapping` value.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Mapping> for Value {
    fn from(entries: Mapping) -> Self {
        Value::Mapping(entries)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            Value::Sequence(items) => f.debug_list().entries(items).finish(),
            Value::Mapping(entries) => f.debug_map().entries(entries).finish(),
        }
    }
}

/// Convenience constructor for a sequence of string values.
pub fn string_sequence<I, S>(items: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Value::Sequence(items.into_iter().map(|s| Value::String(s.into())).collect())
}
