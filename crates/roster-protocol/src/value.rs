//! The dynamically-typed payload carried by every parameter.
//!
//! Parameter values, property values, and message contents are untyped on
//! the wire. We model them as a closed tagged union, [`Value`], so the
//! rest of the workspace can pattern-match instead of guessing. The layer
//! never interprets message contents; it only moves `Value`s around.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A key in a property dictionary.
///
/// Well-known properties are keyed by small integers, application
/// properties by strings.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Key {
    Int(i64),
    Text(String),
}

impl Key {
    /// Returns the integer form, if this is an integer key.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<u8> for Key {
    fn from(n: u8) -> Self {
        Self::Int(n.into())
    }
}

/// A property set: key → value, unordered, last write wins.
pub type Properties = HashMap<Key, Value>;

/// Merges `changes` into `target`, overwriting existing keys.
pub fn merge_properties(target: &mut Properties, changes: &Properties) {
    for (key, value) in changes {
        target.insert(key.clone(), value.clone());
    }
}

/// A dynamically-typed wire value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    /// Dictionaries serialize as a list of `[key, value]` pairs so that
    /// non-string keys survive formats like JSON.
    Dict(#[serde(with = "dict_pairs")] HashMap<Key, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as an `i32`, if it is an integer in range.
    pub fn as_i32(&self) -> Option<i32> {
        self.as_i64().and_then(|n| i32::try_from(n).ok())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&HashMap<Key, Value>> {
        match self {
            Self::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    /// Converts an array of text values into owned strings.
    ///
    /// Returns `None` if this is not an array or any element is not text.
    pub fn to_str_list(&self) -> Option<Vec<String>> {
        self.as_array()?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    /// Converts an array of integers into `i32`s.
    pub fn to_i32_list(&self) -> Option<Vec<i32>> {
        self.as_array()?.iter().map(Value::as_i32).collect()
    }

    /// Loose truthiness, for result flags that servers may send as
    /// booleans or as numbers.
    ///
    /// `Null`, `false`, zero, NaN, and empty text are falsy. Bytes,
    /// arrays, and dicts are always truthy, even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(x) => *x != 0.0 && !x.is_nan(),
            Self::Text(s) => !s.is_empty(),
            Self::Bytes(_) | Self::Array(_) | Self::Dict(_) => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::Array(items) => write!(f, "[{} items]", items.len()),
            Self::Dict(dict) => write!(f, "{{{} entries}}", dict.len()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<u8> for Value {
    fn from(n: u8) -> Self {
        Self::Int(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Int(n) => Self::Int(n),
            Key::Text(s) => Self::Text(s),
        }
    }
}

impl From<Properties> for Value {
    fn from(dict: Properties) -> Self {
        Self::Dict(dict)
    }
}

/// Collecting into a `Value` builds an array:
/// `names.iter().map(String::as_str).collect::<Value>()`.
impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Array(iter.into_iter().map(Into::into).collect())
    }
}

mod dict_pairs {
    use std::collections::HashMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use super::{Key, Value};

    pub(super) fn serialize<S: Serializer>(
        dict: &HashMap<Key, Value>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(dict.iter())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<Key, Value>, D::Error> {
        let pairs: Vec<(Key, Value)> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}
