//! Outbound parameter sequences and inbound parameter lookup.
//!
//! Outbound requests carry their arguments as a flat sequence of
//! `(code, value)` pairs. The receiving side is keyed by code, but each
//! operation still emits its pairs in a fixed order, and an omitted value
//! always omits its code too. [`ParamSequence`] is the append-only builder
//! for that sequence; on the wire it is a flat alternating array:
//!
//! ```text
//! [255, "lobby", 250, false]
//!  └code └value  └code └value
//! ```
//!
//! Inbound events and responses carry an unordered `code → value` map
//! ([`ParamMap`]); [`ParamLookup`] adds typed accessors on top of it.

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Key, ProtocolError, Value};

/// The `vals` map of an inbound event or response.
pub type ParamMap = HashMap<u8, Value>;

// ---------------------------------------------------------------------------
// ParamSequence
// ---------------------------------------------------------------------------

/// An ordered, append-only list of `(parameter code, value)` pairs.
///
/// ```rust
/// use roster_protocol::{ParamSequence, Value};
///
/// let mut params = ParamSequence::new();
/// params.push(255, "lobby").push(250, false);
/// params.push_opt(236, None::<i32>);
///
/// assert_eq!(params.codes(), vec![255, 250]);
/// assert_eq!(params.get(255), Some(&Value::from("lobby")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSequence {
    pairs: Vec<(u8, Value)>,
}

impl ParamSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pair.
    pub fn push(&mut self, code: u8, value: impl Into<Value>) -> &mut Self {
        self.pairs.push((code, value.into()));
        self
    }

    /// Appends a pair only when `value` is present. `None` emits nothing,
    /// neither the code nor a placeholder.
    pub fn push_opt<V: Into<Value>>(
        &mut self,
        code: u8,
        value: Option<V>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.push(code, value);
        }
        self
    }

    /// Returns the first value recorded under `code`.
    pub fn get(&self, code: u8) -> Option<&Value> {
        self.pairs
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, v)| v)
    }

    /// The codes in emission order.
    pub fn codes(&self) -> Vec<u8> {
        self.pairs.iter().map(|(c, _)| *c).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Value)> {
        self.pairs.iter().map(|(c, v)| (*c, v))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Flattens into the alternating `[code, value, code, value, …]` form.
    pub fn into_flat(self) -> Vec<Value> {
        let mut flat = Vec::with_capacity(self.pairs.len() * 2);
        for (code, value) in self.pairs {
            flat.push(Value::from(code));
            flat.push(value);
        }
        flat
    }

    /// Converts into a lookup map, as the receiving side sees it.
    pub fn into_map(self) -> ParamMap {
        self.pairs.into_iter().collect()
    }
}

impl Serialize for ParamSequence {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.pairs.len() * 2))?;
        for (code, value) in &self.pairs {
            seq.serialize_element(code)?;
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for ParamSequence {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(FlatVisitor)
    }
}

struct FlatVisitor;

impl<'de> Visitor<'de> for FlatVisitor {
    type Value = ParamSequence;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a flat array alternating parameter codes and values")
    }

    fn visit_seq<A: SeqAccess<'de>>(
        self,
        mut seq: A,
    ) -> Result<ParamSequence, A::Error> {
        let mut params = ParamSequence::new();
        let mut index = 0;
        while let Some(code) = seq.next_element::<u8>()? {
            let value = seq
                .next_element::<Value>()?
                .ok_or_else(|| de::Error::invalid_length(index + 1, &self))?;
            params.pairs.push((code, value));
            index += 2;
        }
        Ok(params)
    }
}

// ---------------------------------------------------------------------------
// ParamLookup
// ---------------------------------------------------------------------------

/// Typed accessors over an inbound parameter map.
///
/// The `require_*` methods fail with [`ProtocolError::MissingParameter`]
/// when the code is absent and [`ProtocolError::WrongType`] when the value
/// has the wrong shape. The `optional_*` methods treat absence as `None`
/// but still reject a present value of the wrong shape.
pub trait ParamLookup {
    fn param(&self, code: u8) -> Option<&Value>;

    fn require(&self, code: u8) -> Result<&Value, ProtocolError> {
        self.param(code).ok_or(ProtocolError::MissingParameter(code))
    }

    fn require_str(&self, code: u8) -> Result<&str, ProtocolError> {
        self.require(code)?
            .as_str()
            .ok_or(ProtocolError::WrongType { code, expected: "text" })
    }

    fn require_i32(&self, code: u8) -> Result<i32, ProtocolError> {
        self.require(code)?
            .as_i32()
            .ok_or(ProtocolError::WrongType { code, expected: "i32" })
    }

    fn require_array(&self, code: u8) -> Result<&[Value], ProtocolError> {
        self.require(code)?
            .as_array()
            .ok_or(ProtocolError::WrongType { code, expected: "array" })
    }

    fn require_str_list(&self, code: u8) -> Result<Vec<String>, ProtocolError> {
        self.require(code)?
            .to_str_list()
            .ok_or(ProtocolError::WrongType { code, expected: "text array" })
    }

    fn optional_i32(&self, code: u8) -> Result<Option<i32>, ProtocolError> {
        match self.param(code) {
            None => Ok(None),
            Some(v) => v
                .as_i32()
                .map(Some)
                .ok_or(ProtocolError::WrongType { code, expected: "i32" }),
        }
    }

    fn optional_dict(
        &self,
        code: u8,
    ) -> Result<Option<&HashMap<Key, Value>>, ProtocolError> {
        match self.param(code) {
            None => Ok(None),
            Some(v) => v
                .as_dict()
                .map(Some)
                .ok_or(ProtocolError::WrongType { code, expected: "dict" }),
        }
    }
}

impl ParamLookup for ParamMap {
    fn param(&self, code: u8) -> Option<&Value> {
        self.get(&code)
    }
}

impl ParamLookup for ParamSequence {
    fn param(&self, code: u8) -> Option<&Value> {
        self.get(code)
    }
}
