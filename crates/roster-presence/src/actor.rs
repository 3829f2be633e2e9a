//! Actors and the joined room: the entities of the presence cache.

use std::fmt;

use roster_protocol::{merge_properties, Key, Properties, Value};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ActorId
// ---------------------------------------------------------------------------

/// Server-assigned actor number, stable for as long as the actor stays in
/// the room.
///
/// Serializes as the plain integer (`#[serde(transparent)]`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct ActorId(pub i32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A-{}", self.0)
    }
}

impl From<ActorId> for Value {
    fn from(id: ActorId) -> Self {
        Value::from(id.0)
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// A participant in the joined room.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    id: ActorId,
    properties: Properties,
}

impl Actor {
    pub fn new(id: ActorId, properties: Properties) -> Self {
        Self { id, properties }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Looks up one property.
    pub fn property(&self, key: &Key) -> Option<&Value> {
        self.properties.get(key)
    }

    pub(crate) fn merge(&mut self, changes: &Properties) {
        merge_properties(&mut self.properties, changes);
    }
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// The currently joined room. It has no identity of its own, only
/// properties; it is replaced wholesale on join and emptied on leave.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Room {
    properties: Properties,
}

impl Room {
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn property(&self, key: &Key) -> Option<&Value> {
        self.properties.get(key)
    }

    pub(crate) fn replace(&mut self, properties: Properties) {
        self.properties = properties;
    }

    pub(crate) fn merge(&mut self, changes: &Properties) {
        merge_properties(&mut self.properties, changes);
    }
}
