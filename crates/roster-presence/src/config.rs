//! Presence client configuration and per-operation options.

use roster_protocol::{Key, Properties};
use roster_session::SessionConfig;
use serde::{Deserialize, Serialize};

use crate::ActorId;

// ---------------------------------------------------------------------------
// PresenceConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`PresenceClient`](crate::PresenceClient).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// Admission and in-flight policy of the underlying session core.
    pub session: SessionConfig,

    /// Broadcast flag used by `join` when the caller doesn't specify one.
    /// Default: `false`.
    pub broadcast_by_default: bool,

    /// How long (ms) the server keeps an empty room alive after the last
    /// actor leaves. `None` omits the parameter and uses the server's
    /// default.
    pub empty_room_live_time_ms: Option<i32>,
}

// ---------------------------------------------------------------------------
// Operation options
// ---------------------------------------------------------------------------

/// Options for [`PresenceClient::join`](crate::PresenceClient::join).
#[derive(Debug, Clone, Default)]
pub struct JoinOptions {
    /// Our initial actor properties. `None` omits the parameter.
    pub actor_properties: Option<Properties>,
    /// Whether the server should broadcast our properties to the room.
    /// `None` falls back to [`PresenceConfig::broadcast_by_default`];
    /// the flag is always emitted.
    pub broadcast: Option<bool>,
}

/// Which actors receive a raised event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReceiverGroup {
    /// Everyone except the sender.
    #[default]
    Others,
    All,
    /// The room's master client only.
    MasterClient,
}

impl ReceiverGroup {
    pub fn code(self) -> u8 {
        match self {
            Self::Others => 0,
            Self::All => 1,
            Self::MasterClient => 2,
        }
    }
}

/// Options for [`PresenceClient::raise_event`](crate::PresenceClient::raise_event).
///
/// Every field is optional; `None` omits the parameter entirely.
#[derive(Debug, Clone, Default)]
pub struct RaiseEventOptions {
    pub receiver_group: Option<ReceiverGroup>,
    /// Interest group to deliver to.
    pub group: Option<u8>,
    /// Deliver only to these actors.
    pub target_actors: Option<Vec<ActorId>>,
}

/// Which property sets a fetch covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyScope {
    Room,
    Actors,
    #[default]
    All,
}

impl PropertyScope {
    /// Bit flags: 1 = room, 2 = actors.
    pub fn code(self) -> u8 {
        match self {
            Self::Room => 1,
            Self::Actors => 2,
            Self::All => 3,
        }
    }

    pub fn includes_actors(self) -> bool {
        matches!(self, Self::Actors | Self::All)
    }
}

/// A property fetch request for
/// [`PresenceClient::get_properties`](crate::PresenceClient::get_properties).
///
/// Filters left as `None` are omitted from the request (not sent as empty
/// lists), which means "everything".
#[derive(Debug, Clone, Default)]
pub struct PropertyQuery {
    pub scope: PropertyScope,
    /// Only these actors.
    pub actor_ids: Option<Vec<ActorId>>,
    /// Only these actor property keys.
    pub actor_keys: Option<Vec<Key>>,
    /// Only these room property keys.
    pub room_keys: Option<Vec<Key>>,
}

impl PropertyQuery {
    /// All room properties.
    pub fn room() -> Self {
        Self { scope: PropertyScope::Room, ..Self::default() }
    }

    /// All properties of the given actors.
    pub fn actors(ids: Vec<ActorId>) -> Self {
        Self {
            scope: PropertyScope::Actors,
            actor_ids: Some(ids),
            ..Self::default()
        }
    }
}
