//! Records exchanged with the underlying messaging peer.
//!
//! The peer owns connection establishment, encryption, and framing. This
//! module only defines what crosses the boundary in each direction:
//!
//! ```text
//! client ──OperationRequest{code, params}──→ peer
//! client ←─EventData{code, vals}──────────── peer
//! client ←─OperationResponse{code, errCode, errMsg, vals}── peer
//! client ←─ConnectionState────────────────── peer
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::params::{ParamLookup, ParamMap, ParamSequence};
use crate::Value;

// ---------------------------------------------------------------------------
// ConnectionState
// ---------------------------------------------------------------------------

/// The coarse phase of the peer's connection, as the peer reports it.
///
/// Phases in protocol order:
///
/// ```text
/// Uninitialized → ConnectingToNameServer → ConnectedToNameServer
///     → ConnectingToFrontEnd → ConnectedToFrontEnd → Disconnected
/// ```
///
/// plus `Error`, reachable from any phase. Only `ConnectedToFrontEnd`
/// admits outbound operations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub enum ConnectionState {
    #[default]
    Uninitialized,
    ConnectingToNameServer,
    ConnectedToNameServer,
    ConnectingToFrontEnd,
    ConnectedToFrontEnd,
    Disconnected,
    Error,
}

impl ConnectionState {
    /// Whether outbound operations may be sent in this state.
    pub fn is_admissible(self) -> bool {
        matches!(self, Self::ConnectedToFrontEnd)
    }

    /// Whether the connection epoch has ended (no more responses will
    /// arrive for requests already sent).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Disconnected | Self::Error)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "Uninitialized",
            Self::ConnectingToNameServer => "ConnectingToNameServer",
            Self::ConnectedToNameServer => "ConnectedToNameServer",
            Self::ConnectingToFrontEnd => "ConnectingToFrontEnd",
            Self::ConnectedToFrontEnd => "ConnectedToFrontEnd",
            Self::Disconnected => "Disconnected",
            Self::Error => "Error",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// An outbound request: operation code plus its flat parameter sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRequest {
    pub code: u8,
    pub params: ParamSequence,
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// An unsolicited server → client notification.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventData {
    pub code: u8,
    #[serde(default)]
    pub vals: ParamMap,
}

impl EventData {
    pub fn new(code: u8) -> Self {
        Self { code, vals: ParamMap::new() }
    }

    /// Builder-style insert, mostly for tests and fake servers.
    pub fn with(mut self, param: u8, value: impl Into<Value>) -> Self {
        self.vals.insert(param, value.into());
        self
    }
}

impl ParamLookup for EventData {
    fn param(&self, code: u8) -> Option<&Value> {
        self.vals.get(&code)
    }
}

/// A server → client reply, correlated to a request by operation code.
///
/// `err_code == 0` means success. Field names follow the peer's
/// `{ errCode, errMsg, vals }` shape on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    pub code: u8,
    #[serde(default)]
    pub err_code: i32,
    #[serde(default)]
    pub err_msg: String,
    #[serde(default)]
    pub vals: ParamMap,
}

impl OperationResponse {
    /// A successful response with no parameters.
    pub fn ok(code: u8) -> Self {
        Self { code, ..Self::default() }
    }

    /// A failed response.
    pub fn error(code: u8, err_code: i32, err_msg: impl Into<String>) -> Self {
        Self {
            code,
            err_code,
            err_msg: err_msg.into(),
            vals: ParamMap::new(),
        }
    }

    pub fn with(mut self, param: u8, value: impl Into<Value>) -> Self {
        self.vals.insert(param, value.into());
        self
    }

    pub fn is_ok(&self) -> bool {
        self.err_code == 0
    }
}

impl ParamLookup for OperationResponse {
    fn param(&self, code: u8) -> Option<&Value> {
        self.vals.get(&code)
    }
}

/// Anything the peer can deliver to the client.
///
/// `#[serde(tag = "type", content = "data")]` keeps the framed form
/// self-describing: `{ "type": "Event", "data": { "code": 5, ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Inbound {
    Event(EventData),
    Response(OperationResponse),
    State(ConnectionState),
}
