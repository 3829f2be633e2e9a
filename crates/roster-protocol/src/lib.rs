//! Wire vocabulary for Roster.
//!
//! This crate defines what the client and the messaging peer exchange:
//!
//! - **Code tables** ([`codes`]) — integer codes for every operation,
//!   parameter, and event of the presence and chat protocols.
//! - **Values** ([`Value`], [`Key`], [`Properties`]) — the dynamically
//!   typed payload.
//! - **Parameters** ([`ParamSequence`], [`ParamMap`], [`ParamLookup`]) —
//!   the flat outbound sequence and the inbound lookup map.
//! - **Records** ([`OperationRequest`], [`EventData`],
//!   [`OperationResponse`], [`Inbound`], [`ConnectionState`]).
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — framing of those records.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Peer (bytes, external) → Protocol (records) → Session (admission)
//!                                             → Presence / Chat (caches)
//! ```

pub mod codes;

mod codec;
mod error;
mod params;
mod types;
mod value;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use codes::UserStatus;
pub use error::ProtocolError;
pub use params::{ParamLookup, ParamMap, ParamSequence};
pub use types::{
    ConnectionState, EventData, Inbound, OperationRequest, OperationResponse,
};
pub use value::{merge_properties, Key, Properties, Value};
