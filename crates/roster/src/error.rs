//! Unified error type for the Roster crates.

use roster_presence::PresenceError;
use roster_protocol::ProtocolError;
use roster_session::SessionError;

/// Top-level error that wraps every crate-specific error.
///
/// When using the `roster` meta-crate you can propagate any of them with
/// `?` into this one type.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// Encoding, decoding, or a malformed payload.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An operation was refused (state, arguments, or the peer).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The presence cache rejected an inbound update.
    #[error(transparent)]
    Presence(#[from] PresenceError),
}
