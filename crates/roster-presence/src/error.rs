//! Error types for inbound presence decoding.

use roster_protocol::ProtocolError;

use crate::ActorId;

/// Errors raised while applying an inbound event or response.
///
/// These never reach the caller of an operation: the dispatcher logs
/// them, and a [`PresenceError::SelfIdConflict`] additionally moves the
/// session to `Error`.
#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    /// The payload is missing a parameter or has the wrong shape.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A join response tried to assign a second, different self id.
    #[error("self actor is {current}, server assigned {received}")]
    SelfIdConflict { current: ActorId, received: ActorId },
}
