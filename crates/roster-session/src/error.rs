//! Error types for the session layer.

use roster_protocol::ConnectionState;

/// Why an outbound operation was not sent, or why the session failed.
///
/// Every variant except [`SessionError::Fatal`] is recoverable: the
/// caller may retry once the cause is gone.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The connection is not in the one state that admits operations.
    #[error("operation {operation} not admitted in state {state}")]
    NotAdmitted {
        operation: u8,
        state: ConnectionState,
    },

    /// A required argument was missing or malformed.
    #[error("invalid argument for operation {operation}: {reason}")]
    InvalidArgument { operation: u8, reason: String },

    /// A request with the same code is still awaiting its response and
    /// the session is configured to refuse duplicates.
    #[error("operation {0} already in flight")]
    InFlight(u8),

    /// The peer refused to queue the request.
    #[error("peer rejected operation {operation}: {reason}")]
    PeerRejected { operation: u8, reason: String },

    /// Local state became inconsistent; the session moved to `Error`.
    #[error("fatal session inconsistency: {0}")]
    Fatal(String),
}
