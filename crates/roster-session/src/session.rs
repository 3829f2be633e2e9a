//! The generic session core shared by both protocol clients.
//!
//! `SessionCore` owns the peer and the state tracker and is the only path
//! from a client to the network. Every outbound operation goes through
//! [`SessionCore::send`], which:
//!
//! 1. checks admission (state must be `ConnectedToFrontEnd`),
//! 2. applies the duplicate in-flight policy,
//! 3. hands the parameter sequence to the peer,
//! 4. records the code as awaiting a response.
//!
//! # Correlation limits
//!
//! Responses carry only an operation code. Two requests with the same code
//! in flight at once cannot be told apart when their responses come back,
//! so the core tracks pending codes, not individual requests. Issuing a
//! duplicate is a caller error: with [`DuplicatePolicy::Warn`] (default)
//! it is logged and sent anyway, with [`DuplicatePolicy::Reject`] it is
//! refused.

use std::collections::HashSet;

use roster_protocol::{ConnectionState, ParamSequence};
use serde::{Deserialize, Serialize};

use crate::{Peer, SessionError, StateTracker};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// What to do when an operation is issued while another request with the
/// same code is still awaiting its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Log a warning and send.
    #[default]
    Warn,
    /// Refuse with [`SessionError::InFlight`].
    Reject,
}

/// Configuration for the session core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Handling of same-code requests issued before the first response.
    pub duplicate_policy: DuplicatePolicy,
}

// ---------------------------------------------------------------------------
// SessionCore
// ---------------------------------------------------------------------------

/// Admission, sending and response correlation over a [`Peer`].
///
/// Each protocol client owns exactly one `SessionCore`. The client builds
/// a [`ParamSequence`] and calls [`send`](Self::send); the dispatcher
/// reports responses with [`complete`](Self::complete) and connection
/// changes with [`observe_state`](Self::observe_state). Nothing else
/// touches the peer.
///
/// ## Lifecycle
///
/// ```text
///                observe_state(ConnectedToFrontEnd)
/// [Uninitialized] ──────────────────────────────▶ [ConnectedToFrontEnd]
///        ▲                                           │   send() admitted
///        │                                           │   pending += code
///        │ reset()                                   │   complete(code)
///        │                                           ▼
///        └──────────── [Disconnected] / [Error] ◀────┘
///                      pending cleared, send() refused
/// ```
///
/// A terminal state is sticky. Only [`reset`](Self::reset) starts a new
/// epoch, and requests from the old epoch are never matched against
/// responses of the new one.
///
/// ## Ownership
///
/// The core owns its peer by value. [`peer`](Self::peer) and
/// [`peer_mut`](Self::peer_mut) hand it back with its concrete type, which
/// is how tests inspect what was sent. There are no locks: the owning
/// client is driven from one task at a time.
pub struct SessionCore<P: Peer> {
    /// The outbound half of the connection. Called only from `send`.
    peer: P,

    /// The connection state as last reported by the peer.
    state: StateTracker,

    /// Operation codes sent but not yet answered.
    ///
    /// A set, not a counter: responses carry no request id, so two
    /// in-flight requests with one code collapse into a single entry.
    pending: HashSet<u8>,

    config: SessionConfig,
}

impl<P: Peer> SessionCore<P> {
    pub fn new(peer: P, config: SessionConfig) -> Self {
        Self {
            peer,
            state: StateTracker::new(),
            pending: HashSet::new(),
            config,
        }
    }

    /// The current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state.current()
    }

    pub fn peer(&self) -> &P {
        &self.peer
    }

    pub fn peer_mut(&mut self) -> &mut P {
        &mut self.peer
    }

    /// Sends an operation if the session admits it.
    ///
    /// # Errors
    /// - [`SessionError::NotAdmitted`]: wrong connection state; the peer
    ///   is not called.
    /// - [`SessionError::InFlight`]: duplicate under
    ///   [`DuplicatePolicy::Reject`].
    /// - [`SessionError::PeerRejected`]: the peer refused the request.
    pub fn send(
        &mut self,
        operation: u8,
        params: ParamSequence,
    ) -> Result<(), SessionError> {
        if let Err(e) = self.state.admit(operation) {
            tracing::warn!(operation, state = %self.state.current(), "operation not admitted");
            return Err(e);
        }

        if self.pending.contains(&operation) {
            match self.config.duplicate_policy {
                DuplicatePolicy::Warn => {
                    tracing::warn!(
                        operation,
                        "request with this code already in flight; responses cannot be told apart"
                    );
                }
                DuplicatePolicy::Reject => {
                    tracing::warn!(operation, "duplicate in-flight request refused");
                    return Err(SessionError::InFlight(operation));
                }
            }
        }

        let param_count = params.len();
        if let Err(e) = self.peer.send_operation(operation, params) {
            tracing::warn!(operation, error = %e, "peer refused operation");
            return Err(e);
        }

        self.pending.insert(operation);
        tracing::debug!(operation, params = param_count, "operation sent");
        Ok(())
    }

    /// Logs and builds a validation error for `operation`.
    pub fn invalid(
        &self,
        operation: u8,
        reason: impl Into<String>,
    ) -> SessionError {
        let reason = reason.into();
        tracing::warn!(operation, %reason, "invalid operation arguments");
        SessionError::InvalidArgument { operation, reason }
    }

    /// Marks the response for `operation` as received.
    ///
    /// Returns `false` if no request with that code was pending (an
    /// unsolicited or duplicate response).
    pub fn complete(&mut self, operation: u8) -> bool {
        let was_pending = self.pending.remove(&operation);
        if !was_pending {
            tracing::debug!(operation, "response without a pending request");
        }
        was_pending
    }

    /// Whether a request with this code is awaiting its response.
    pub fn is_pending(&self, operation: u8) -> bool {
        self.pending.contains(&operation)
    }

    /// Records a peer state notification.
    ///
    /// Entering `Disconnected` or `Error` ends the epoch: pending requests
    /// are forgotten because their responses will never arrive.
    pub fn observe_state(
        &mut self,
        next: ConnectionState,
    ) -> Option<ConnectionState> {
        let previous = self.state.observe(next)?;
        if next.is_terminal() && !self.pending.is_empty() {
            tracing::debug!(
                dropped = self.pending.len(),
                "connection epoch ended with requests in flight"
            );
            self.pending.clear();
        }
        Some(previous)
    }

    /// Enters `Error` because of a local inconsistency and returns the
    /// matching error.
    pub fn fail(&mut self, reason: impl Into<String>) -> SessionError {
        let reason = reason.into();
        self.state.fail(&reason);
        self.pending.clear();
        SessionError::Fatal(reason)
    }

    /// Starts a new epoch at `Uninitialized`.
    pub fn reset(&mut self) {
        self.state.reset();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for `SessionCore` with a recording peer.

    use super::*;

    #[derive(Default)]
    struct Recorder {
        sent: Vec<(u8, ParamSequence)>,
        refuse: bool,
    }

    impl Peer for Recorder {
        fn send_operation(
            &mut self,
            code: u8,
            params: ParamSequence,
        ) -> Result<(), SessionError> {
            if self.refuse {
                return Err(SessionError::PeerRejected {
                    operation: code,
                    reason: "queue closed".into(),
                });
            }
            self.sent.push((code, params));
            Ok(())
        }
    }

    fn connected(config: SessionConfig) -> SessionCore<Recorder> {
        let mut core = SessionCore::new(Recorder::default(), config);
        core.observe_state(ConnectionState::ConnectedToFrontEnd);
        core
    }

    // =====================================================================
    // send()
    // =====================================================================

    #[test]
    fn test_send_not_connected_never_calls_peer() {
        let mut core =
            SessionCore::new(Recorder::default(), SessionConfig::default());
        core.observe_state(ConnectionState::ConnectedToNameServer);

        let result = core.send(2, ParamSequence::new());

        assert!(matches!(result, Err(SessionError::NotAdmitted { .. })));
        assert!(core.peer().sent.is_empty());
        assert!(!core.is_pending(2));
    }

    #[test]
    fn test_send_connected_forwards_params_unchanged() {
        let mut core = connected(SessionConfig::default());
        let mut params = ParamSequence::new();
        params.push(1, "general").push(3, "hello");

        core.send(2, params.clone()).expect("should send");

        assert_eq!(core.peer().sent, vec![(2, params)]);
        assert!(core.is_pending(2));
    }

    #[test]
    fn test_send_duplicate_with_warn_policy_still_sends() {
        let mut core = connected(SessionConfig::default());

        core.send(0, ParamSequence::new()).unwrap();
        core.send(0, ParamSequence::new()).unwrap();

        assert_eq!(core.peer().sent.len(), 2);
    }

    #[test]
    fn test_send_duplicate_with_reject_policy_returns_in_flight() {
        let mut core = connected(SessionConfig {
            duplicate_policy: DuplicatePolicy::Reject,
        });

        core.send(0, ParamSequence::new()).unwrap();
        let result = core.send(0, ParamSequence::new());

        assert!(matches!(result, Err(SessionError::InFlight(0))));
        assert_eq!(core.peer().sent.len(), 1);
    }

    #[test]
    fn test_send_peer_refusal_is_not_pending() {
        let mut core = connected(SessionConfig::default());
        core.peer_mut().refuse = true;

        let result = core.send(5, ParamSequence::new());

        assert!(matches!(result, Err(SessionError::PeerRejected { .. })));
        assert!(!core.is_pending(5));
    }

    // =====================================================================
    // complete() / observe_state() / fail()
    // =====================================================================

    #[test]
    fn test_complete_clears_pending() {
        let mut core = connected(SessionConfig::default());
        core.send(4, ParamSequence::new()).unwrap();

        assert!(core.complete(4));
        assert!(!core.is_pending(4));
        assert!(!core.complete(4), "second response is unsolicited");
    }

    #[test]
    fn test_observe_disconnected_forgets_pending() {
        let mut core = connected(SessionConfig::default());
        core.send(4, ParamSequence::new()).unwrap();

        core.observe_state(ConnectionState::Disconnected);

        assert!(!core.is_pending(4));
    }

    #[test]
    fn test_fail_enters_error_and_blocks_sends() {
        let mut core = connected(SessionConfig::default());

        let err = core.fail("cache out of sync");

        assert!(matches!(err, SessionError::Fatal(_)));
        assert_eq!(core.state(), ConnectionState::Error);
        assert!(core.send(2, ParamSequence::new()).is_err());
    }

    #[test]
    fn test_reset_allows_new_epoch() {
        let mut core = connected(SessionConfig::default());
        core.fail("boom");

        core.reset();
        core.observe_state(ConnectionState::ConnectedToFrontEnd);

        assert!(core.send(2, ParamSequence::new()).is_ok());
    }

    #[test]
    fn test_invalid_builds_invalid_argument() {
        let core = connected(SessionConfig::default());
        let err = core.invalid(255, "room name must not be empty");
        assert!(matches!(
            err,
            SessionError::InvalidArgument { operation: 255, .. }
        ));
    }
}
