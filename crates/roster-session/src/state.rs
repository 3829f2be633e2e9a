//! Connection state tracking.
//!
//! The peer drives every transition; the tracker only records what it is
//! told. The one exception is [`StateTracker::fail`], which the layer uses
//! to enter `Error` when its own caches become inconsistent.
//!
//! ```text
//!   Uninitialized ─→ … ─→ ConnectedToFrontEnd ─→ Disconnected
//!         │                       │                    │
//!         └───────────────────────┴────────────────────┴──→ Error (absorbing)
//! ```
//!
//! `Error` absorbs: later notifications are ignored until [`reset`]
//! starts a new epoch.
//!
//! [`reset`]: StateTracker::reset

use roster_protocol::ConnectionState;

use crate::SessionError;

/// Records the current [`ConnectionState`] and answers admission checks.
#[derive(Debug, Clone, Default)]
pub struct StateTracker {
    state: ConnectionState,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last observed state.
    pub fn current(&self) -> ConnectionState {
        self.state
    }

    /// Records a transition reported by the peer.
    ///
    /// Returns the previous state if the state actually changed, `None`
    /// if the notification repeated the current state or was ignored
    /// because the tracker is in `Error`.
    pub fn observe(
        &mut self,
        next: ConnectionState,
    ) -> Option<ConnectionState> {
        if self.state == next {
            return None;
        }
        if self.state == ConnectionState::Error {
            tracing::warn!(
                ignored = %next,
                "state notification after Error ignored; reset required"
            );
            return None;
        }

        let previous = self.state;
        self.state = next;
        tracing::info!(from = %previous, to = %next, "connection state changed");
        Some(previous)
    }

    /// Enters `Error` because of a local inconsistency.
    pub fn fail(&mut self, reason: &str) {
        tracing::error!(from = %self.state, %reason, "session entered Error");
        self.state = ConnectionState::Error;
    }

    /// Starts a new connection epoch at `Uninitialized`.
    pub fn reset(&mut self) {
        tracing::debug!(from = %self.state, "state tracker reset");
        self.state = ConnectionState::Uninitialized;
    }

    /// Checks whether `operation` may be sent right now.
    ///
    /// # Errors
    /// Returns [`SessionError::NotAdmitted`] unless the state is
    /// `ConnectedToFrontEnd`.
    pub fn admit(&self, operation: u8) -> Result<(), SessionError> {
        if self.state.is_admissible() {
            Ok(())
        } else {
            Err(SessionError::NotAdmitted {
                operation,
                state: self.state,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ConnectionState::*;

    #[test]
    fn test_observe_full_connect_sequence_returns_previous() {
        let mut tracker = StateTracker::new();

        assert_eq!(tracker.observe(ConnectingToNameServer), Some(Uninitialized));
        assert_eq!(
            tracker.observe(ConnectedToNameServer),
            Some(ConnectingToNameServer)
        );
        assert_eq!(
            tracker.observe(ConnectingToFrontEnd),
            Some(ConnectedToNameServer)
        );
        assert_eq!(
            tracker.observe(ConnectedToFrontEnd),
            Some(ConnectingToFrontEnd)
        );
        assert_eq!(tracker.current(), ConnectedToFrontEnd);
    }

    #[test]
    fn test_observe_repeated_state_returns_none() {
        let mut tracker = StateTracker::new();
        tracker.observe(ConnectedToFrontEnd);
        assert_eq!(tracker.observe(ConnectedToFrontEnd), None);
    }

    #[test]
    fn test_observe_after_error_is_ignored() {
        let mut tracker = StateTracker::new();
        tracker.observe(Error);

        assert_eq!(tracker.observe(ConnectedToFrontEnd), None);
        assert_eq!(tracker.current(), Error);
    }

    #[test]
    fn test_fail_enters_error_from_any_state() {
        let mut tracker = StateTracker::new();
        tracker.observe(ConnectedToFrontEnd);

        tracker.fail("self id changed");

        assert_eq!(tracker.current(), Error);
    }

    #[test]
    fn test_reset_leaves_error() {
        let mut tracker = StateTracker::new();
        tracker.fail("boom");

        tracker.reset();

        assert_eq!(tracker.current(), Uninitialized);
        assert_eq!(tracker.observe(ConnectingToNameServer), Some(Uninitialized));
    }

    #[test]
    fn test_admit_only_in_connected_to_front_end() {
        let mut tracker = StateTracker::new();
        assert!(matches!(
            tracker.admit(2),
            Err(SessionError::NotAdmitted { operation: 2, state: Uninitialized })
        ));

        tracker.observe(ConnectedToFrontEnd);
        assert!(tracker.admit(2).is_ok());

        tracker.observe(Disconnected);
        assert!(tracker.admit(2).is_err());
    }
}
