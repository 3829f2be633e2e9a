//! The boundary with the underlying messaging peer.
//!
//! Roster does not connect, encrypt, or frame anything itself. It talks to
//! a collaborator that already does, through two traits:
//!
//! - [`Peer`] — the outbound primitive: "send this operation".
//! - [`InboundHandler`] — the inbound hooks the peer calls back into:
//!   events, operation responses, and connection-state notifications.
//!
//! Both sides run on the same task. Inbound callbacks run to completion
//! before the next one starts, and outbound sends never block.

use roster_protocol::{
    ConnectionState, EventData, Inbound, OperationResponse, ParamSequence,
};

use crate::SessionError;

/// The outbound half of the peer.
///
/// Implement this over whatever actually moves bytes: a socket wrapper, a
/// channel into a transport task, or a recorder in tests.
///
/// # Example
///
/// ```rust
/// use roster_protocol::ParamSequence;
/// use roster_session::{Peer, SessionError};
///
/// /// Remembers every request instead of sending it.
/// #[derive(Default)]
/// struct Recorder {
///     sent: Vec<(u8, ParamSequence)>,
/// }
///
/// impl Peer for Recorder {
///     fn send_operation(
///         &mut self,
///         code: u8,
///         params: ParamSequence,
///     ) -> Result<(), SessionError> {
///         self.sent.push((code, params));
///         Ok(())
///     }
/// }
/// ```
pub trait Peer {
    /// Queues an operation for sending. Fire-and-forget: the response, if
    /// any, arrives later through [`InboundHandler::on_operation_response`].
    ///
    /// # Errors
    /// Returns [`SessionError::PeerRejected`] if the request could not be
    /// queued.
    fn send_operation(
        &mut self,
        code: u8,
        params: ParamSequence,
    ) -> Result<(), SessionError>;
}

impl<P: Peer + ?Sized> Peer for Box<P> {
    fn send_operation(
        &mut self,
        code: u8,
        params: ParamSequence,
    ) -> Result<(), SessionError> {
        (**self).send_operation(code, params)
    }
}

/// The inbound half: what the peer calls when something arrives.
pub trait InboundHandler {
    fn on_event(&mut self, event: EventData);

    fn on_operation_response(&mut self, response: OperationResponse);

    fn on_state_change(&mut self, state: ConnectionState);

    /// Routes any [`Inbound`] record to the matching hook.
    fn dispatch(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Event(event) => self.on_event(event),
            Inbound::Response(response) => self.on_operation_response(response),
            Inbound::State(state) => self.on_state_change(state),
        }
    }
}
