//! A Tokio channel adapter between a transport task and a client.
//!
//! Roster itself is synchronous. This module is the thin async edge that
//! lets a transport (WebSocket, TCP, in-process fake) run in its own task
//! and exchange encoded frames with a client:
//!
//! ```text
//! client ── ChannelPeer ──(Vec<u8> frames)──▶ transport task
//! client ◀── drive() ◀────(Vec<u8> frames)─── transport task
//! ```
//!
//! Outbound frames are encoded [`OperationRequest`]s, inbound frames are
//! encoded [`Inbound`] records, both in the same [`Codec`].

use roster_protocol::{Codec, ConnectionState, Inbound, OperationRequest, ParamSequence};
use roster_session::{InboundHandler, Peer, SessionError};
use tokio::sync::mpsc;

/// A [`Peer`] that encodes each operation and pushes it onto an
/// unbounded channel. Sending never blocks.
pub struct ChannelPeer<C: Codec> {
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    codec: C,
}

impl<C: Codec> ChannelPeer<C> {
    pub fn new(outbound: mpsc::UnboundedSender<Vec<u8>>, codec: C) -> Self {
        Self { outbound, codec }
    }

    /// Whether the transport side has gone away.
    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}

impl<C: Codec> Peer for ChannelPeer<C> {
    fn send_operation(
        &mut self,
        code: u8,
        params: ParamSequence,
    ) -> Result<(), SessionError> {
        let request = OperationRequest { code, params };
        let frame = self.codec.encode(&request).map_err(|e| {
            SessionError::PeerRejected {
                operation: code,
                reason: e.to_string(),
            }
        })?;

        self.outbound
            .send(frame)
            .map_err(|_| SessionError::PeerRejected {
                operation: code,
                reason: "outbound channel closed".into(),
            })
    }
}

/// Decodes inbound frames and dispatches them to `handler`, one at a
/// time, until the channel closes.
///
/// Undecodable frames are logged and skipped. When the sender side is
/// dropped the handler observes `Disconnected`. Returns the number of
/// frames dispatched.
pub async fn drive<H, C>(
    handler: &mut H,
    mut inbound: mpsc::UnboundedReceiver<Vec<u8>>,
    codec: &C,
) -> usize
where
    H: InboundHandler,
    C: Codec,
{
    let mut dispatched = 0;

    while let Some(frame) = inbound.recv().await {
        let record: Inbound = match codec.decode(&frame) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, len = frame.len(), "skipping undecodable frame");
                continue;
            }
        };
        handler.dispatch(record);
        dispatched += 1;
    }

    tracing::info!(dispatched, "inbound channel closed");
    handler.on_state_change(ConnectionState::Disconnected);
    dispatched
}
