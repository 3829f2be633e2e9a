//! # Roster
//!
//! Session-state synchronization over a messaging peer.
//!
//! Roster keeps a local mirror of server-authoritative state (actors in
//! a room, chat channels and their messages) consistent with what the
//! server reports, while gating every outbound operation on the
//! connection state. It ships two protocol clients over one shared
//! session core:
//!
//! - [`PresenceClient`](roster_presence::PresenceClient) — join a room,
//!   track actors and properties, raise custom events.
//! - [`ChatClient`](roster_chat::ChatClient) — subscribe to channels,
//!   publish, exchange private messages, follow friends' status.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roster::prelude::*;
//! use tokio::sync::mpsc;
//!
//! # async fn run() {
//! let (out_tx, _out_rx) = mpsc::unbounded_channel();
//! let (_in_tx, in_rx) = mpsc::unbounded_channel();
//!
//! let peer = ChannelPeer::new(out_tx, JsonCodec);
//! let mut chat = ChatClient::new(peer, (), ChatConfig::with_user_id("ada"));
//!
//! // Hand `_out_rx` / `_in_tx` to your transport task, then:
//! roster::drive(&mut chat, in_rx, &JsonCodec).await;
//! # }
//! ```

mod driver;
mod error;

pub use driver::{drive, ChannelPeer};
pub use error::RosterError;

pub use roster_chat as chat;
pub use roster_presence as presence;
pub use roster_protocol as protocol;
pub use roster_session as session;

/// Everything needed to wire up a client.
pub mod prelude {
    pub use crate::{drive, ChannelPeer, RosterError};

    pub use roster_chat::{
        Channel, ChannelResults, ChatCache, ChatClient, ChatConfig,
        ChatListener, FriendStatus, Message,
    };
    pub use roster_presence::{
        Actor, ActorId, JoinOptions, PresenceCache, PresenceClient,
        PresenceConfig, PresenceListener, PropertyQuery, PropertyScope,
        PropertyTarget, RaiseEventOptions, ReceiverGroup, Room,
    };
    pub use roster_protocol::{
        Codec, ConnectionState, EventData, JsonCodec, Key, OperationResponse,
        Properties, UserStatus, Value,
    };
    pub use roster_session::{
        DuplicatePolicy, InboundHandler, Peer, SessionConfig, SessionError,
    };
}
