//! The `ChatListener` trait.
//!
//! All hooks default to no-ops. Each fires after the cache update it
//! reports.

use std::collections::HashMap;

use roster_protocol::{ConnectionState, EventData, OperationResponse};

use crate::{FriendStatus, Message};

/// Per-channel outcome of a subscribe or unsubscribe.
pub type ChannelResults = HashMap<String, bool>;

pub trait ChatListener {
    fn on_state_change(&mut self, _state: ConnectionState) {}

    /// Messages were appended to a subscribed channel, either from a live
    /// chat-messages event or from a history response. `messages` is
    /// exactly the appended slice.
    fn on_chat_messages(&mut self, _channel: &str, _messages: &[Message]) {}

    /// A private message arrived (or our own was echoed back). `channel`
    /// is the other party's user id.
    fn on_private_message(&mut self, _channel: &str, _message: &Message) {}

    /// Subscribe confirmation. Only channels mapped to `true` were cached.
    fn on_subscribed(&mut self, _results: &ChannelResults) {}

    /// Unsubscribe confirmation. Always all `true`.
    fn on_unsubscribed(&mut self, _results: &ChannelResults) {}

    fn on_status_update(&mut self, _status: &FriendStatus) {}

    fn on_friends_list(&mut self, _friends: &[String]) {}

    fn on_user_count(&mut self, _channel: &str, _count: i32) {}

    /// Any operation response, after built-in handling.
    fn on_operation_response(&mut self, _response: &OperationResponse) {}

    /// Event codes without built-in handling, forwarded verbatim.
    fn on_event(&mut self, _event: &EventData) {}
}

impl ChatListener for () {}
