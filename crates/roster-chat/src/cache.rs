//! The chat cache: subscribed public channels and open private channels.
//!
//! Public and private channels live in separate maps because their keys
//! mean different things. A public channel is keyed by its name and
//! exists exactly while we are subscribed to it. A private channel is
//! keyed by the *other* party's user id and is created on the first
//! message in either direction, so both sides of a conversation land in
//! the same channel.
//!
//! ```text
//! subscribe event (ok)  ──▶ ensure_public(name)
//! chat messages event   ──▶ public_channel_mut(name), dropped if absent
//! unsubscribe event     ──▶ remove_public(name)
//! private message event ──▶ ensure_private(counterpart)
//! ```
//!
//! Private channels are never removed by the protocol. They go away only
//! through [`ChatClient::clear_cache`](crate::ChatClient::clear_cache).

use std::collections::HashMap;

use crate::Channel;

/// Public channels by name and private channels by counterpart user id.
///
/// Mutated only by the dispatcher and by the client's explicit clearing
/// methods.
#[derive(Debug, Default)]
pub struct ChatCache {
    /// Subscribed channels by name.
    public: HashMap<String, Channel>,
    /// Conversations by counterpart user id.
    private: HashMap<String, Channel>,
}

impl ChatCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public_channel(&self, name: &str) -> Option<&Channel> {
        self.public.get(name)
    }

    pub fn private_channel(&self, user_id: &str) -> Option<&Channel> {
        self.private.get(user_id)
    }

    /// Subscribed channel names, sorted.
    pub fn public_channels(&self) -> Vec<&str> {
        sorted_keys(&self.public)
    }

    /// Counterpart ids of every private channel, sorted.
    pub fn private_channels(&self) -> Vec<&str> {
        sorted_keys(&self.private)
    }

    pub fn is_subscribed(&self, name: &str) -> bool {
        self.public.contains_key(name)
    }

    pub(crate) fn public_channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.public.get_mut(name)
    }

    /// Returns the public channel, creating it if needed.
    pub(crate) fn ensure_public(&mut self, name: &str) -> &mut Channel {
        self.public
            .entry(name.to_string())
            .or_insert_with(|| Channel::new(name, false))
    }

    /// Returns the private channel with `user_id`, creating it if needed.
    pub(crate) fn ensure_private(&mut self, user_id: &str) -> &mut Channel {
        self.private
            .entry(user_id.to_string())
            .or_insert_with(|| Channel::new(user_id, true))
    }

    pub(crate) fn remove_public(&mut self, name: &str) -> Option<Channel> {
        self.public.remove(name)
    }

    /// Empties the message list of a public or private channel. Returns
    /// `false` if neither exists.
    pub(crate) fn clear_messages(&mut self, name: &str) -> bool {
        match self
            .public
            .get_mut(name)
            .or_else(|| self.private.get_mut(name))
        {
            Some(channel) => {
                channel.clear_messages();
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.public.clear();
        self.private.clear();
    }
}

fn sorted_keys(map: &HashMap<String, Channel>) -> Vec<&str> {
    let mut names: Vec<&str> = map.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}
