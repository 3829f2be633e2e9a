//! `ChatClient`: the pub/sub operation encoder.
//!
//! Same failure discipline as the presence client: every operation
//! returns `Result<(), SessionError>`, rejects bad arguments with
//! `InvalidArgument`, and is refused with `NotAdmitted` unless the
//! connection is `ConnectedToFrontEnd`. Nothing here mutates the cache
//! except the explicit clearing methods.
//!
//! | operation | emitted codes, in order |
//! |---|---|
//! | subscribe | `Channels`, `HistoryLength`? |
//! | unsubscribe | `Channels` |
//! | publish | `Channel`, `Message` |
//! | send_private | `UserId`, `Message` |
//! | channel_history | `Channel`, `HistoryLength` |
//! | update_status | `Status`, then `SkipMessage` or `Message`? |
//! | add_friends / remove_friends | `Friends` |

use roster_protocol::codes::chat::{operation, parameter};
use roster_protocol::{ConnectionState, ParamSequence, UserStatus, Value};
use roster_session::{Peer, SessionCore, SessionError};

use crate::{ChatCache, ChatConfig, ChatListener};

/// Client for the channel publish/subscribe chat protocol.
pub struct ChatClient<P: Peer, L: ChatListener> {
    pub(crate) core: SessionCore<P>,
    pub(crate) cache: ChatCache,
    pub(crate) listener: L,
    pub(crate) user_id: String,
    config: ChatConfig,
}

impl<P: Peer, L: ChatListener> ChatClient<P, L> {
    pub fn new(peer: P, listener: L, config: ChatConfig) -> Self {
        let user_id = config.resolve_user_id();
        tracing::debug!(%user_id, "chat client created");
        Self {
            core: SessionCore::new(peer, config.session.clone()),
            cache: ChatCache::new(),
            listener,
            user_id,
            config,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn state(&self) -> ConnectionState {
        self.core.state()
    }

    pub fn cache(&self) -> &ChatCache {
        &self.cache
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn core(&self) -> &SessionCore<P> {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut SessionCore<P> {
        &mut self.core
    }

    /// Forgets every public and private channel.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        tracing::debug!("chat cache cleared");
    }

    /// Empties one channel's message list, keeping the channel. Returns
    /// `false` if no public or private channel has that name.
    pub fn clear_messages(&mut self, channel: &str) -> bool {
        self.cache.clear_messages(channel)
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Subscribes to `channels`. `history_length` overrides
    /// [`ChatConfig::default_history_length`].
    ///
    /// Results arrive per channel through
    /// [`ChatListener::on_subscribed`]; some may fail while others
    /// succeed.
    pub fn subscribe(
        &mut self,
        channels: &[&str],
        history_length: Option<i32>,
    ) -> Result<(), SessionError> {
        self.check_names(operation::SUBSCRIBE, channels, "channel")?;

        let mut params = ParamSequence::new();
        params.push(parameter::CHANNELS, string_list(channels));
        params.push_opt(
            parameter::HISTORY_LENGTH,
            history_length.or(self.config.default_history_length),
        );

        self.core.send(operation::SUBSCRIBE, params)
    }

    pub fn unsubscribe(&mut self, channels: &[&str]) -> Result<(), SessionError> {
        self.check_names(operation::UNSUBSCRIBE, channels, "channel")?;

        let mut params = ParamSequence::new();
        params.push(parameter::CHANNELS, string_list(channels));

        self.core.send(operation::UNSUBSCRIBE, params)
    }

    /// Publishes `message` to a public channel. The message shows up in
    /// the cache when the server echoes it back as a chat-messages event.
    pub fn publish(
        &mut self,
        channel: &str,
        message: impl Into<Value>,
    ) -> Result<(), SessionError> {
        if channel.is_empty() {
            return Err(self.core.invalid(operation::PUBLISH, "channel name must not be empty"));
        }

        let mut params = ParamSequence::new();
        params.push(parameter::CHANNEL, channel);
        params.push(parameter::MESSAGE, message);

        self.core.send(operation::PUBLISH, params)
    }

    pub fn send_private(
        &mut self,
        user_id: &str,
        message: impl Into<Value>,
    ) -> Result<(), SessionError> {
        if user_id.is_empty() {
            return Err(self.core.invalid(operation::SEND_PRIVATE, "user id must not be empty"));
        }

        let mut params = ParamSequence::new();
        params.push(parameter::USER_ID, user_id);
        params.push(parameter::MESSAGE, message);

        self.core.send(operation::SEND_PRIVATE, params)
    }

    /// Requests the last `length` messages of `channel`. A negative length
    /// asks for everything the server keeps.
    pub fn channel_history(
        &mut self,
        channel: &str,
        length: i32,
    ) -> Result<(), SessionError> {
        if channel.is_empty() {
            return Err(self.core.invalid(
                operation::CHANNEL_HISTORY,
                "channel name must not be empty",
            ));
        }
        if length == 0 {
            return Err(self.core.invalid(
                operation::CHANNEL_HISTORY,
                "history length must not be zero",
            ));
        }

        let mut params = ParamSequence::new();
        params.push(parameter::CHANNEL, channel);
        params.push(parameter::HISTORY_LENGTH, length);

        self.core.send(operation::CHANNEL_HISTORY, params)
    }

    /// Sets our status, shown to users who have us as a friend.
    ///
    /// With `skip_message` the server keeps our previous status message
    /// and `message` must be `None`. Otherwise `message` replaces it,
    /// and `None` omits it.
    pub fn update_status(
        &mut self,
        status: UserStatus,
        message: Option<Value>,
        skip_message: bool,
    ) -> Result<(), SessionError> {
        if skip_message && message.is_some() {
            return Err(self.core.invalid(
                operation::UPDATE_STATUS,
                "message given while skipping the message",
            ));
        }

        let mut params = ParamSequence::new();
        params.push(parameter::STATUS, status.code());
        if skip_message {
            params.push(parameter::SKIP_MESSAGE, true);
        } else {
            params.push_opt(parameter::MESSAGE, message);
        }

        self.core.send(operation::UPDATE_STATUS, params)
    }

    pub fn add_friends(&mut self, user_ids: &[&str]) -> Result<(), SessionError> {
        self.friends_operation(operation::ADD_FRIENDS, user_ids)
    }

    pub fn remove_friends(&mut self, user_ids: &[&str]) -> Result<(), SessionError> {
        self.friends_operation(operation::REMOVE_FRIENDS, user_ids)
    }

    fn friends_operation(
        &mut self,
        op: u8,
        user_ids: &[&str],
    ) -> Result<(), SessionError> {
        self.check_names(op, user_ids, "user id")?;

        let mut params = ParamSequence::new();
        params.push(parameter::FRIENDS, string_list(user_ids));

        self.core.send(op, params)
    }

    /// Rejects an empty list or any empty name in it.
    fn check_names(
        &self,
        op: u8,
        names: &[&str],
        what: &str,
    ) -> Result<(), SessionError> {
        if names.is_empty() {
            return Err(self.core.invalid(op, format!("no {what}s given")));
        }
        if names.iter().any(|n| n.is_empty()) {
            return Err(self.core.invalid(op, format!("{what} must not be empty")));
        }
        Ok(())
    }
}

fn string_list(names: &[&str]) -> Value {
    names.iter().copied().collect()
}
