//! Inbound decoding for the chat protocol.
//!
//! Known event codes update the [`ChatCache`](crate::ChatCache) and then
//! fire the matching [`ChatListener`] hook. Unknown codes go to
//! [`ChatListener::on_event`] untouched. Malformed payloads are logged
//! and dropped.

use roster_protocol::codes::chat::{event, operation, parameter};
use roster_protocol::{
    ConnectionState, EventData, OperationResponse, ParamLookup, ProtocolError,
    UserStatus, Value,
};
use roster_session::{InboundHandler, Peer};

use crate::{ChannelResults, ChatClient, ChatListener, FriendStatus, Message};

impl<P: Peer, L: ChatListener> InboundHandler for ChatClient<P, L> {
    fn on_event(&mut self, data: EventData) {
        let result = match data.code {
            event::CHAT_MESSAGES => self.append_messages(&data),
            event::PRIVATE_MESSAGE => self.apply_private_message(&data),
            event::STATUS_UPDATE => self.apply_status_update(&data),
            event::SUBSCRIBE => self.apply_subscribe(&data),
            event::UNSUBSCRIBE => self.apply_unsubscribe(&data),
            event::USERS => self.apply_user_count(&data),
            event::FRIENDS_LIST => self.apply_friends_list(&data),
            code => {
                tracing::debug!(code, "forwarding unhandled chat event");
                self.listener.on_event(&data);
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::warn!(code = data.code, error = %e, "dropped malformed chat event");
        }
    }

    fn on_operation_response(&mut self, response: OperationResponse) {
        self.core.complete(response.code);

        if !response.is_ok() {
            tracing::warn!(
                operation = response.code,
                err_code = response.err_code,
                err_msg = %response.err_msg,
                "chat operation failed"
            );
        } else if response.code == operation::CHANNEL_HISTORY {
            if let Err(e) = self.append_messages(&response) {
                tracing::warn!(error = %e, "dropped malformed history response");
            }
        } else {
            tracing::debug!(operation = response.code, "forwarding unhandled response");
        }

        self.listener.on_operation_response(&response);
    }

    fn on_state_change(&mut self, state: ConnectionState) {
        if self.core.observe_state(state).is_none() {
            return;
        }
        self.listener.on_state_change(state);
    }
}

impl<P: Peer, L: ChatListener> ChatClient<P, L> {
    /// Zips `Senders` with `Messages` into the named public channel.
    /// Shared by live message events and history responses.
    fn append_messages(&mut self, payload: &impl ParamLookup) -> Result<(), ProtocolError> {
        let name = payload.require_str(parameter::CHANNEL)?;
        let senders = payload.require_str_list(parameter::SENDERS)?;
        let contents = payload.require_array(parameter::MESSAGES)?.to_vec();

        let Some(channel) = self.cache.public_channel_mut(name) else {
            tracing::info!(channel = name, "messages for unsubscribed channel dropped");
            return Ok(());
        };

        let added = channel.append_zipped(senders, contents);
        tracing::debug!(channel = name, count = added.len(), "messages appended");
        self.listener.on_chat_messages(name, added);
        Ok(())
    }

    /// The channel key is always the other party: the target when we sent
    /// it, the sender otherwise.
    fn apply_private_message(&mut self, data: &EventData) -> Result<(), ProtocolError> {
        let sender = data.require_str(parameter::SENDER)?;
        let content = data.require(parameter::MESSAGE)?.clone();
        let key = if sender == self.user_id {
            data.require_str(parameter::USER_ID)?
        } else {
            sender
        };

        let message = Message::new(sender, content);
        let channel = self.cache.ensure_private(key);
        channel.push(message.clone());

        self.listener.on_private_message(key, &message);
        Ok(())
    }

    fn apply_status_update(&mut self, data: &EventData) -> Result<(), ProtocolError> {
        let user_id = data.require_str(parameter::SENDER)?.to_string();
        let status = UserStatus::from(data.require_i32(parameter::STATUS)?);
        let message = data.param(parameter::MESSAGE).cloned();

        let status = FriendStatus {
            user_id,
            status,
            has_message: message.is_some(),
            message,
        };
        self.listener.on_status_update(&status);
        Ok(())
    }

    /// Pairs names with the parallel result flags. A missing or falsy
    /// flag counts as failure; only successes are cached.
    fn apply_subscribe(&mut self, data: &EventData) -> Result<(), ProtocolError> {
        let names = data.require_str_list(parameter::CHANNELS)?;
        let flags = data
            .param(parameter::SUBSCRIBE_RESULTS)
            .and_then(Value::as_array)
            .unwrap_or_default();

        let mut results = ChannelResults::with_capacity(names.len());
        for (i, name) in names.into_iter().enumerate() {
            let ok = flags.get(i).is_some_and(Value::is_truthy);
            if ok {
                self.cache.ensure_public(&name);
                tracing::info!(channel = %name, "subscribed");
            } else {
                tracing::warn!(channel = %name, "subscribe failed");
            }
            results.insert(name, ok);
        }

        self.listener.on_subscribed(&results);
        Ok(())
    }

    fn apply_unsubscribe(&mut self, data: &EventData) -> Result<(), ProtocolError> {
        let names = data.require_str_list(parameter::CHANNELS)?;

        let mut results = ChannelResults::with_capacity(names.len());
        for name in names {
            self.cache.remove_public(&name);
            tracing::info!(channel = %name, "unsubscribed");
            results.insert(name, true);
        }

        self.listener.on_unsubscribed(&results);
        Ok(())
    }

    fn apply_user_count(&mut self, data: &EventData) -> Result<(), ProtocolError> {
        let channel = data.require_str(parameter::CHANNEL)?;
        let count = data.require_i32(parameter::CHANNEL_USER_COUNT)?;
        self.listener.on_user_count(channel, count);
        Ok(())
    }

    fn apply_friends_list(&mut self, data: &EventData) -> Result<(), ProtocolError> {
        let friends = data.require_str_list(parameter::FRIENDS)?;
        self.listener.on_friends_list(&friends);
        Ok(())
    }
}
