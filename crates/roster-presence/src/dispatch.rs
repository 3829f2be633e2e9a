//! Inbound decoding for the presence protocol.
//!
//! Every inbound record is routed by its integer code. Known codes update
//! the [`PresenceCache`](crate::PresenceCache) first and then fire the
//! listener hook, so listeners always observe the post-update cache.
//! Unknown event codes are forwarded verbatim to
//! [`PresenceListener::on_event`].
//!
//! A malformed payload is logged and dropped; it never panics and never
//! reaches the caller. The one fatal case is a join response that assigns
//! a second, different self id: the session moves to `Error`.

use roster_protocol::codes::presence::{event, operation, parameter};
use roster_protocol::{
    ConnectionState, EventData, OperationResponse, ParamLookup, Properties,
    ProtocolError,
};
use roster_session::{InboundHandler, Peer};

use crate::{
    Actor, ActorId, PresenceClient, PresenceError, PresenceListener,
    PropertyTarget,
};

impl<P: Peer, L: PresenceListener> InboundHandler for PresenceClient<P, L> {
    fn on_event(&mut self, data: EventData) {
        let result = match data.code {
            event::JOIN => self.apply_join_event(&data),
            event::LEAVE => self.apply_leave_event(&data),
            event::PROPERTIES_CHANGED => self.apply_properties_changed(&data),
            code => {
                let sender = data
                    .optional_i32(parameter::ACTOR_NR)
                    .ok()
                    .flatten()
                    .map(ActorId);
                tracing::debug!(code, ?sender, "forwarding custom event");
                self.listener.on_event(&data, sender);
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::warn!(code = data.code, error = %e, "dropped malformed event");
        }
    }

    fn on_operation_response(&mut self, response: OperationResponse) {
        self.core.complete(response.code);

        if !response.is_ok() {
            tracing::warn!(
                operation = response.code,
                err_code = response.err_code,
                err_msg = %response.err_msg,
                "operation failed"
            );
            if response.code == operation::JOIN {
                self.pending_join = None;
                self.listener
                    .on_join_failed(response.err_code, &response.err_msg);
            }
            self.listener.on_operation_response(&response);
            return;
        }

        let result = match response.code {
            operation::JOIN => self.apply_join_response(&response),
            operation::LEAVE => {
                self.cache.clear();
                tracing::info!("left room");
                self.listener.on_left();
                Ok(())
            }
            operation::GET_PROPERTIES => self.apply_fetched_properties(&response),
            code => {
                tracing::debug!(operation = code, "forwarding unhandled response");
                Ok(())
            }
        };

        match result {
            Ok(()) => {}
            Err(PresenceError::SelfIdConflict { current, received }) => {
                self.core.fail(format!(
                    "join response assigned {received} but self is {current}"
                ));
                self.listener.on_state_change(ConnectionState::Error);
            }
            Err(e) => {
                tracing::warn!(
                    operation = response.code,
                    error = %e,
                    "dropped malformed response"
                );
            }
        }

        self.listener.on_operation_response(&response);
    }

    fn on_state_change(&mut self, state: ConnectionState) {
        if self.core.observe_state(state).is_none() {
            return;
        }
        if state.is_terminal() {
            self.pending_join = None;
        }
        self.listener.on_state_change(state);
    }
}

impl<P: Peer, L: PresenceListener> PresenceClient<P, L> {
    // -----------------------------------------------------------------------
    // Responses
    // -----------------------------------------------------------------------

    fn apply_join_response(
        &mut self,
        response: &OperationResponse,
    ) -> Result<(), PresenceError> {
        let self_id = ActorId(response.require_i32(parameter::ACTOR_NR)?);
        let room_properties = response
            .optional_dict(parameter::GAME_PROPERTIES)?
            .cloned()
            .unwrap_or_default();

        let pending = self.pending_join.take();
        let properties = pending
            .as_ref()
            .map(|j| j.properties.clone())
            .unwrap_or_default();

        self.cache.promote_self(self_id, properties)?;
        self.cache.replace_room_properties(room_properties);

        tracing::info!(
            %self_id,
            room = pending.as_ref().map(|j| j.room_name.as_str()).unwrap_or(""),
            "joined room"
        );
        self.listener.on_joined(self_id);
        Ok(())
    }

    /// Merges a property fetch. Actor properties arrive as a dict keyed
    /// by actor number; actors we don't know are skipped.
    ///
    /// The whole payload is checked before anything is applied, so a
    /// malformed entry leaves the cache untouched.
    fn apply_fetched_properties(
        &mut self,
        response: &OperationResponse,
    ) -> Result<(), PresenceError> {
        let mut actor_changes: Vec<(ActorId, &Properties)> = Vec::new();
        if let Some(by_actor) = response.optional_dict(parameter::ACTOR_PROPERTIES)? {
            for (key, value) in by_actor {
                let Some(id) = key.as_i64().and_then(|n| i32::try_from(n).ok()) else {
                    tracing::debug!(%key, "skipping non-numeric actor key");
                    continue;
                };
                let Some(changes) = value.as_dict() else {
                    return Err(ProtocolError::WrongType {
                        code: parameter::ACTOR_PROPERTIES,
                        expected: "dict of dicts",
                    }
                    .into());
                };
                actor_changes.push((ActorId(id), changes));
            }
        }
        let room_changes = response.optional_dict(parameter::GAME_PROPERTIES)?;

        for (id, changes) in actor_changes {
            if !self.cache.merge_actor_properties(id, changes) {
                tracing::debug!(actor = %id, "skipping properties of unknown actor");
            }
        }
        if let Some(room) = room_changes {
            self.cache.merge_room_properties(room);
        }

        self.listener.on_properties_fetched();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    fn apply_join_event(&mut self, data: &EventData) -> Result<(), PresenceError> {
        let actor_id = ActorId(data.require_i32(parameter::ACTOR_NR)?);

        if self.cache.self_id() == Some(actor_id) {
            // Our own join: the payload lists everyone already in the room.
            let roster = data
                .require(parameter::ACTOR_LIST)?
                .to_i32_list()
                .ok_or(ProtocolError::WrongType {
                    code: parameter::ACTOR_LIST,
                    expected: "i32 array",
                })?;

            let added: Vec<ActorId> = roster
                .into_iter()
                .map(ActorId)
                .filter(|id| *id != actor_id)
                .filter(|id| {
                    self.cache.insert_actor(Actor::new(*id, Properties::new()))
                })
                .collect();

            tracing::info!(added = added.len(), "received room roster");
            self.listener.on_actors_joined(&added);
            return Ok(());
        }

        let properties = data
            .optional_dict(parameter::ACTOR_PROPERTIES)?
            .cloned()
            .unwrap_or_default();
        self.cache.upsert_actor(actor_id, properties);

        tracing::info!(actor = %actor_id, "actor joined");
        self.listener.on_actors_joined(&[actor_id]);
        Ok(())
    }

    fn apply_leave_event(&mut self, data: &EventData) -> Result<(), PresenceError> {
        let actor_id = ActorId(data.require_i32(parameter::ACTOR_NR)?);

        if self.cache.remove_actor(actor_id).is_none() {
            tracing::debug!(actor = %actor_id, "leave for uncached actor");
        }

        tracing::info!(actor = %actor_id, "actor left");
        self.listener.on_actor_left(actor_id);
        Ok(())
    }

    fn apply_properties_changed(
        &mut self,
        data: &EventData,
    ) -> Result<(), PresenceError> {
        let changes = data
            .optional_dict(parameter::PROPERTIES)?
            .ok_or(ProtocolError::MissingParameter(parameter::PROPERTIES))?;

        let target = match data.optional_i32(parameter::TARGET_ACTOR_NR)? {
            Some(n) if n != 0 => PropertyTarget::Actor(ActorId(n)),
            _ => PropertyTarget::Room,
        };

        match target {
            PropertyTarget::Actor(id) => {
                if !self.cache.merge_actor_properties(id, changes) {
                    tracing::debug!(actor = %id, "property change for uncached actor");
                    return Ok(());
                }
            }
            PropertyTarget::Room => self.cache.merge_room_properties(changes),
        }

        self.listener.on_properties_changed(target, changes);
        Ok(())
    }
}
