//! `PresenceClient`: the room/actor operation encoder.
//!
//! Each public method validates its arguments, builds the parameter
//! sequence in a fixed order, and hands it to the [`SessionCore`], which
//! checks admission and talks to the peer. None of them touch the cache;
//! that is the dispatcher's job (see `dispatch.rs`).
//!
//! # Failure discipline
//!
//! Every operation returns `Result<(), SessionError>`:
//!
//! - `Ok(())` means "accepted for sending". The outcome arrives later as a
//!   response through the listener.
//! - `Err(InvalidArgument)` means the arguments were rejected locally.
//! - `Err(NotAdmitted)` means the connection isn't `ConnectedToFrontEnd`.
//!
//! Nothing panics, and every `Err` is logged before it is returned.
//!
//! # Parameter order
//!
//! | operation | emitted codes, in order |
//! |---|---|
//! | join | `GameId`, `ActorProperties`?, `Broadcast`, `EmptyRoomLiveTime`? |
//! | leave | (none) |
//! | raise_event | `Code`, `Data`?, `ReceiverGroup`?, `Group`?, `ActorList`? |
//! | get_properties | `Properties`, `ActorList`?, `ActorProperties`?, `GameProperties`? |
//! | set_actor_properties | `ActorNr`, `Properties`, `Broadcast`? |
//! | set_room_properties | `Properties`, `Broadcast`? |
//! | change_groups | `Remove`?, `Add`? |
//!
//! `?` marks a code that is omitted entirely (never sent empty) when the
//! caller gives no value.

use roster_protocol::codes::presence::{operation, parameter};
use roster_protocol::{ConnectionState, Key, ParamSequence, Properties, Value};
use roster_session::{Peer, SessionCore, SessionError};

use crate::{
    ActorId, JoinOptions, PresenceCache, PresenceConfig, PresenceListener,
    PropertyQuery, RaiseEventOptions,
};

/// Event codes the server reserves for its own presence events.
const RESERVED_EVENT_CODES: std::ops::RangeInclusive<u8> = 253..=255;

/// A join request awaiting its response.
#[derive(Debug)]
pub(crate) struct PendingJoin {
    pub(crate) room_name: String,
    /// Our requested actor properties, applied to the self actor when the
    /// server assigns our id.
    pub(crate) properties: Properties,
}

/// Client for the room/actor presence protocol.
///
/// Owns the session core, the presence cache, and the application's
/// listener. Feed it inbound traffic through
/// [`InboundHandler`](roster_session::InboundHandler).
///
/// # Example
///
/// ```rust
/// use roster_protocol::ParamSequence;
/// use roster_presence::{JoinOptions, PresenceClient, PresenceConfig};
/// use roster_session::{Peer, SessionError};
///
/// #[derive(Default)]
/// struct Recorder(Vec<u8>);
///
/// impl Peer for Recorder {
///     fn send_operation(&mut self, code: u8, _: ParamSequence) -> Result<(), SessionError> {
///         self.0.push(code);
///         Ok(())
///     }
/// }
///
/// let mut client = PresenceClient::new(Recorder::default(), (), PresenceConfig::default());
///
/// // Not connected yet: refused, nothing sent.
/// assert!(client.join("lobby", JoinOptions::default()).is_err());
/// assert!(client.core().peer().0.is_empty());
/// ```
pub struct PresenceClient<P: Peer, L: PresenceListener> {
    pub(crate) core: SessionCore<P>,
    pub(crate) cache: PresenceCache,
    pub(crate) listener: L,
    pub(crate) config: PresenceConfig,
    pub(crate) pending_join: Option<PendingJoin>,
}

impl<P: Peer, L: PresenceListener> PresenceClient<P, L> {
    pub fn new(peer: P, listener: L, config: PresenceConfig) -> Self {
        Self {
            core: SessionCore::new(peer, config.session.clone()),
            cache: PresenceCache::new(),
            listener,
            config,
            pending_join: None,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn state(&self) -> ConnectionState {
        self.core.state()
    }

    /// Read access to the local mirror of the room.
    pub fn cache(&self) -> &PresenceCache {
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

    /// Name of the room whose join is awaiting a response.
    pub fn pending_room(&self) -> Option<&str> {
        self.pending_join.as_ref().map(|j| j.room_name.as_str())
    }

    /// Drops every cached actor and the room state.
    ///
    /// Disconnection leaves the cache as it was; call this before
    /// rejoining on a new connection.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.pending_join = None;
        tracing::debug!("presence cache cleared");
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Requests to join (or create) the room `room_name`.
    ///
    /// The broadcast flag is always sent, defaulting to
    /// [`PresenceConfig::broadcast_by_default`].
    pub fn join(
        &mut self,
        room_name: &str,
        options: JoinOptions,
    ) -> Result<(), SessionError> {
        if room_name.is_empty() {
            return Err(self.core.invalid(operation::JOIN, "room name must not be empty"));
        }
        if self.cache.is_joined() {
            return Err(self.core.invalid(operation::JOIN, "already joined a room"));
        }

        let broadcast = options.broadcast.unwrap_or(self.config.broadcast_by_default);
        let mut params = ParamSequence::new();
        params.push(parameter::GAME_ID, room_name);
        params.push_opt(
            parameter::ACTOR_PROPERTIES,
            options.actor_properties.clone().map(Value::from),
        );
        params.push(parameter::BROADCAST, broadcast);
        params.push_opt(
            parameter::EMPTY_ROOM_LIVE_TIME,
            self.config.empty_room_live_time_ms,
        );

        self.core.send(operation::JOIN, params)?;
        self.pending_join = Some(PendingJoin {
            room_name: room_name.to_string(),
            properties: options.actor_properties.unwrap_or_default(),
        });
        tracing::info!(room = room_name, broadcast, "join requested");
        Ok(())
    }

    /// Requests to leave the joined room.
    pub fn leave(&mut self) -> Result<(), SessionError> {
        self.require_joined(operation::LEAVE)?;
        self.core.send(operation::LEAVE, ParamSequence::new())?;
        tracing::info!("leave requested");
        Ok(())
    }

    /// Sends an application-defined event to other actors in the room.
    ///
    /// `code` must not collide with the server's own event codes
    /// (253–255).
    pub fn raise_event(
        &mut self,
        code: u8,
        data: Option<Value>,
        options: RaiseEventOptions,
    ) -> Result<(), SessionError> {
        if RESERVED_EVENT_CODES.contains(&code) {
            return Err(self.core.invalid(
                operation::RAISE_EVENT,
                format!("event code {code} is reserved"),
            ));
        }
        self.require_joined(operation::RAISE_EVENT)?;

        let mut params = ParamSequence::new();
        params.push(parameter::CODE, code);
        params.push_opt(parameter::DATA, data);
        params.push_opt(
            parameter::RECEIVER_GROUP,
            options.receiver_group.map(|g| g.code()),
        );
        params.push_opt(parameter::GROUP, options.group);
        params.push_opt(parameter::ACTOR_LIST, options.target_actors.map(id_list));

        self.core.send(operation::RAISE_EVENT, params)
    }

    /// Fetches room and/or actor properties. The response is merged into
    /// the cache.
    pub fn get_properties(
        &mut self,
        query: PropertyQuery,
    ) -> Result<(), SessionError> {
        self.require_joined(operation::GET_PROPERTIES)?;

        let mut params = ParamSequence::new();
        params.push(parameter::PROPERTIES, query.scope.code());
        params.push_opt(parameter::ACTOR_LIST, query.actor_ids.map(id_list));
        params.push_opt(parameter::ACTOR_PROPERTIES, query.actor_keys.map(key_list));
        params.push_opt(parameter::GAME_PROPERTIES, query.room_keys.map(key_list));

        self.core.send(operation::GET_PROPERTIES, params)
    }

    /// Sets properties on one actor. The cache is updated when the server
    /// echoes the change back as a properties-changed event.
    pub fn set_actor_properties(
        &mut self,
        actor: ActorId,
        properties: Properties,
        broadcast: Option<bool>,
    ) -> Result<(), SessionError> {
        if properties.is_empty() {
            return Err(self.core.invalid(
                operation::SET_PROPERTIES,
                "no properties to set",
            ));
        }
        self.require_joined(operation::SET_PROPERTIES)?;

        let mut params = ParamSequence::new();
        params.push(parameter::ACTOR_NR, actor);
        params.push(parameter::PROPERTIES, properties);
        params.push_opt(parameter::BROADCAST, broadcast);

        self.core.send(operation::SET_PROPERTIES, params)
    }

    /// Sets properties on the joined room.
    pub fn set_room_properties(
        &mut self,
        properties: Properties,
        broadcast: Option<bool>,
    ) -> Result<(), SessionError> {
        if properties.is_empty() {
            return Err(self.core.invalid(
                operation::SET_PROPERTIES,
                "no properties to set",
            ));
        }
        self.require_joined(operation::SET_PROPERTIES)?;

        let mut params = ParamSequence::new();
        params.push(parameter::PROPERTIES, properties);
        params.push_opt(parameter::BROADCAST, broadcast);

        self.core.send(operation::SET_PROPERTIES, params)
    }

    /// Changes interest-group membership.
    ///
    /// `Some(vec![])` means "all groups" and is sent as an empty list;
    /// `None` leaves that side out of the request. At least one side must
    /// be given.
    pub fn change_groups(
        &mut self,
        remove: Option<Vec<u8>>,
        add: Option<Vec<u8>>,
    ) -> Result<(), SessionError> {
        if remove.is_none() && add.is_none() {
            return Err(self.core.invalid(
                operation::CHANGE_GROUPS,
                "nothing to add or remove",
            ));
        }

        let mut params = ParamSequence::new();
        params.push_opt(parameter::REMOVE, remove.map(Value::from_iter));
        params.push_opt(parameter::ADD, add.map(Value::from_iter));

        self.core.send(operation::CHANGE_GROUPS, params)
    }

    fn require_joined(&self, op: u8) -> Result<(), SessionError> {
        if self.cache.is_joined() {
            Ok(())
        } else {
            Err(self.core.invalid(op, "not in a room"))
        }
    }
}

fn id_list(ids: Vec<ActorId>) -> Value {
    ids.into_iter().collect()
}

fn key_list(keys: Vec<Key>) -> Value {
    keys.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        sent: Vec<(u8, ParamSequence)>,
    }

    impl Peer for Recorder {
        fn send_operation(
            &mut self,
            code: u8,
            params: ParamSequence,
        ) -> Result<(), SessionError> {
            self.sent.push((code, params));
            Ok(())
        }
    }

    fn connected() -> PresenceClient<Recorder, ()> {
        let mut client =
            PresenceClient::new(Recorder::default(), (), PresenceConfig::default());
        client.core.observe_state(ConnectionState::ConnectedToFrontEnd);
        client
    }

    #[test]
    fn test_join_always_emits_broadcast_flag() {
        let mut client = connected();

        client.join("lobby", JoinOptions::default()).unwrap();

        let (code, params) = &client.core.peer().sent[0];
        assert_eq!(*code, operation::JOIN);
        assert_eq!(params.codes(), vec![parameter::GAME_ID, parameter::BROADCAST]);
        assert_eq!(params.get(parameter::BROADCAST), Some(&Value::Bool(false)));
        assert_eq!(client.pending_room(), Some("lobby"));
    }

    #[test]
    fn test_join_empty_name_returns_invalid_argument() {
        let mut client = connected();

        let result = client.join("", JoinOptions::default());

        assert!(matches!(result, Err(SessionError::InvalidArgument { .. })));
        assert!(client.core.peer().sent.is_empty());
        assert_eq!(client.pending_room(), None);
    }

    #[test]
    fn test_raise_event_reserved_code_returns_invalid_argument() {
        let mut client = connected();
        let result = client.raise_event(254, None, RaiseEventOptions::default());
        assert!(matches!(result, Err(SessionError::InvalidArgument { .. })));
    }

    #[test]
    fn test_change_groups_empty_list_is_emitted() {
        let mut client = connected();

        client.change_groups(Some(vec![]), None).unwrap();

        let (_, params) = &client.core.peer().sent[0];
        assert_eq!(params.codes(), vec![parameter::REMOVE]);
        assert_eq!(params.get(parameter::REMOVE), Some(&Value::Array(vec![])));
    }

    #[test]
    fn test_change_groups_nothing_returns_invalid_argument() {
        let mut client = connected();
        assert!(client.change_groups(None, None).is_err());
        assert!(client.core.peer().sent.is_empty());
    }
}
