//! The presence cache: local mirror of the joined room and its actors.
//!
//! Only the dispatcher mutates the cache (all mutators are
//! `pub(crate)`). Callers get read access through
//! [`PresenceClient::cache`](crate::PresenceClient::cache) and may wipe
//! it with [`PresenceClient::clear_cache`](crate::PresenceClient::clear_cache).
//!
//! Like the rest of this layer the cache is single-owner: a plain
//! `HashMap` with no locking.

use std::collections::HashMap;

use roster_protocol::Properties;

use crate::{Actor, ActorId, PresenceError, Room};

/// Actors keyed by id, the joined room, and which actor is "self".
///
/// The cache only ever reflects what the server has confirmed. Calling
/// [`PresenceClient::join`](crate::PresenceClient::join) changes nothing
/// here; the join response does.
///
/// ## How a room fills up
///
/// ```text
/// join response    ──▶ promote_self(id)        self actor + room props
/// join event (self) ──▶ insert_actor() per id   everyone already inside
/// join event (other) ─▶ upsert_actor()          newcomer
/// leave event       ──▶ remove_actor()
/// leave response    ──▶ clear()                 back to empty
/// ```
///
/// ## The self id
///
/// Once a join response assigns our actor id it cannot change until the
/// cache is cleared. A second join response with a different id is a
/// protocol violation, reported as [`PresenceError::SelfIdConflict`], and
/// the cache keeps the first id.
#[derive(Debug, Default)]
pub struct PresenceCache {
    /// Set by the join response; cleared on leave.
    self_id: Option<ActorId>,

    /// Every actor in the room, self included once joined.
    ///
    /// Keyed by id so that join, leave and property events, which name
    /// actors only by number, are O(1) lookups.
    actors: HashMap<ActorId, Actor>,

    room: Room,
    joined: bool,
}

impl PresenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last join succeeded and no leave has completed since.
    pub fn is_joined(&self) -> bool {
        self.joined
    }

    /// Our own actor id, once the join response has assigned it.
    pub fn self_id(&self) -> Option<ActorId> {
        self.self_id
    }

    /// Our own actor, once joined.
    pub fn self_actor(&self) -> Option<&Actor> {
        self.self_id.and_then(|id| self.actors.get(&id))
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    /// All cached actor ids in ascending order.
    pub fn actor_ids(&self) -> Vec<ActorId> {
        let mut ids: Vec<ActorId> = self.actors.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    // -- Dispatcher-only mutators ------------------------------------------

    /// Turns the local placeholder into an identified actor.
    ///
    /// # Errors
    /// Returns [`PresenceError::SelfIdConflict`] if a different self id is
    /// already set. The same id again is accepted and leaves the actor's
    /// properties alone.
    pub(crate) fn promote_self(
        &mut self,
        id: ActorId,
        properties: Properties,
    ) -> Result<(), PresenceError> {
        match self.self_id {
            Some(current) if current != id => {
                return Err(PresenceError::SelfIdConflict {
                    current,
                    received: id,
                });
            }
            Some(_) => {}
            None => {
                self.self_id = Some(id);
                self.actors.insert(id, Actor::new(id, properties));
            }
        }
        self.joined = true;
        Ok(())
    }

    /// Adds an actor. Returns `false` (and changes nothing) if one with
    /// the same id is already cached.
    pub(crate) fn insert_actor(&mut self, actor: Actor) -> bool {
        if self.actors.contains_key(&actor.id()) {
            return false;
        }
        self.actors.insert(actor.id(), actor);
        true
    }

    /// Adds an actor or merges `properties` into the existing one.
    pub(crate) fn upsert_actor(&mut self, id: ActorId, properties: Properties) {
        match self.actors.get_mut(&id) {
            Some(actor) => actor.merge(&properties),
            None => {
                self.actors.insert(id, Actor::new(id, properties));
            }
        }
    }

    pub(crate) fn remove_actor(&mut self, id: ActorId) -> Option<Actor> {
        self.actors.remove(&id)
    }

    /// Merges into a cached actor. Returns `false` if the actor is absent.
    pub(crate) fn merge_actor_properties(
        &mut self,
        id: ActorId,
        changes: &Properties,
    ) -> bool {
        match self.actors.get_mut(&id) {
            Some(actor) => {
                actor.merge(changes);
                true
            }
            None => false,
        }
    }

    pub(crate) fn replace_room_properties(&mut self, properties: Properties) {
        self.room.replace(properties);
    }

    pub(crate) fn merge_room_properties(&mut self, changes: &Properties) {
        self.room.merge(changes);
    }

    /// Drops self, every other actor, and the room state.
    pub(crate) fn clear(&mut self) {
        self.self_id = None;
        self.actors.clear();
        self.room = Room::default();
        self.joined = false;
    }
}
