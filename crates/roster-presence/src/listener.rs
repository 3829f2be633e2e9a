//! The `PresenceListener` trait: notification hooks for applications.
//!
//! Every method has a no-op default, so an application overrides only
//! what it cares about. Hooks run after the cache has been updated, so
//! reading [`PresenceClient::cache`](crate::PresenceClient::cache) from
//! inside the application's handling sees the new state.

use roster_protocol::{ConnectionState, EventData, OperationResponse, Properties};

use crate::ActorId;

/// What a property change applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyTarget {
    Room,
    Actor(ActorId),
}

/// Callbacks fired by the presence dispatcher.
pub trait PresenceListener {
    /// The connection moved to a new phase.
    fn on_state_change(&mut self, _state: ConnectionState) {}

    /// Our join succeeded and the server assigned us `self_id`.
    fn on_joined(&mut self, _self_id: ActorId) {}

    /// Our join was refused.
    fn on_join_failed(&mut self, _err_code: i32, _err_msg: &str) {}

    /// Our leave completed; the cache is now empty.
    fn on_left(&mut self) {}

    /// Actors were added to the cache.
    ///
    /// For another actor's join this is exactly that actor. For our own
    /// join event it is every roster member that was not cached yet.
    fn on_actors_joined(&mut self, _ids: &[ActorId]) {}

    /// An actor left and was removed from the cache.
    fn on_actor_left(&mut self, _id: ActorId) {}

    /// A property fetch response was merged into the cache.
    fn on_properties_fetched(&mut self) {}

    /// Properties changed on the server and were merged locally.
    fn on_properties_changed(
        &mut self,
        _target: PropertyTarget,
        _changes: &Properties,
    ) {
    }

    /// Any operation response, after the specific handling above.
    fn on_operation_response(&mut self, _response: &OperationResponse) {}

    /// Events without built-in handling: application-defined codes raised
    /// by other actors, forwarded verbatim. `sender` is the raising actor
    /// when the payload names one.
    fn on_event(&mut self, _event: &EventData, _sender: Option<ActorId>) {}
}

/// A listener that ignores everything.
impl PresenceListener for () {}
