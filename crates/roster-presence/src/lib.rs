//! Room and actor presence for Roster.
//!
//! A [`PresenceClient`] joins one room at a time and keeps a local mirror
//! of it: who is in the room, their properties, and the room's own
//! properties. The server is authoritative; the mirror only changes when
//! a response or event says so.
//!
//! # Key types
//!
//! - [`PresenceClient`] — operation encoder and inbound dispatcher
//! - [`PresenceListener`] — hooks the application implements
//! - [`PresenceCache`] — read-only view of the mirrored room
//! - [`Actor`] / [`ActorId`] / [`Room`] — the cached entities
//! - [`PresenceConfig`] — broadcast default, empty-room live time

mod actor;
mod cache;
mod client;
mod config;
mod dispatch;
mod error;
mod listener;

pub use actor::{Actor, ActorId, Room};
pub use cache::PresenceCache;
pub use client::PresenceClient;
pub use config::{
    JoinOptions, PresenceConfig, PropertyQuery, PropertyScope,
    RaiseEventOptions, ReceiverGroup,
};
pub use error::PresenceError;
pub use listener::{PresenceListener, PropertyTarget};
