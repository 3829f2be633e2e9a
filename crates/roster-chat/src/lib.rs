//! Channel publish/subscribe chat for Roster.
//!
//! A [`ChatClient`] subscribes to public channels, exchanges private
//! messages, and tracks friends' statuses. Its [`ChatCache`] mirrors the
//! channels the server has confirmed, with their messages in arrival
//! order.
//!
//! # Key types
//!
//! - [`ChatClient`] — operation encoder and inbound dispatcher
//! - [`ChatListener`] — hooks the application implements
//! - [`ChatCache`], [`Channel`], [`Message`] — the cached entities
//! - [`FriendStatus`] — a status update, delivered but never cached
//! - [`ChatConfig`] — user id and history defaults

mod cache;
mod channel;
mod client;
mod config;
mod dispatch;
mod listener;

pub use cache::ChatCache;
pub use channel::{Channel, FriendStatus, Message};
pub use client::ChatClient;
pub use config::ChatConfig;
pub use listener::{ChannelResults, ChatListener};
