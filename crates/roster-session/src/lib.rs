//! Session core for Roster.
//!
//! This crate is the part both protocol clients share:
//!
//! 1. **Peer boundary** — the [`Peer`] (outbound) and [`InboundHandler`]
//!    (inbound) traits.
//! 2. **Connection state** — [`StateTracker`] observes the peer's phase and
//!    answers the single admission question.
//! 3. **Session core** — [`SessionCore`] gates every outbound operation and
//!    tracks which operation codes await a response.
//!
//! # How it fits in the stack
//!
//! ```text
//! Presence / Chat clients (above)  ← encode operations, decode events
//!     ↕
//! Session core (this crate)        ← admission, send, correlation
//!     ↕
//! Protocol (below)                 ← codes, values, parameter sequences
//! ```

mod error;
mod peer;
mod session;
mod state;

pub use error::SessionError;
pub use peer::{InboundHandler, Peer};
pub use session::{DuplicatePolicy, SessionConfig, SessionCore};
pub use state::StateTracker;
