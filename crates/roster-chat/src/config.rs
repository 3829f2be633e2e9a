//! Chat client configuration.

use rand::Rng;
use roster_session::SessionConfig;
use serde::{Deserialize, Serialize};

/// Configuration for a [`ChatClient`](crate::ChatClient).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    pub session: SessionConfig,

    /// Our user id. Private-message routing compares senders against it.
    /// `None` picks a random guest id when the client is created.
    pub user_id: Option<String>,

    /// History length requested by `subscribe` when the caller doesn't
    /// give one. `None` omits the parameter (server default).
    pub default_history_length: Option<i32>,
}

impl ChatConfig {
    pub fn with_user_id(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    /// The configured user id, or a fresh guest id.
    pub(crate) fn resolve_user_id(&self) -> String {
        match &self.user_id {
            Some(id) => id.clone(),
            None => guest_id(),
        }
    }
}

/// `guest-` followed by 8 random hex characters.
fn guest_id() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 4] = rng.random();
    let suffix: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("guest-{suffix}")
}
