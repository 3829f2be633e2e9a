//! Static code tables for both protocol variants.
//!
//! Every operation, parameter, and event on the wire is identified by a
//! small integer. These tables are pure data: the server matches on the
//! numbers, so they must never be renumbered.
//!
//! The tables are grouped per protocol variant and per code space:
//!
//! ```text
//! presence::{operation, parameter, event}
//! chat::{operation, parameter, event}
//! ```
//!
//! Codes from different spaces overlap freely (presence `operation::JOIN`
//! and presence `event::JOIN` are both 255); the space is always implied
//! by where the code appears.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Codes for the room/actor presence protocol.
pub mod presence {
    /// Client → server request codes.
    pub mod operation {
        pub const JOIN: u8 = 255;
        pub const LEAVE: u8 = 254;
        pub const RAISE_EVENT: u8 = 253;
        pub const SET_PROPERTIES: u8 = 252;
        pub const GET_PROPERTIES: u8 = 251;
        pub const CHANGE_GROUPS: u8 = 248;
    }

    /// Keys of the flat parameter sequence and of inbound `vals` maps.
    pub mod parameter {
        /// Room name.
        pub const GAME_ID: u8 = 255;
        pub const ACTOR_NR: u8 = 254;
        pub const TARGET_ACTOR_NR: u8 = 253;
        pub const ACTOR_LIST: u8 = 252;
        pub const PROPERTIES: u8 = 251;
        pub const BROADCAST: u8 = 250;
        pub const ACTOR_PROPERTIES: u8 = 249;
        /// Room properties.
        pub const GAME_PROPERTIES: u8 = 248;
        pub const RECEIVER_GROUP: u8 = 246;
        pub const DATA: u8 = 245;
        /// Custom event code carried by `RaiseEvent`.
        pub const CODE: u8 = 244;
        /// Interest group.
        pub const GROUP: u8 = 240;
        pub const REMOVE: u8 = 239;
        pub const ADD: u8 = 238;
        pub const EMPTY_ROOM_LIVE_TIME: u8 = 236;
    }

    /// Server → client event codes.
    pub mod event {
        pub const JOIN: u8 = 255;
        pub const LEAVE: u8 = 254;
        pub const PROPERTIES_CHANGED: u8 = 253;
    }
}

/// Codes for the channel publish/subscribe chat protocol.
pub mod chat {
    /// Client → server request codes.
    pub mod operation {
        pub const SUBSCRIBE: u8 = 0;
        pub const UNSUBSCRIBE: u8 = 1;
        pub const PUBLISH: u8 = 2;
        pub const SEND_PRIVATE: u8 = 3;
        pub const CHANNEL_HISTORY: u8 = 4;
        pub const UPDATE_STATUS: u8 = 5;
        pub const ADD_FRIENDS: u8 = 6;
        pub const REMOVE_FRIENDS: u8 = 7;
    }

    /// Keys of the flat parameter sequence and of inbound `vals` maps.
    pub mod parameter {
        pub const CHANNELS: u8 = 0;
        pub const CHANNEL: u8 = 1;
        pub const MESSAGES: u8 = 2;
        pub const MESSAGE: u8 = 3;
        pub const SENDERS: u8 = 4;
        pub const SENDER: u8 = 5;
        pub const CHANNEL_USER_COUNT: u8 = 6;
        pub const MSG_ID: u8 = 8;
        pub const MSG_IDS: u8 = 9;
        pub const STATUS: u8 = 10;
        pub const FRIENDS: u8 = 11;
        pub const SKIP_MESSAGE: u8 = 12;
        pub const HISTORY_LENGTH: u8 = 14;
        pub const SUBSCRIBE_RESULTS: u8 = 15;
        pub const USER_ID: u8 = 225;
    }

    /// Server → client event codes.
    pub mod event {
        pub const CHAT_MESSAGES: u8 = 0;
        pub const USERS: u8 = 1;
        pub const PRIVATE_MESSAGE: u8 = 2;
        pub const FRIENDS_LIST: u8 = 3;
        pub const STATUS_UPDATE: u8 = 4;
        pub const SUBSCRIBE: u8 = 5;
        pub const UNSUBSCRIBE: u8 = 6;
    }
}

// ---------------------------------------------------------------------------
// UserStatus
// ---------------------------------------------------------------------------

/// A user's online status as carried by the chat `Status` parameter.
///
/// The well-known values occupy 0–6. Applications may define their own
/// statuses above that range; they travel as [`UserStatus::Custom`] and
/// count as online.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum UserStatus {
    Offline,
    /// Connected but appearing offline to friends.
    Invisible,
    Online,
    Away,
    /// Do not disturb.
    Dnd,
    /// Looking for group.
    Lfg,
    Playing,
    Custom(i32),
}

impl UserStatus {
    /// Returns the numeric wire value.
    pub fn code(self) -> i32 {
        match self {
            Self::Offline => 0,
            Self::Invisible => 1,
            Self::Online => 2,
            Self::Away => 3,
            Self::Dnd => 4,
            Self::Lfg => 5,
            Self::Playing => 6,
            Self::Custom(code) => code,
        }
    }

    /// `Offline` and `Invisible` both appear offline; everything else
    /// (including custom values) is online.
    pub fn is_online(self) -> bool {
        self.code() >= 2
    }
}

impl From<i32> for UserStatus {
    fn from(code: i32) -> Self {
        match code {
            0 => Self::Offline,
            1 => Self::Invisible,
            2 => Self::Online,
            3 => Self::Away,
            4 => Self::Dnd,
            5 => Self::Lfg,
            6 => Self::Playing,
            other => Self::Custom(other),
        }
    }
}

impl From<UserStatus> for i32 {
    fn from(status: UserStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(code) => write!(f, "Custom({code})"),
            other => write!(f, "{other:?}"),
        }
    }
}
