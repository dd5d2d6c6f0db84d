//! Lifecycle and error events emitted by chat adapters.
//!
//! Adapters publish two independent streams next to their messages:
//!
//! - [`ChatEvent`] - connection lifecycle and roster changes
//! - [`ErrorEvent`] - failures, each classified by [`ErrorEvent::is_fatal`]
//!
//! Both are closed variant types. [`ChatEvent`] is `#[non_exhaustive]` and
//! carries an [`ChatEvent::Unrecognized`] variant so that consumers always
//! keep a default branch for event kinds added by future adapters.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::message::{Channel, User};

// ============================================================================
// Chat Events
// ============================================================================

/// How a user or channel changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    /// Became visible to the bot.
    Joined,
    /// Its details changed.
    Updated,
    /// No longer visible to the bot.
    Left,
}

/// A change to a user known to the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEvent {
    pub user: User,
    pub change: Membership,
}

/// A change to a channel known to the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEvent {
    pub channel: Channel,
    pub change: Membership,
}

/// A general event emitted by a chat adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ChatEvent {
    /// The adapter started (re)connecting to its backend.
    Connecting,
    /// The adapter finished connecting and is delivering messages.
    Connected,
    /// A user joined, left or changed.
    User(UserEvent),
    /// A channel was created, removed or changed.
    Channel(ChannelEvent),
    /// An adapter-specific event the runtime has no variant for.
    Unrecognized {
        /// Adapter-defined event kind.
        kind: String,
        /// Raw event payload.
        #[serde(default)]
        payload: Value,
    },
}

impl ChatEvent {
    /// Returns a short name for this event kind, used in logs.
    pub fn kind(&self) -> &str {
        match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::User(_) => "user",
            Self::Channel(_) => "channel",
            Self::Unrecognized { kind, .. } => kind,
        }
    }
}

// ============================================================================
// Error Events
// ============================================================================

/// An error reported by a chat adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorEvent {
    /// The backend rejected the bot's credentials.
    #[error("Invalid Auth")]
    InvalidAuth,

    /// The connection to the backend dropped.
    ///
    /// Unintentional disconnects are expected to be healed by the adapter,
    /// which re-emits `Connecting` / `Connected` once it has reconnected.
    #[error("{}", disconnect_reason(.intentional))]
    Disconnect {
        /// `true` when the disconnect was requested by the bot itself.
        intentional: bool,
    },

    /// Any other adapter failure.
    #[error("{message}")]
    Other {
        /// Human-readable description.
        message: String,
        /// Whether continued operation is unsafe.
        fatal: bool,
    },
}

fn disconnect_reason(intentional: &bool) -> &'static str {
    if *intentional {
        "Intentional Disconnect"
    } else {
        "Unexpected Disconnect"
    }
}

impl ErrorEvent {
    /// Creates an adapter-specific error event.
    pub fn other(message: impl Into<String>, fatal: bool) -> Self {
        Self::Other {
            message: message.into(),
            fatal,
        }
    }

    /// Returns `true` if the bot must halt after this error.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::InvalidAuth => true,
            Self::Disconnect { .. } => false,
            Self::Other { fatal, .. } => *fatal,
        }
    }

    /// Returns `true` if this error reports a lost connection.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::Disconnect { .. })
    }
}
