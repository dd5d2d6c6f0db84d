//! Normalized inbound messages.
//!
//! Adapters translate whatever their chat network delivers into a
//! [`Message`]. The dispatch core only ever reads these values.

use serde::{Deserialize, Serialize};

/// The author of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// Backend-specific user identifier.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The channel a message was posted in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Channel {
    /// Backend-specific channel identifier, used as the outbound send key.
    pub id: String,
    /// Human-readable channel name, if the backend has one.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether this is a one-to-one conversation with the bot.
    #[serde(default)]
    pub direct: bool,
}

impl Channel {
    /// Creates a named group channel.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            direct: false,
        }
    }

    /// Creates a direct (one-to-one) channel.
    pub fn direct(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            direct: true,
        }
    }
}

/// A single inbound chat message.
///
/// Immutable once produced by the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    text: String,
    user: User,
    channel: Channel,
    /// Unix timestamp in milliseconds.
    timestamp: i64,
}

impl Message {
    pub fn new(text: impl Into<String>, user: User, channel: Channel, timestamp: i64) -> Self {
        Self {
            text: text.into(),
            user,
            channel,
            timestamp,
        }
    }

    /// Returns the raw message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the author.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Returns the channel the message was posted in.
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Returns the Unix timestamp in milliseconds.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns `true` if the message was sent in a direct conversation.
    pub fn is_direct(&self) -> bool {
        self.channel.direct
    }
}
