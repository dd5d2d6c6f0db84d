//! Error types shared by adapters and the outbound capability.

use thiserror::Error;

// =============================================================================
// Chat Errors
// =============================================================================

/// Errors returned by the outbound send capability.
#[derive(Debug, Clone, Error)]
pub enum ChatError {
    /// The adapter has no live connection to the chat network.
    #[error("chat backend is not connected")]
    NotConnected,

    /// The target channel does not exist or is not reachable.
    #[error("unknown channel '{0}'")]
    UnknownChannel(String),

    /// Delivery failed.
    #[error("failed to send message: {0}")]
    SendFailed(String),
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        Self::SendFailed(err.to_string())
    }
}

// =============================================================================
// Adapter Errors
// =============================================================================

/// Errors that can occur while starting or running an adapter.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    /// The adapter configuration is unusable.
    #[error("invalid adapter configuration: {0}")]
    InvalidConfig(String),

    /// Inbound data could not be normalized.
    #[error("failed to parse inbound data: {reason}")]
    ParseError {
        /// Reason for failure.
        reason: String,
    },

    /// The adapter was started twice.
    #[error("adapter '{0}' is already running")]
    AlreadyRunning(&'static str),

    /// Internal adapter error.
    #[error("adapter error: {0}")]
    Internal(String),
}

impl AdapterError {
    /// Creates an internal adapter error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Creates a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError { reason: msg.into() }
    }
}

impl From<std::io::Error> for AdapterError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for outbound chat operations.
pub type ChatResult<T> = Result<T, ChatError>;

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
