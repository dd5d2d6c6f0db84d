//! Error types for the Herald framework.

use thiserror::Error;

/// Errors raised while registering handlers.
///
/// These are startup misconfigurations: the integrator has to fix them, the
/// runtime never recovers from them.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// A command with the same case-insensitive name is already registered.
    #[error("command '{name}' is already registered")]
    DuplicateCommand {
        /// The colliding name, as passed to the second registration.
        name: String,
    },

    /// The command name cannot be typed as a single leading token.
    #[error("invalid command name '{name}': {reason}")]
    InvalidCommandName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A pattern handler's regular expression failed to compile.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern source.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },
}

/// Result type for registration operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Returned by the matcher when neither a command, a pattern nor the default
/// handler claims a message.
///
/// This is a routing outcome, not a failure. Callers decide whether to drop
/// the message silently or log it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no handler matched the message")]
pub struct NoHandlerMatched;

/// A fault raised by a handler and contained by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerFault {
    /// The handler panicked.
    #[error("handler panicked: {0}")]
    Panicked(String),

    /// The handler returned an error.
    #[error("handler failed: {0}")]
    Failed(String),
}

impl HandlerFault {
    /// Builds a fault from a panic payload caught with `catch_unwind`.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked(message)
    }
}

/// Result type produced by every handler invocation.
pub type HandlerResult = Result<(), HandlerFault>;
