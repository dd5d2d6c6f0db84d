//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while building or running a [`Robot`](crate::Robot).
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A handler could not be registered.
    #[error("Registry error: {0}")]
    Registry(#[from] herald_framework::RegistryError),

    /// The chat adapter failed to start or stopped with an error.
    #[error("Adapter error: {0}")]
    Adapter(#[from] herald_core::AdapterError),

    /// Adapter configuration deserialization failed.
    #[error("Failed to deserialize adapter config: {0}")]
    AdapterConfigDeserialize(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A runtime task ended abnormally.
    #[error("Task failed: {0}")]
    Task(String),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
