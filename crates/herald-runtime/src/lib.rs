//! Herald Runtime - orchestration layer for the Herald chat-bot runtime.
//!
//! This crate provides:
//! - The [`Robot`] runtime wiring one adapter to a dispatcher and supervisor
//! - The event [`Supervisor`] and its [`EventObservers`]
//! - Configuration loading ([`config`])
//! - Logging initialization ([`logging`])
//!
//! ```rust,ignore
//! use herald_runtime::{Robot, config::load_config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let mut robot = Robot::from_config::<ShellAdapter>(&config)?;
//!     robot.handle_command(CommandDescriptor::new("hi", hi))?;
//!     robot.run_until_ctrl_c().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod robot;
pub mod supervisor;

pub use config::{BotConfig, ConfigError, ConfigLoader, ConfigResult, HeraldConfig, LoggingConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use robot::{Robot, RobotHandle, RunOutcome};
pub use supervisor::{ConnectionState, EventObservers, Supervisor, SupervisorTasks};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Commonly used logging macros.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
