//! Shell adapter for the Herald chat-bot runtime.
//!
//! Reads chat messages from stdin, one per line, and writes the bot's
//! messages to stdout. Useful for trying out handlers without a chat network.
//!
//! ```rust,ignore
//! use herald_adapter_shell::ShellAdapter;
//! use herald_runtime::{Robot, config::load_config};
//!
//! let config = load_config()?;
//! let robot = Robot::from_config::<ShellAdapter>(&config)?;
//! robot.run_until_ctrl_c().await?;
//! ```

pub mod adapter;
pub mod config;

pub use adapter::ShellAdapter;
pub use config::ShellConfig;
