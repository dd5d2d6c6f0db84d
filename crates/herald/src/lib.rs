//! # Herald
//!
//! A chat-bot runtime: register commands, regex patterns and a default
//! handler, then let a chat adapter feed messages through them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  messages  ┌────────────┐  plan   ┌──────────────────────┐
//! │   Adapter   │───────────▶│ Dispatcher │────────▶│ command > pattern >  │
//! │             │            └────────────┘         │ default handler      │
//! │             │  events                           └──────────────────────┘
//! │             │  errors    ┌────────────┐
//! │             │───────────▶│ Supervisor │──▶ observers / halt on fatal
//! └─────────────┘            └────────────┘
//! ```
//!
//! - **Adapters** ([`core`]): bridge a chat network; implement `ChatAdapter`
//! - **Registry, Matcher, Dispatcher, Help** ([`framework`]): routing
//! - **Robot, Supervisor, config, logging** ([`runtime`]): orchestration
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use herald::prelude::*;
//! use herald::shell::ShellAdapter;
//!
//! async fn hi(ctx: DispatchContext) -> ChatResult<()> {
//!     ctx.reply("bye!").await
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = herald::runtime::config::load_config()?;
//!     let mut robot = Robot::from_config::<ShellAdapter>(&config)?;
//!     robot.handle_command(CommandDescriptor::new("hi", hi).description("Says bye"))?;
//!     robot.run_until_ctrl_c().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output
//! - `shell-adapter`: the stdin/stdout adapter, as [`shell`]

pub use herald_core as core;
pub use herald_framework as framework;
pub use herald_runtime as runtime;

#[cfg(feature = "shell-adapter")]
pub use herald_adapter_shell as shell;

/// Commonly used types for building bots.
///
/// ```rust,ignore
/// use herald::prelude::*;
/// ```
pub mod prelude {
    // Runtime
    pub use herald_runtime::{
        BotConfig, EventObservers, HeraldConfig, Robot, RobotHandle, RunOutcome,
    };

    // Registration and handlers
    pub use herald_framework::{
        CommandDescriptor, DispatchContext, DispatchOutcome, HandlerFault, Route,
    };

    // Chat-facing values
    pub use herald_core::{
        Channel, ChannelEvent, Chat, ChatAdapter, ChatError, ChatEvent, ChatResult, ErrorEvent,
        Membership, Message, User, UserEvent,
    };

    pub use herald_runtime::prelude::*;
}
