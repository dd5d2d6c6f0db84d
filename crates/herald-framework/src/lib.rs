//! # Herald Framework
//!
//! The dispatch core of the Herald chat-bot runtime.
//!
//! This layer provides:
//! - [`Registry`] of named commands, ordered pattern handlers and a default
//! - [`Matcher`] deciding which single handler answers a message
//! - [`Dispatcher`] running that handler with a fresh [`DispatchContext`]
//!   and containing its faults
//! - A help generator over the registry ([`render_help`], [`help_command`])
//! - [`DispatchService`], a Tower view of the dispatcher
//!
//! ```rust,ignore
//! use herald_framework::{CommandDescriptor, DispatchContext, Dispatcher};
//!
//! async fn ping(ctx: DispatchContext) -> ChatResult<()> {
//!     ctx.reply("pong!").await
//! }
//!
//! let mut dispatcher = Dispatcher::new(chat);
//! dispatcher
//!     .registry_mut()
//!     .register_command(CommandDescriptor::new("ping", ping).description("Pong!"))?;
//! dispatcher.dispatch(message).await;
//! ```

pub mod address;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod fields;
pub mod handler;
pub mod help;
pub mod matcher;
pub mod registry;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use address::AddressPolicy;
pub use context::{DispatchContext, Route};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::{HandlerFault, HandlerResult, NoHandlerMatched, RegistryError, RegistryResult};
pub use fields::split_fields;
pub use handler::{BoxFuture, BoxedHandler, Handler, IntoHandlerResult, into_handler};
pub use help::{HELP_COMMAND_NAME, help_command, render_command_help, render_help};
pub use matcher::{DispatchPlan, Matcher};
pub use registry::{CommandDescriptor, PatternDescriptor, Registry};
pub use service::DispatchService;
