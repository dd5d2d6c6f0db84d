//! # Herald Core
//!
//! The core types of the Herald chat-bot runtime.
//!
//! Everything that crosses the boundary between a chat backend and the
//! dispatch machinery lives here, so adapters can depend on this crate alone.
//!
//! ## Architecture Layers
//!
//! ### Foundation Layer
//!
//! Normalized values produced by adapters:
//! - **Messages**: [`Message`], [`User`], [`Channel`]
//! - **Lifecycle events**: [`ChatEvent`], [`UserEvent`], [`ChannelEvent`]
//! - **Error events**: [`ErrorEvent`], classified fatal or recoverable
//!
//! ### Integration Layer
//!
//! Contracts implemented by chat backends:
//! - **Outbound capability**: [`Chat`]
//! - **Adapter lifecycle**: [`ChatAdapter`], [`ConfigurableAdapter`]
//! - **Streams**: [`AdapterSink`] / [`AdapterStreams`]
//!
//! ```text
//! ┌─────────────┐  Message    ┌────────────┐     ┌───────────┐
//! │   Adapter   │────────────▶│ Dispatcher │────▶│  Handler  │
//! │   (shell)   │  ChatEvent  ├────────────┤     └───────────┘
//! │             │────────────▶│ Supervisor │
//! │             │  ErrorEvent │            │
//! └─────────────┘────────────▶└────────────┘
//! ```

pub mod foundation;
pub mod integration;

pub use foundation::{
    AdapterError, AdapterResult, Channel, ChannelEvent, ChatError, ChatEvent, ChatResult,
    ErrorEvent, Membership, Message, User, UserEvent,
};
pub use integration::{
    AdapterSink, AdapterStreams, BoxedAdapter, BoxedChat, Chat, ChatAdapter, ConfigurableAdapter,
    create_adapter_channels,
};
