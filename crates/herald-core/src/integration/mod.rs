//! Integration layer - contracts implemented by chat backends.
//!
//! - [`Chat`]: the outbound send capability handed to handlers
//! - [`ChatAdapter`]: lifecycle of a concrete chat backend
//! - [`AdapterSink`] / [`AdapterStreams`]: the three unbounded streams an
//!   adapter feeds (messages, chat events, error events)

pub mod adapter;
pub mod channels;
pub mod chat;

pub use adapter::{BoxedAdapter, ChatAdapter, ConfigurableAdapter};
pub use channels::{AdapterSink, AdapterStreams, create_adapter_channels};
pub use chat::{BoxedChat, Chat};
