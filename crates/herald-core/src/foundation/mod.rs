//! Foundation layer - values exchanged between adapters and the runtime.
//!
//! - Normalized inbound messages
//! - Lifecycle and error events
//! - Error types shared by adapters and the outbound capability

pub mod error;
pub mod event;
pub mod message;

pub use error::{AdapterError, AdapterResult, ChatError, ChatResult};
pub use event::{ChannelEvent, ChatEvent, ErrorEvent, Membership, UserEvent};
pub use message::{Channel, Message, User};
