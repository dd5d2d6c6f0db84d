//! Chat adapter contract.
//!
//! An adapter bridges one chat network with the runtime. It is a single
//! capability set rather than a hierarchy: it can send ([`Chat`]) and, once
//! started, it feeds the three streams of an [`AdapterSink`].
//!
//! # Lifecycle
//!
//! 1. The runtime creates a sink/stream pair with
//!    [`create_adapter_channels`](super::channels::create_adapter_channels).
//! 2. [`ChatAdapter::run`] is spawned with the sink. The adapter emits
//!    `Connecting`/`Connected`, then one [`Message`](crate::Message) per
//!    inbound chat message, and [`ErrorEvent`](crate::ErrorEvent)s as they occur.
//! 3. When `run` returns, the sink is dropped, which closes every stream.
//!    Closing is the shutdown signal; there is no separate "closed" event.

use std::sync::Arc;

use async_trait::async_trait;

use super::channels::AdapterSink;
use super::chat::Chat;
use crate::foundation::error::AdapterResult;

/// The core adapter trait.
#[async_trait]
pub trait ChatAdapter: Chat {
    /// Returns the adapter name (e.g., "shell").
    ///
    /// Used in logs and to locate the adapter's section in the configuration:
    ///
    /// ```toml
    /// [adapters.shell]   # <- returned by ChatAdapter::name()
    /// prompt = "> "
    /// ```
    fn name(&self) -> &'static str;

    /// Connects to the backend and feeds `sink` until the backend goes away
    /// or [`stop`](Self::stop) is called.
    async fn run(&self, sink: AdapterSink) -> AdapterResult<()>;

    /// Asks a running adapter to disconnect.
    ///
    /// After a successful stop, [`run`](Self::run) returns and the streams
    /// close.
    async fn stop(&self) -> AdapterResult<()> {
        Ok(())
    }
}

/// A shared adapter trait object.
pub type BoxedAdapter = Arc<dyn ChatAdapter>;

/// Trait for adapters that can be created from configuration.
///
/// Kept separate from [`ChatAdapter`] so the latter stays object-safe.
pub trait ConfigurableAdapter: ChatAdapter + Sized {
    /// The configuration type for this adapter.
    type Config: serde::de::DeserializeOwned + Default;

    /// The configuration section this adapter reads (`adapters.<key>`).
    fn config_key() -> &'static str;

    /// Creates an adapter from its configuration.
    fn from_config(config: Self::Config) -> AdapterResult<Self>;
}
