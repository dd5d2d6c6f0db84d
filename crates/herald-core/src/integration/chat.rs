//! The outbound send capability.

use std::sync::Arc;

use async_trait::async_trait;

use crate::foundation::error::ChatResult;
use crate::foundation::message::User;

/// Outbound access to a chat backend.
///
/// Handlers never talk to the network directly; they receive a `Chat`
/// through their dispatch context and send by channel identifier. How the
/// text reaches the backend is entirely up to the implementation.
///
/// # Example
///
/// ```rust,ignore
/// #[async_trait]
/// impl Chat for MyBackend {
///     async fn send(&self, channel_id: &str, text: &str) -> ChatResult<()> {
///         self.client.post_message(channel_id, text).await?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Chat: Send + Sync {
    /// Sends `text` to the channel identified by `channel_id`.
    async fn send(&self, channel_id: &str, text: &str) -> ChatResult<()>;

    /// Returns the users currently known to the backend.
    ///
    /// Backends without a roster return an empty list.
    fn users(&self) -> Vec<User> {
        Vec::new()
    }
}

/// A shared outbound capability.
pub type BoxedChat = Arc<dyn Chat>;
