//! Per-dispatch execution context.
//!
//! A [`DispatchContext`] is created fresh for every dispatched message and
//! moved into the selected handler. It is never shared between invocations.
//!
//! ```rust,ignore
//! async fn fields(ctx: DispatchContext) -> ChatResult<()> {
//!     let listing = ctx.fields().join("\n");
//!     ctx.reply(&listing).await
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use herald_core::{BoxedChat, ChatResult, Message};

use crate::registry::Registry;

/// How the dispatcher reached a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A registered command, by its registered name.
    Command(String),
    /// A pattern handler, by its pattern source.
    Pattern(String),
    /// The default handler.
    Default,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(name) => write!(f, "command:{name}"),
            Self::Pattern(pattern) => write!(f, "pattern:{pattern}"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// The context object passed to handlers.
pub struct DispatchContext {
    message: Message,
    fields: Vec<String>,
    route: Route,
    chat: BoxedChat,
    registry: Arc<Registry>,
    bot_name: Option<Arc<str>>,
}

impl DispatchContext {
    pub(crate) fn new(
        message: Message,
        fields: Vec<String>,
        route: Route,
        chat: BoxedChat,
        registry: Arc<Registry>,
        bot_name: Option<Arc<str>>,
    ) -> Self {
        Self {
            message,
            fields,
            route,
            chat,
            registry,
            bot_name,
        }
    }

    /// Returns the message being handled.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Returns the positional fields.
    ///
    /// For commands these are the tokens after the command name. For
    /// pattern handlers they are the pattern's capture groups (a group that
    /// did not participate is an empty string). For the default handler
    /// they are every token of the message, the unrecognized name included.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns the field at `index`, if present.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Returns how this handler was selected.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Returns the outbound send capability.
    pub fn chat(&self) -> &BoxedChat {
        &self.chat
    }

    /// Returns a read-only view of the registry this message was routed by.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the name the bot answers to, if an address policy is set.
    pub fn bot_name(&self) -> Option<&str> {
        self.bot_name.as_deref()
    }

    /// Sends `text` to an arbitrary channel.
    pub async fn send(&self, channel_id: &str, text: &str) -> ChatResult<()> {
        self.chat.send(channel_id, text).await
    }

    /// Sends `text` back to the channel the message came from.
    pub async fn reply(&self, text: &str) -> ChatResult<()> {
        self.chat.send(&self.message.channel().id, text).await
    }
}

impl fmt::Debug for DispatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchContext")
            .field("message", &self.message)
            .field("fields", &self.fields)
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}
