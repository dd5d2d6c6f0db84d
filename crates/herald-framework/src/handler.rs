//! Handler system for the Herald framework.
//!
//! A handler is any async function or closure taking a
//! [`DispatchContext`] and returning either `()` or a `Result<(), E>` whose
//! error is displayable:
//!
//! ```rust,ignore
//! // Infallible handler
//! async fn ping(ctx: DispatchContext) {
//!     let _ = ctx.reply("pong!").await;
//! }
//!
//! // Fallible handler: an `Err` is logged by the dispatcher
//! async fn echo(ctx: DispatchContext) -> ChatResult<()> {
//!     ctx.reply(&ctx.fields().join(" ")).await
//! }
//! ```
//!
//! Handlers are stored type-erased as [`BoxedHandler`] so that commands,
//! patterns and the default handler can all live in one registry.

use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::DispatchContext;
use crate::error::{HandlerFault, HandlerResult};

/// A type alias for a boxed, pinned future that is `Send`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// ============================================================================
// Handler Output
// ============================================================================

/// Conversion of a handler's return value into a [`HandlerResult`].
pub trait IntoHandlerResult: Send + 'static {
    fn into_handler_result(self) -> HandlerResult;
}

impl IntoHandlerResult for () {
    fn into_handler_result(self) -> HandlerResult {
        Ok(())
    }
}

impl<E> IntoHandlerResult for Result<(), E>
where
    E: Display + Send + 'static,
{
    fn into_handler_result(self) -> HandlerResult {
        self.map_err(|e| HandlerFault::Failed(e.to_string()))
    }
}

// ============================================================================
// Handler Trait
// ============================================================================

/// The core trait for message handlers.
///
/// Implemented automatically for `Fn(DispatchContext) -> impl Future`.
pub trait Handler: Send + Sync + 'static {
    /// Invokes the handler with a fresh context.
    fn call(&self, ctx: DispatchContext) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(DispatchContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoHandlerResult,
{
    fn call(&self, ctx: DispatchContext) -> BoxFuture<'static, HandlerResult> {
        let fut = (self)(ctx);
        Box::pin(async move { fut.await.into_handler_result() })
    }
}

/// A type-erased handler that can be stored in collections.
pub type BoxedHandler = Arc<dyn Handler>;

/// Convert a handler function into a boxed handler.
pub fn into_handler<H: Handler>(handler: H) -> BoxedHandler {
    Arc::new(handler)
}
