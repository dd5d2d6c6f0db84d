//! Tower service view of the dispatcher.
//!
//! [`DispatchService`] lets a [`Dispatcher`] sit inside a Tower stack, for
//! example behind a concurrency limit or a tracing layer supplied by the
//! embedding application:
//!
//! ```rust,ignore
//! use tower::{ServiceBuilder, ServiceExt};
//!
//! let service = ServiceBuilder::new()
//!     .concurrency_limit(1)
//!     .service(DispatchService::new(dispatcher));
//! let outcome = service.oneshot(message).await?;
//! ```

use std::convert::Infallible;
use std::task::{Context, Poll};

use tower::Service;

use herald_core::Message;

use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::handler::BoxFuture;

/// A `tower::Service<Message>` that dispatches each request.
#[derive(Debug, Clone)]
pub struct DispatchService {
    dispatcher: Dispatcher,
}

impl DispatchService {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl From<Dispatcher> for DispatchService {
    fn from(dispatcher: Dispatcher) -> Self {
        Self::new(dispatcher)
    }
}

impl Service<Message> for DispatchService {
    type Response = DispatchOutcome;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, message: Message) -> Self::Future {
        let dispatcher = self.dispatcher.clone();
        Box::pin(async move { Ok(dispatcher.dispatch(message).await) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{DispatchContext, Route};
    use crate::registry::CommandDescriptor;
    use crate::testing::{RecordingChat, group_message};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_service_dispatches() {
        let (chat, sent) = RecordingChat::new();
        let mut dispatcher = Dispatcher::new(chat);
        dispatcher
            .registry_mut()
            .register_command(CommandDescriptor::new("ping", |ctx: DispatchContext| async move {
                ctx.reply("pong!").await
            }))
            .unwrap();

        let outcome = DispatchService::new(dispatcher)
            .oneshot(group_message("ping"))
            .await
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Handled(Route::Command("ping".into())));
        assert_eq!(sent.lock()[0].1, "pong!");
    }
}
