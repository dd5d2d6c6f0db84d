//! Dispatch core.
//!
//! The [`Dispatcher`] turns one inbound [`Message`] into at most one handler
//! invocation:
//!
//! 1. Apply the [`AddressPolicy`], if any, to find the command body
//! 2. Ask the [`Matcher`] for a plan
//! 3. Build a fresh [`DispatchContext`] and run the planned handler
//!
//! A handler that panics or returns an error is contained here: the fault is
//! logged and reported in the [`DispatchOutcome`], and the dispatcher stays
//! usable for the next message.
//!
//! ```rust,ignore
//! let mut dispatcher = Dispatcher::new(chat);
//! dispatcher
//!     .registry_mut()
//!     .register_command(CommandDescriptor::new("ping", ping))?;
//!
//! while let Some(message) = messages.recv().await {
//!     dispatcher.dispatch(message).await;
//! }
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{Instrument, Level, debug, error, span, warn};

use herald_core::{BoxedChat, Message};

use crate::address::AddressPolicy;
use crate::context::{DispatchContext, Route};
use crate::error::HandlerFault;
use crate::matcher::Matcher;
use crate::registry::Registry;

/// What happened to a dispatched message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The selected handler ran to completion.
    Handled(Route),
    /// The selected handler panicked or returned an error.
    Faulted {
        /// The route that selected the handler.
        route: Route,
        /// The contained fault.
        fault: HandlerFault,
    },
    /// No handler claimed the message.
    NoHandlerMatched,
}

impl DispatchOutcome {
    /// Returns the route that was taken, if any handler was selected.
    pub fn route(&self) -> Option<&Route> {
        match self {
            Self::Handled(route) | Self::Faulted { route, .. } => Some(route),
            Self::NoHandlerMatched => None,
        }
    }

    /// Returns `true` if a handler was selected and completed.
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

/// The central message dispatcher.
///
/// Cloning is cheap: the registry is shared behind an `Arc`.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    chat: BoxedChat,
    address: Option<AddressPolicy>,
    bot_name: Option<Arc<str>>,
}

impl Dispatcher {
    /// Creates a dispatcher with an empty registry.
    pub fn new(chat: BoxedChat) -> Self {
        Self::with_registry(Registry::new(), chat)
    }

    /// Creates a dispatcher over a prepared registry.
    pub fn with_registry(registry: Registry, chat: BoxedChat) -> Self {
        Self {
            registry: Arc::new(registry),
            chat,
            address: None,
            bot_name: None,
        }
    }

    /// Requires messages to be addressed to the bot before they are treated
    /// as commands.
    pub fn with_address_policy(mut self, policy: AddressPolicy) -> Self {
        self.bot_name = Some(Arc::from(policy.name()));
        self.address = Some(policy);
        self
    }

    /// Sets the bot name handed to handlers without requiring addressing.
    pub fn with_bot_name(mut self, name: impl AsRef<str>) -> Self {
        self.bot_name = Some(Arc::from(name.as_ref()));
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns mutable access to the registry for startup registration.
    ///
    /// If the registry is currently shared (a clone of this dispatcher or a
    /// live context holds it), it is copied first so that readers keep
    /// seeing the registry they started with.
    pub fn registry_mut(&mut self) -> &mut Registry {
        Arc::make_mut(&mut self.registry)
    }

    pub fn address_policy(&self) -> Option<&AddressPolicy> {
        self.address.as_ref()
    }

    /// Returns the outbound capability handed to handlers.
    pub fn chat(&self) -> &BoxedChat {
        &self.chat
    }

    /// Dispatches one message.
    ///
    /// Never fails: routing misses and handler faults are both reported in
    /// the returned [`DispatchOutcome`].
    pub async fn dispatch(&self, message: Message) -> DispatchOutcome {
        let span = span!(
            Level::DEBUG,
            "dispatch",
            channel_id = %message.channel().id,
            user = %message.user().name,
        );
        self.dispatch_inner(message).instrument(span).await
    }

    async fn dispatch_inner(&self, message: Message) -> DispatchOutcome {
        let command_body = match &self.address {
            Some(policy) => policy.command_body(&message),
            None => Some(message.text()),
        };

        let plan = match Matcher::new(&self.registry).plan(message.text(), command_body) {
            Ok(plan) => plan,
            Err(_) => {
                debug!(addressed = command_body.is_some(), "No handler matched message");
                return DispatchOutcome::NoHandlerMatched;
            }
        };

        let route = plan.route;
        let handler = Arc::clone(plan.handler);
        let ctx = DispatchContext::new(
            message,
            plan.fields,
            route.clone(),
            Arc::clone(&self.chat),
            Arc::clone(&self.registry),
            self.bot_name.clone(),
        );

        debug!(route = %route, "Invoking handler");

        // The call itself happens inside the guarded future so that a panic
        // raised before the handler's first await is contained as well.
        let guarded = AssertUnwindSafe(async move { handler.call(ctx).await });
        let fault = match guarded.catch_unwind().await {
            Ok(Ok(())) => return DispatchOutcome::Handled(route),
            Ok(Err(fault)) => fault,
            Err(payload) => HandlerFault::from_panic(payload),
        };

        match &fault {
            HandlerFault::Panicked(_) => error!(route = %route, error = %fault, "Handler panicked"),
            HandlerFault::Failed(_) => warn!(route = %route, error = %fault, "Handler failed"),
        }

        DispatchOutcome::Faulted { route, fault }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("command_count", &self.registry.command_count())
            .field("pattern_count", &self.registry.patterns().len())
            .field("address", &self.address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CommandDescriptor;
    use crate::testing::{RecordingChat, group_message};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter_handler(
        counter: &Arc<AtomicUsize>,
    ) -> impl Fn(DispatchContext) -> futures::future::Ready<()> + Send + Sync + 'static {
        let counter = Arc::clone(counter);
        move |_ctx| {
            counter.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(())
        }
    }

    #[tokio::test]
    async fn test_dispatch_no_handlers() {
        let (chat, _) = RecordingChat::new();
        let dispatcher = Dispatcher::new(chat);
        let outcome = dispatcher.dispatch(group_message("hello")).await;
        assert_eq!(outcome, DispatchOutcome::NoHandlerMatched);
    }

    #[tokio::test]
    async fn test_command_receives_fields_and_replies() {
        let (chat, sent) = RecordingChat::new();
        let mut dispatcher = Dispatcher::new(chat);
        dispatcher
            .registry_mut()
            .register_command(CommandDescriptor::new("fields", |ctx: DispatchContext| async move {
                ctx.reply(&ctx.fields().join("|")).await
            }))
            .unwrap();

        let outcome = dispatcher
            .dispatch(group_message("fields `a b` c"))
            .await;

        assert_eq!(outcome, DispatchOutcome::Handled(Route::Command("fields".into())));
        assert_eq!(sent.lock().clone(), vec![("C1".to_string(), "a b|c".to_string())]);
    }

    #[tokio::test]
    async fn test_default_invoked_exactly_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (chat, _) = RecordingChat::new();
        let mut dispatcher = Dispatcher::new(chat);
        dispatcher
            .registry_mut()
            .set_default_handler(counter_handler(&counter));

        let outcome = dispatcher.dispatch(group_message("unknown thing")).await;
        assert_eq!(outcome, DispatchOutcome::Handled(Route::Default));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_only_one_handler_runs() {
        let command_hits = Arc::new(AtomicUsize::new(0));
        let other_hits = Arc::new(AtomicUsize::new(0));
        let (chat, _) = RecordingChat::new();
        let mut dispatcher = Dispatcher::new(chat);

        let registry = dispatcher.registry_mut();
        registry
            .register_command(CommandDescriptor::new("thanks", counter_handler(&command_hits)))
            .unwrap();
        registry
            .handle_pattern("thanks", counter_handler(&other_hits))
            .unwrap();
        registry.set_default_handler(counter_handler(&other_hits));

        dispatcher.dispatch(group_message("thanks")).await;
        assert_eq!(command_hits.load(Ordering::SeqCst), 1);
        assert_eq!(other_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_panicking_handler_is_contained() {
        let counter = Arc::new(AtomicUsize::new(0));
        let (chat, _) = RecordingChat::new();
        let mut dispatcher = Dispatcher::new(chat);

        let registry = dispatcher.registry_mut();
        registry
            .register_command(CommandDescriptor::new("boom", |_ctx: DispatchContext| async {
                panic!("kaboom");
                #[allow(unreachable_code)]
                ()
            }))
            .unwrap();
        registry
            .register_command(CommandDescriptor::new("ok", counter_handler(&counter)))
            .unwrap();

        let outcome = dispatcher.dispatch(group_message("boom")).await;
        assert_eq!(
            outcome,
            DispatchOutcome::Faulted {
                route: Route::Command("boom".into()),
                fault: HandlerFault::Panicked("kaboom".into()),
            }
        );

        let outcome = dispatcher.dispatch(group_message("ok")).await;
        assert!(outcome.is_handled());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_synchronous_panic_is_contained() {
        fn sync_panic(_ctx: DispatchContext) -> futures::future::Ready<()> {
            panic!("before the future");
        }

        let (chat, _) = RecordingChat::new();
        let mut dispatcher = Dispatcher::new(chat);
        dispatcher.registry_mut().set_default_handler(sync_panic);

        let outcome = dispatcher.dispatch(group_message("x")).await;
        assert!(matches!(
            outcome,
            DispatchOutcome::Faulted { fault: HandlerFault::Panicked(ref m), .. } if m == "before the future"
        ));
    }

    #[tokio::test]
    async fn test_handler_error_is_reported() {
        let (chat, _) = RecordingChat::new();
        let mut dispatcher = Dispatcher::new(chat);
        dispatcher
            .registry_mut()
            .register_command(CommandDescriptor::new("fail", |_ctx: DispatchContext| async {
                Err::<(), _>("no luck")
            }))
            .unwrap();

        let outcome = dispatcher.dispatch(group_message("fail")).await;
        assert_eq!(
            outcome,
            DispatchOutcome::Faulted {
                route: Route::Command("fail".into()),
                fault: HandlerFault::Failed("no luck".into()),
            }
        );
    }

    #[tokio::test]
    async fn test_address_policy_gates_commands_and_default() {
        let command_hits = Arc::new(AtomicUsize::new(0));
        let default_hits = Arc::new(AtomicUsize::new(0));
        let (chat, _) = RecordingChat::new();
        let mut dispatcher = Dispatcher::new(chat).with_address_policy(AddressPolicy::new("herald"));

        let registry = dispatcher.registry_mut();
        registry
            .register_command(CommandDescriptor::new("ping", counter_handler(&command_hits)))
            .unwrap();
        registry.set_default_handler(counter_handler(&default_hits));

        assert_eq!(
            dispatcher.dispatch(group_message("ping")).await,
            DispatchOutcome::NoHandlerMatched
        );
        assert!(dispatcher.dispatch(group_message("herald: ping")).await.is_handled());
        assert!(dispatcher.dispatch(group_message("herald what")).await.is_handled());

        assert_eq!(command_hits.load(Ordering::SeqCst), 1);
        assert_eq!(default_hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_context_exposes_bot_name() {
        let (chat, sent) = RecordingChat::new();
        let mut dispatcher = Dispatcher::new(chat).with_bot_name("herald");
        dispatcher
            .registry_mut()
            .register_command(CommandDescriptor::new("whoami", |ctx: DispatchContext| async move {
                let name = ctx.bot_name().unwrap_or("?").to_string();
                ctx.reply(&name).await
            }))
            .unwrap();

        dispatcher.dispatch(group_message("whoami")).await;
        assert_eq!(sent.lock()[0].1, "herald");
    }
}
