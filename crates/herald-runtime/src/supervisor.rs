//! Event supervisor.
//!
//! The [`Supervisor`] watches the two lifecycle streams of a chat adapter. It
//! does not own the connection; it only reacts to what the adapter reports:
//!
//! - **Chat events** drive the [`ConnectionState`] machine and are fanned
//!   out by variant to the observers registered in [`EventObservers`].
//! - **Error events** are classified with [`ErrorEvent::is_fatal`]. A fatal
//!   error halts the bot; anything else is logged and the adapter is trusted
//!   to reconnect on its own.
//!
//! ```text
//!  Idle ──Connecting──▶ Connecting ──Connected──▶ Connected
//!                          ▲                          │
//!                          │                  Disconnect error
//!                          │                          ▼
//!                          └───Connecting──── Disconnected(reason)
//! ```
//!
//! Each stream is consumed by its own task. Closing a stream ends its task
//! without error; there is no other cancellation.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use herald_core::{ChannelEvent, ChatEvent, ErrorEvent, UserEvent};

// =============================================================================
// Connection State
// =============================================================================

/// The adapter's connection lifecycle as observed by the supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Nothing has been reported yet.
    #[default]
    Idle,
    /// The adapter is connecting.
    Connecting,
    /// The adapter is connected.
    Connected,
    /// The connection dropped for the given reason.
    Disconnected(String),
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::Disconnected(reason) => write!(f, "Disconnected({reason})"),
        }
    }
}

// =============================================================================
// Observers
// =============================================================================

type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Per-variant callbacks registered by the embedding application.
///
/// Several observers may be registered for one variant; they run in
/// registration order. A panicking observer is logged and skipped.
///
/// ```rust,ignore
/// let mut observers = EventObservers::new();
/// observers
///     .on_connected(|| info!("connected"))
///     .on_user(|event| info!(user = %event.user.name, "user event"))
///     .on_error(|err| warn!(%err, "adapter error"));
/// ```
#[derive(Default, Clone)]
pub struct EventObservers {
    connecting: Vec<Observer<()>>,
    connected: Vec<Observer<()>>,
    user: Vec<Observer<UserEvent>>,
    channel: Vec<Observer<ChannelEvent>>,
    unrecognized: Vec<Observer<ChatEvent>>,
    error: Vec<Observer<ErrorEvent>>,
}

impl EventObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_connecting<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.connecting.push(Arc::new(move |_: &()| f()));
        self
    }

    pub fn on_connected<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.connected.push(Arc::new(move |_: &()| f()));
        self
    }

    pub fn on_user<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&UserEvent) + Send + Sync + 'static,
    {
        self.user.push(Arc::new(f));
        self
    }

    pub fn on_channel<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&ChannelEvent) + Send + Sync + 'static,
    {
        self.channel.push(Arc::new(f));
        self
    }

    /// Observes every event without a dedicated variant hook.
    pub fn on_unrecognized<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&ChatEvent) + Send + Sync + 'static,
    {
        self.unrecognized.push(Arc::new(f));
        self
    }

    /// Observes every error event, fatal or not, before it is acted on.
    pub fn on_error<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&ErrorEvent) + Send + Sync + 'static,
    {
        self.error.push(Arc::new(f));
        self
    }

    fn notify<T>(observers: &[Observer<T>], value: &T, kind: &str) {
        for observer in observers {
            if catch_unwind(AssertUnwindSafe(|| observer(value))).is_err() {
                error!(kind, "Event observer panicked");
            }
        }
    }
}

impl std::fmt::Debug for EventObservers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventObservers")
            .field("connecting", &self.connecting.len())
            .field("connected", &self.connected.len())
            .field("user", &self.user.len())
            .field("channel", &self.channel.len())
            .field("unrecognized", &self.unrecognized.len())
            .field("error", &self.error.len())
            .finish()
    }
}

// =============================================================================
// Supervisor
// =============================================================================

/// Join handles of the two consumption tasks.
#[derive(Debug)]
pub struct SupervisorTasks {
    pub events: JoinHandle<()>,
    pub errors: JoinHandle<()>,
}

impl SupervisorTasks {
    /// Waits for both streams to close.
    pub async fn join(self) {
        if let Err(e) = self.events.await {
            error!(error = %e, "Chat event task ended abnormally");
        }
        if let Err(e) = self.errors.await {
            error!(error = %e, "Error event task ended abnormally");
        }
    }
}

/// Classifies adapter events and decides when the bot must halt.
///
/// Cloning is cheap and every clone observes the same state.
#[derive(Clone)]
pub struct Supervisor {
    observers: Arc<EventObservers>,
    state: Arc<watch::Sender<ConnectionState>>,
    halt: CancellationToken,
    halt_reason: Arc<Mutex<Option<ErrorEvent>>>,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new(EventObservers::default())
    }
}

impl Supervisor {
    pub fn new(observers: EventObservers) -> Self {
        let (state, _) = watch::channel(ConnectionState::Idle);
        Self {
            observers: Arc::new(observers),
            state: Arc::new(state),
            halt: CancellationToken::new(),
            halt_reason: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    /// Subscribes to connection state changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Returns `true` once a fatal error has been observed.
    pub fn is_halted(&self) -> bool {
        self.halt.is_cancelled()
    }

    /// Returns the fatal error that halted the bot, if any.
    pub fn halt_reason(&self) -> Option<ErrorEvent> {
        self.halt_reason.lock().clone()
    }

    /// Returns a token cancelled when the bot is halted.
    pub fn halt_token(&self) -> CancellationToken {
        self.halt.clone()
    }

    /// Spawns one consumption task per stream.
    pub fn spawn(
        &self,
        events: mpsc::UnboundedReceiver<ChatEvent>,
        errors: mpsc::UnboundedReceiver<ErrorEvent>,
    ) -> SupervisorTasks {
        let event_supervisor = self.clone();
        let error_supervisor = self.clone();
        SupervisorTasks {
            events: tokio::spawn(async move { event_supervisor.watch_events(events).await }),
            errors: tokio::spawn(async move { error_supervisor.watch_errors(errors).await }),
        }
    }

    /// Consumes chat events until the stream closes.
    pub async fn watch_events(&self, mut events: mpsc::UnboundedReceiver<ChatEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(&event);
        }
        debug!("Chat event stream closed");
    }

    /// Consumes error events until the stream closes.
    pub async fn watch_errors(&self, mut errors: mpsc::UnboundedReceiver<ErrorEvent>) {
        while let Some(error) = errors.recv().await {
            self.handle_error(&error);
        }
        debug!("Error event stream closed");
    }

    /// Applies one chat event: transitions state, then notifies observers.
    pub fn handle_event(&self, event: &ChatEvent) {
        match event {
            ChatEvent::Connecting => {
                info!("Connecting event fired");
                self.transition(ConnectionState::Connecting);
                EventObservers::notify(&self.observers.connecting, &(), "connecting");
            }
            ChatEvent::Connected => {
                info!("Connected event fired");
                self.transition(ConnectionState::Connected);
                EventObservers::notify(&self.observers.connected, &(), "connected");
            }
            ChatEvent::User(user_event) => {
                info!(
                    user_id = %user_event.user.id,
                    user = %user_event.user.name,
                    change = ?user_event.change,
                    "User event"
                );
                EventObservers::notify(&self.observers.user, user_event, "user");
            }
            ChatEvent::Channel(channel_event) => {
                info!(
                    channel_id = %channel_event.channel.id,
                    change = ?channel_event.change,
                    "Channel event"
                );
                EventObservers::notify(&self.observers.channel, channel_event, "channel");
            }
            other => {
                info!(kind = other.kind(), "Unrecognized chat event");
                EventObservers::notify(&self.observers.unrecognized, other, "unrecognized");
            }
        }
    }

    /// Classifies one error event.
    ///
    /// Returns `true` if the error halted the bot.
    pub fn handle_error(&self, error: &ErrorEvent) -> bool {
        EventObservers::notify(&self.observers.error, error, "error");

        if error.is_disconnect() {
            self.state.send_if_modified(|state| match state {
                ConnectionState::Connected | ConnectionState::Connecting => {
                    *state = ConnectionState::Disconnected(error.to_string());
                    true
                }
                _ => false,
            });
        }

        if error.is_fatal() {
            error!(error = %error, "Fatal chat adapter error, halting bot");
            self.halt_reason.lock().get_or_insert_with(|| error.clone());
            self.halt.cancel();
            return true;
        }

        warn!(error = %error, "Chat adapter error event");
        false
    }

    fn transition(&self, next: ConnectionState) {
        self.state.send_if_modified(|state| {
            if *state == next {
                return false;
            }
            let expected = matches!(
                (&*state, &next),
                (
                    ConnectionState::Idle | ConnectionState::Disconnected(_),
                    ConnectionState::Connecting
                ) | (ConnectionState::Connecting, ConnectionState::Connected)
            );
            if !expected {
                debug!(from = %state, to = %next, "Out-of-order connection transition");
            }
            debug!(from = %state, to = %next, "Connection state changed");
            *state = next;
            true
        });
    }
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("state", &self.state())
            .field("halted", &self.is_halted())
            .field("observers", &self.observers)
            .finish()
    }
}
