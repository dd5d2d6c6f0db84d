//! Stream plumbing between an adapter and the runtime.
//!
//! All three streams are unbounded: an adapter never blocks on a slow
//! consumer. Within one stream, items arrive in the order they were emitted;
//! there is no ordering between streams.

use tokio::sync::mpsc;
use tracing::trace;

use crate::foundation::event::{ChatEvent, ErrorEvent};
use crate::foundation::message::Message;

/// The producing half, owned by the adapter.
///
/// Dropping every clone of the sink closes all three streams.
#[derive(Debug, Clone)]
pub struct AdapterSink {
    messages: mpsc::UnboundedSender<Message>,
    events: mpsc::UnboundedSender<ChatEvent>,
    errors: mpsc::UnboundedSender<ErrorEvent>,
}

impl AdapterSink {
    /// Publishes an inbound message.
    ///
    /// Returns `false` if the runtime is no longer listening.
    pub fn message(&self, message: Message) -> bool {
        self.messages.send(message).is_ok()
    }

    /// Publishes a chat event.
    pub fn event(&self, event: ChatEvent) -> bool {
        trace!(kind = event.kind(), "Publishing chat event");
        self.events.send(event).is_ok()
    }

    /// Publishes an error event.
    pub fn error(&self, error: ErrorEvent) -> bool {
        trace!(error = %error, fatal = error.is_fatal(), "Publishing error event");
        self.errors.send(error).is_ok()
    }

    /// Returns `true` once the runtime has dropped the message stream.
    pub fn is_closed(&self) -> bool {
        self.messages.is_closed()
    }
}

/// The consuming half, owned by the runtime.
#[derive(Debug)]
pub struct AdapterStreams {
    /// Inbound messages, consumed by the dispatch loop.
    pub messages: mpsc::UnboundedReceiver<Message>,
    /// Lifecycle events, consumed by the supervisor.
    pub events: mpsc::UnboundedReceiver<ChatEvent>,
    /// Error events, consumed by the supervisor.
    pub errors: mpsc::UnboundedReceiver<ErrorEvent>,
}

/// Creates a connected sink/stream pair.
pub fn create_adapter_channels() -> (AdapterSink, AdapterStreams) {
    let (messages_tx, messages_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (errors_tx, errors_rx) = mpsc::unbounded_channel();

    let sink = AdapterSink {
        messages: messages_tx,
        events: events_tx,
        errors: errors_tx,
    };

    let streams = AdapterStreams {
        messages: messages_rx,
        events: events_rx,
        errors: errors_rx,
    };

    (sink, streams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::message::{Channel, User};

    #[tokio::test]
    async fn test_streams_preserve_order() {
        let (sink, mut streams) = create_adapter_channels();
        assert!(sink.event(ChatEvent::Connecting));
        assert!(sink.event(ChatEvent::Connected));

        assert_eq!(streams.events.recv().await, Some(ChatEvent::Connecting));
        assert_eq!(streams.events.recv().await, Some(ChatEvent::Connected));
    }

    #[tokio::test]
    async fn test_dropping_sink_closes_streams() {
        let (sink, mut streams) = create_adapter_channels();
        let msg = Message::new("hi", User::new("U1", "a"), Channel::direct("D1"), 0);
        sink.message(msg.clone());
        drop(sink);

        assert_eq!(streams.messages.recv().await, Some(msg));
        assert_eq!(streams.messages.recv().await, None);
        assert_eq!(streams.events.recv().await, None);
        assert_eq!(streams.errors.recv().await, None);
    }

    #[test]
    fn test_sink_reports_closed_runtime() {
        let (sink, streams) = create_adapter_channels();
        drop(streams);
        assert!(sink.is_closed());
        assert!(!sink.error(ErrorEvent::InvalidAuth));
    }
}
