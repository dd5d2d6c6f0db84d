//! Shared fixtures for unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use herald_core::{BoxedChat, Channel, Chat, ChatResult, Message, User};

pub(crate) type Sent = Arc<Mutex<Vec<(String, String)>>>;

/// A chat backend that records every outbound message.
pub(crate) struct RecordingChat {
    sent: Sent,
}

impl RecordingChat {
    pub(crate) fn new() -> (BoxedChat, Sent) {
        let sent = Sent::default();
        let chat = Arc::new(Self {
            sent: Arc::clone(&sent),
        });
        (chat, sent)
    }
}

#[async_trait]
impl Chat for RecordingChat {
    async fn send(&self, channel_id: &str, text: &str) -> ChatResult<()> {
        self.sent
            .lock()
            .push((channel_id.to_string(), text.to_string()));
        Ok(())
    }
}

pub(crate) fn group_message(text: &str) -> Message {
    Message::new(text, User::new("U1", "alice"), Channel::new("C1", "general"), 0)
}
