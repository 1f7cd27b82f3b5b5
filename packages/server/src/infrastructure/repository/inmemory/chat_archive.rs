//! In-memory [`ChatArchive`] implementation.
//!
//! Keeps appended messages in a plain vector. The engine treats the archive
//! as best-effort; nothing reads it back on the live path.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatArchive, ChatMessage};

pub struct InMemoryChatArchive {
    messages: Mutex<Vec<ChatMessage>>,
}

impl InMemoryChatArchive {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the archived messages, oldest first. Test/debug helper.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.lock().await.clone()
    }
}

impl Default for InMemoryChatArchive {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatArchive for InMemoryChatArchive {
    async fn append(&self, message: ChatMessage) {
        let mut messages = self.messages.lock().await;
        messages.push(message);
    }
}
