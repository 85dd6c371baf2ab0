//! In-memory implementation of `ChatRepository`.

use async_trait::async_trait;
use companion_core::chat::{ChatRecord, ChatRepository};
use companion_core::error::Result;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Chat history held in memory for the lifetime of the widget.
///
/// Backs the widget when no backend is wired in, and seeds from fixture
/// files for demos and tests.
#[derive(Debug, Default)]
pub struct InMemoryChatRepository {
    chats: RwLock<HashMap<String, ChatRecord>>,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `records`. A later record
    /// with the same chat id replaces an earlier one.
    pub fn from_records(records: impl IntoIterator<Item = ChatRecord>) -> Self {
        let chats = records
            .into_iter()
            .map(|chat| (chat.chat_id.clone(), chat))
            .collect();
        Self {
            chats: RwLock::new(chats),
        }
    }

    pub async fn len(&self) -> usize {
        self.chats.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.chats.read().await.is_empty()
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn list_chats(&self) -> Result<Vec<ChatRecord>> {
        let chats = self.chats.read().await;
        Ok(chats.values().cloned().collect())
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Option<ChatRecord>> {
        let chats = self.chats.read().await;
        Ok(chats.get(chat_id).cloned())
    }

    async fn save_chat(&self, chat: &ChatRecord) -> Result<()> {
        let mut chats = self.chats.write().await;
        let replaced = chats.insert(chat.chat_id.clone(), chat.clone()).is_some();
        tracing::debug!(chat_id = %chat.chat_id, replaced, "Saved chat");
        Ok(())
    }
}
