//! Chat repository trait.
//!
//! Defines the interface for the chat history source.

use super::model::ChatRecord;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract source of chat history.
///
/// The widget core never performs network I/O itself; a backend client,
/// a fixture file or an in-memory store implements this trait and is
/// injected into the application layer.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Lists every chat visible to the user, in no particular order.
    async fn list_chats(&self) -> Result<Vec<ChatRecord>>;

    /// Finds a chat by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ChatRecord))`: Chat found
    /// - `Ok(None)`: Chat not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn get_chat(&self, chat_id: &str) -> Result<Option<ChatRecord>>;

    /// Inserts or replaces a chat.
    async fn save_chat(&self, chat: &ChatRecord) -> Result<()>;
}
