//! Chat history fixtures.
//!
//! A fixture is a JSON array of chat records in the backend's wire format
//! (camelCase keys), e.g.
//!
//! ```json
//! [{
//!   "chatId": "c-1",
//!   "title": "Loops",
//!   "courseContext": [{ "id": "py101", "name": "Python 101", "primary": true }],
//!   "messageCount": 3,
//!   "lastActivity": "2024-05-01T10:00:00Z",
//!   "createdAt": "2024-05-01T09:00:00Z"
//! }]
//! ```

use crate::in_memory_chat_repository::InMemoryChatRepository;
use companion_core::chat::ChatRecord;
use companion_core::error::{CompanionError, Result};
use std::path::Path;

/// Parses a fixture document.
pub fn parse_chat_fixture(content: &str) -> Result<Vec<ChatRecord>> {
    let chats: Vec<ChatRecord> = serde_json::from_str(content)?;
    Ok(chats)
}

/// Reads a fixture file.
pub async fn load_chat_fixture(path: &Path) -> Result<Vec<ChatRecord>> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        CompanionError::io(format!("failed to read fixture {}: {}", path.display(), e))
    })?;
    let chats = parse_chat_fixture(&content)?;
    tracing::info!(path = %path.display(), count = chats.len(), "Loaded chat fixture");
    Ok(chats)
}

/// Reads a fixture file into a fresh in-memory repository.
pub async fn repository_from_fixture(path: &Path) -> Result<InMemoryChatRepository> {
    Ok(InMemoryChatRepository::from_records(load_chat_fixture(path).await?))
}
