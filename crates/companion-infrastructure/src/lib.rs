//! Adapters for the course companion widget: chat repositories, chat
//! history fixtures and the TOML configuration file.

pub mod config_service;
pub mod fixtures;
pub mod in_memory_chat_repository;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::in_memory_chat_repository::InMemoryChatRepository;
pub use crate::paths::CompanionPaths;
