//! Session orchestration core for the course companion widget.
//!
//! Tracks which panel is open, which courses are selected and which chat is
//! active, and decides how a chat from history is opened when its course
//! context differs from the live selection. Rendering and networking are
//! collaborators: they read [`session::SessionState`] and feed
//! [`session::SessionEvent`]s in.

pub mod chat;
pub mod config;
pub mod course;
pub mod error;
pub mod session;

// Re-export common error type
pub use error::CompanionError;
