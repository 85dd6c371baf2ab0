//! Chat domain module.
//!
//! # Module Structure
//!
//! - `model`: `ChatRecord` and its frozen course context
//! - `policy`: `PrimaryCoursePolicy`, which course of a new chat is primary
//! - `repository`: `ChatRepository`, the injected chat history source
//! - `reconciler`: classifies a chat's context against the live selection
//! - `history`: history list filtering and ordering

mod history;
mod model;
mod policy;
mod reconciler;
mod repository;

pub use history::{HistoryFilter, filter_history, sort_history};
pub use model::{ChatRecord, CourseContextEntry};
pub use policy::PrimaryCoursePolicy;
pub use reconciler::{
    ContextMatch, OpenDecision, PendingChatChoice, classify, classify_ids, evaluate_open,
};
pub use repository::ChatRepository;
