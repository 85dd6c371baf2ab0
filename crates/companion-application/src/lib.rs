//! Application layer for the course companion widget.
//!
//! Owns the single writer of the session state: UI events come in through
//! [`SessionController`], chat records are resolved through the injected
//! [`ChatRepository`](companion_core::chat::ChatRepository), and
//! [`CompanionWidget`] handles the widget's init/teardown lifecycle.

pub mod session_controller;
pub mod widget;

pub use session_controller::{OpenChatOutcome, SessionController};
pub use widget::CompanionWidget;
