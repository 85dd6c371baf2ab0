//! Session events and the effects a reduction reports.

use super::state::SessionState;
use super::view::View;
use crate::chat::{ChatRecord, PendingChatChoice};
use crate::course::Course;
use crate::error::CompanionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A discrete user action the widget reacts to.
///
/// Events that create a chat carry their own id and timestamp so that
/// reduction stays deterministic; the application layer allocates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Show a panel and collapse the launcher menu.
    OpenPanel { view: View },
    /// Hide the current panel. The selection is kept.
    ClosePanel,
    /// Expand or collapse the launcher menu.
    ToggleMenu,
    SelectCourse { course: Course },
    RemoveCourse { course_id: String },
    /// "Clear all" in the selection bar.
    ClearCourses,
    /// Restart discovery: drop the selection and show the discovery panel.
    StartDiscovery,
    /// Focus one of the selected courses.
    FocusCourse { course_id: String },
    CreateNewChat {
        chat_id: String,
        #[serde(default)]
        title: String,
        at: DateTime<Utc>,
    },
    /// Activate a chat without reconciling contexts, optionally replacing
    /// the selection with `override_courses`.
    OpenChat {
        chat_id: String,
        #[serde(default)]
        override_courses: Option<Vec<Course>>,
    },
    /// The user clicked a chat in the history list.
    RequestOpenChat { chat: ChatRecord },
    /// Answer to a pending continue/start-new prompt.
    ResolveChoice { choice: ChatChoice },
}

/// The options offered when a chat's context differs from the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatChoice {
    /// Open the chat and replace the selection with its original courses.
    ContinueOriginal,
    /// Leave the chat closed and start a new one with the current selection.
    StartNew {
        chat_id: String,
        #[serde(default)]
        title: String,
        at: DateTime<Utc>,
    },
    /// Dismiss the prompt; nothing changes.
    Cancel,
}

/// Something the caller must act on after a reduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEffect {
    /// A chat was created and should be persisted.
    ChatCreated { chat: ChatRecord },
    ChatOpened { chat_id: String },
    /// Show the continue/start-new prompt.
    PromptUser { pending: PendingChatChoice },
    PromptDismissed { chat_id: String },
    /// The event referenced something absent and was treated as a no-op.
    Ignored { reason: CompanionError },
}

/// Result of reducing one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    pub effects: Vec<SessionEffect>,
}

impl Transition {
    pub(crate) fn new(state: SessionState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    pub(crate) fn with_effect(mut self, effect: SessionEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// The chat created by this transition, if any.
    pub fn created_chat(&self) -> Option<&ChatRecord> {
        self.effects.iter().find_map(|effect| match effect {
            SessionEffect::ChatCreated { chat } => Some(chat),
            _ => None,
        })
    }

    pub fn was_ignored(&self) -> bool {
        self.effects
            .iter()
            .any(|effect| matches!(effect, SessionEffect::Ignored { .. }))
    }
}
