//! Widget session state.

use super::view::{Icon, View};
use crate::chat::PendingChatChoice;
use crate::course::SelectedCourses;
use serde::{Deserialize, Serialize};

/// Where the chat-open flow currently stands.
///
/// `Evaluating` and `DirectOpen` never persist in state: evaluation happens
/// inside a single reduction and a direct open lands back in `Idle`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ChatOpenFlow {
    #[default]
    Idle,
    /// A chat was clicked whose context differs from the selection; the user
    /// must choose to continue with its original courses, start a new chat,
    /// or cancel.
    AwaitingUserChoice(PendingChatChoice),
}

/// Per-widget session state.
///
/// Created when the widget initializes and dropped on teardown. Read by the
/// rendering layer; only [`reduce`](super::reduce) produces new values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Panel on screen; `None` when every panel is closed.
    pub(crate) current_view: Option<View>,
    pub(crate) is_menu_open: bool,
    /// Consistent with `current_view`; at most one icon is active.
    pub(crate) active_icon: Option<Icon>,
    pub(crate) selected_courses: SelectedCourses,
    /// Focused course; always a member of `selected_courses` when set.
    pub(crate) current_course_id: Option<String>,
    pub(crate) active_chat_id: Option<String>,
    #[serde(default)]
    pub(crate) chat_flow: ChatOpenFlow,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for a freshly initialized widget.
    ///
    /// Nothing is selected yet, so a requested chat view starts on
    /// discovery instead.
    pub fn initial(view: Option<View>, menu_open: bool) -> Self {
        let view = view.map(|view| match view {
            View::Chat => View::Discovery,
            other => other,
        });
        Self {
            current_view: view,
            is_menu_open: menu_open && view.is_none(),
            active_icon: view.and_then(View::icon),
            ..Self::default()
        }
    }

    pub fn current_view(&self) -> Option<View> {
        self.current_view
    }

    pub fn is_panel_open(&self) -> bool {
        self.current_view.is_some()
    }

    pub fn is_menu_open(&self) -> bool {
        self.is_menu_open
    }

    pub fn active_icon(&self) -> Option<Icon> {
        self.active_icon
    }

    pub fn selected_courses(&self) -> &SelectedCourses {
        &self.selected_courses
    }

    pub fn current_course_id(&self) -> Option<&str> {
        self.current_course_id.as_deref()
    }

    pub fn active_chat_id(&self) -> Option<&str> {
        self.active_chat_id.as_deref()
    }

    pub fn chat_flow(&self) -> &ChatOpenFlow {
        &self.chat_flow
    }

    /// The prompt the user still has to answer, if any.
    pub fn pending_choice(&self) -> Option<&PendingChatChoice> {
        match &self.chat_flow {
            ChatOpenFlow::AwaitingUserChoice(pending) => Some(pending),
            ChatOpenFlow::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let state = SessionState::new();
        assert!(state.current_view().is_none());
        assert!(!state.is_menu_open());
        assert!(state.active_icon().is_none());
        assert!(state.selected_courses().is_empty());
        assert!(state.active_chat_id().is_none());
        assert_eq!(state.chat_flow(), &ChatOpenFlow::Idle);
    }

    #[test]
    fn test_initial_with_view_keeps_icon_consistent() {
        let state = SessionState::initial(Some(View::Profile), true);
        assert_eq!(state.active_icon(), Some(Icon::Profile));
        assert!(!state.is_menu_open());
    }

    #[test]
    fn test_initial_chat_view_starts_on_discovery() {
        let state = SessionState::initial(Some(View::Chat), false);
        assert_eq!(state.current_view(), Some(View::Discovery));
        assert_eq!(state.active_icon(), Some(Icon::Discovery));
    }

    #[test]
    fn test_initial_menu_only() {
        let state = SessionState::initial(None, true);
        assert!(state.is_menu_open());
        assert!(!state.is_panel_open());
    }
}
