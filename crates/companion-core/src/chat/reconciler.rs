//! Chat context reconciliation.
//!
//! When the user clicks a chat in the history list, its frozen course
//! context is compared against the live selection. An exact match opens
//! the chat directly; anything else asks the user to either continue with
//! the chat's original courses or start a new chat with the current ones.
//! Contexts are never merged.

use super::model::ChatRecord;
use crate::course::SelectedCourses;
use crate::error::{CompanionError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::Display;

/// Relationship between a chat's course context and the live selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContextMatch {
    /// Same id set, order ignored.
    Exact,
    /// At least one shared id, sets differ.
    Partial,
    /// No shared id.
    #[serde(rename = "none")]
    #[strum(to_string = "none")]
    NoOverlap,
}

impl ContextMatch {
    /// Warning shown above the continue/start-new prompt.
    ///
    /// Partial and no-overlap lead to the same two options; only the label
    /// differs.
    pub fn warning_label(self) -> Option<&'static str> {
        match self {
            Self::Exact => None,
            Self::Partial => Some("This chat covers a different mix of your selected courses."),
            Self::NoOverlap => Some("This chat is about courses you have not selected."),
        }
    }

    pub fn requires_choice(self) -> bool {
        !matches!(self, Self::Exact)
    }
}

/// Classifies two id sets. Duplicates collapse; order is irrelevant.
pub fn classify_ids(context: &BTreeSet<&str>, selected: &BTreeSet<&str>) -> ContextMatch {
    if context == selected {
        ContextMatch::Exact
    } else if context.intersection(selected).next().is_some() {
        ContextMatch::Partial
    } else {
        ContextMatch::NoOverlap
    }
}

/// Classifies a chat's course context against the current selection.
pub fn classify(chat: &ChatRecord, selected: &SelectedCourses) -> ContextMatch {
    classify_ids(&chat.context_ids(), &selected.id_set())
}

/// A chat waiting on the user to pick how to open it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingChatChoice {
    pub chat: ChatRecord,
    pub relation: ContextMatch,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Outcome of evaluating a chat-open request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenDecision {
    DirectOpen,
    AwaitingUserChoice(PendingChatChoice),
}

/// Decides how a chat should be opened against the current selection.
///
/// Read-only: nothing is applied until the caller acts on the decision, so
/// a prompt can be dismissed without side effects.
///
/// # Errors
///
/// Returns [`CompanionError::NoCourseSelected`] when the selection is empty.
/// The caller should route the user to discovery instead of evaluating.
pub fn evaluate_open(chat: &ChatRecord, selected: &SelectedCourses) -> Result<OpenDecision> {
    if selected.is_empty() {
        return Err(CompanionError::NoCourseSelected);
    }

    let relation = classify(chat, selected);
    if !relation.requires_choice() {
        return Ok(OpenDecision::DirectOpen);
    }

    Ok(OpenDecision::AwaitingUserChoice(PendingChatChoice {
        chat: chat.clone(),
        relation,
        warning: relation.warning_label().map(str::to_string),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::CourseContextEntry;
    use crate::course::Course;
    use chrono::Utc;

    fn chat_with(ids: &[&str]) -> ChatRecord {
        let context = ids
            .iter()
            .enumerate()
            .map(|(i, id)| CourseContextEntry {
                id: id.to_string(),
                name: id.to_uppercase(),
                primary: i == 0,
            })
            .collect();
        ChatRecord::new("chat-1", "Study", context, Utc::now())
    }

    fn selected(ids: &[&str]) -> SelectedCourses {
        ids.iter().map(|id| Course::new(*id, id.to_uppercase())).collect()
    }

    #[test]
    fn test_exact_match_any_order() {
        let chat = chat_with(&["py101", "cpp201"]);
        assert_eq!(classify(&chat, &selected(&["cpp201", "py101"])), ContextMatch::Exact);
        assert_eq!(
            evaluate_open(&chat, &selected(&["py101", "cpp201"])).unwrap(),
            OpenDecision::DirectOpen
        );
    }

    #[test]
    fn test_partial_overlap_prompts() {
        let chat = chat_with(&["py101", "cpp201"]);
        match evaluate_open(&chat, &selected(&["py101"])).unwrap() {
            OpenDecision::AwaitingUserChoice(pending) => {
                assert_eq!(pending.relation, ContextMatch::Partial);
                assert_eq!(pending.chat.chat_id, "chat-1");
                assert!(pending.warning.is_some());
            }
            other => panic!("expected prompt, got {:?}", other),
        }
    }

    #[test]
    fn test_superset_selection_is_partial() {
        let chat = chat_with(&["py101"]);
        assert_eq!(
            classify(&chat, &selected(&["py101", "ml401"])),
            ContextMatch::Partial
        );
    }

    #[test]
    fn test_no_overlap_still_prompts() {
        let chat = chat_with(&["py101", "cpp201"]);
        match evaluate_open(&chat, &selected(&["ml401"])).unwrap() {
            OpenDecision::AwaitingUserChoice(pending) => {
                assert_eq!(pending.relation, ContextMatch::NoOverlap);
                assert_ne!(
                    pending.warning,
                    ContextMatch::Partial.warning_label().map(str::to_string)
                );
            }
            other => panic!("expected prompt, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let chat = chat_with(&["py101"]);
        let err = evaluate_open(&chat, &SelectedCourses::new()).unwrap_err();
        assert!(err.is_no_course_selected());
    }

    #[test]
    fn test_duplicate_context_ids_collapse() {
        let chat = chat_with(&["py101", "py101"]);
        assert_eq!(classify(&chat, &selected(&["py101"])), ContextMatch::Exact);
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_string(&ContextMatch::NoOverlap).unwrap(), "\"none\"");
        assert_eq!(ContextMatch::NoOverlap.to_string(), "none");
        assert_eq!(ContextMatch::Partial.to_string(), "partial");
    }
}
