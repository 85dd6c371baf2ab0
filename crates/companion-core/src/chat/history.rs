//! History list filtering and ordering.

use super::model::ChatRecord;
use super::reconciler::{ContextMatch, classify_ids};
use crate::course::SelectedCourses;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumString};

/// Which chats the history view shows. The modes are mutually exclusive.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HistoryFilter {
    /// Chats sharing at least one course with the selection.
    #[default]
    Related,
    /// Chats whose course set equals the selection.
    Exact,
    /// Every chat.
    All,
}

impl HistoryFilter {
    pub fn matches(self, chat: &ChatRecord, selected: &SelectedCourses) -> bool {
        match self {
            Self::All => true,
            Self::Related => {
                let selected = selected.id_set();
                chat.context_ids().intersection(&selected).next().is_some()
            }
            Self::Exact => {
                classify_ids(&chat.context_ids(), &selected.id_set()) == ContextMatch::Exact
            }
        }
    }
}

/// Most recent activity first; ties by newest creation, then by chat id.
fn history_order(a: &ChatRecord, b: &ChatRecord) -> Ordering {
    b.last_activity
        .cmp(&a.last_activity)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.chat_id.cmp(&b.chat_id))
}

/// Sorts chats into history display order.
pub fn sort_history(chats: &mut [ChatRecord]) {
    chats.sort_by(history_order);
}

/// Applies `filter` against the current selection and returns the matching
/// chats in history order.
///
/// An empty result is an empty-state view, never an error.
pub fn filter_history(
    chats: Vec<ChatRecord>,
    selected: &SelectedCourses,
    filter: HistoryFilter,
) -> Vec<ChatRecord> {
    let mut visible: Vec<ChatRecord> = chats
        .into_iter()
        .filter(|chat| filter.matches(chat, selected))
        .collect();
    sort_history(&mut visible);
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::CourseContextEntry;
    use crate::course::Course;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn chat(id: &str, courses: &[&str], created: i64, active: i64) -> ChatRecord {
        let context = courses
            .iter()
            .map(|c| CourseContextEntry {
                id: c.to_string(),
                name: c.to_string(),
                primary: false,
            })
            .collect();
        let mut record = ChatRecord::new(id, id, context, at(created));
        record.last_activity = at(active);
        record
    }

    fn history() -> Vec<ChatRecord> {
        vec![
            chat("c1", &["py101", "cpp201"], 10, 50),
            chat("c2", &["py101"], 20, 40),
            chat("c3", &["ml401"], 30, 60),
            chat("c4", &["cpp201", "ml401"], 40, 45),
        ]
    }

    fn selected(ids: &[&str]) -> SelectedCourses {
        ids.iter().map(|id| Course::new(*id, *id)).collect()
    }

    fn ids(chats: &[ChatRecord]) -> Vec<&str> {
        chats.iter().map(|c| c.chat_id.as_str()).collect()
    }

    #[test]
    fn test_exact_filter_returns_single_match() {
        let visible = filter_history(
            history(),
            &selected(&["cpp201", "py101"]),
            HistoryFilter::Exact,
        );
        assert_eq!(ids(&visible), vec!["c1"]);
    }

    #[test]
    fn test_related_filter() {
        let visible = filter_history(history(), &selected(&["py101"]), HistoryFilter::Related);
        assert_eq!(ids(&visible), vec!["c1", "c2"]);
    }

    #[test]
    fn test_all_filter_orders_by_activity() {
        let visible = filter_history(history(), &selected(&["py101"]), HistoryFilter::All);
        assert_eq!(ids(&visible), vec!["c3", "c1", "c4", "c2"]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let visible = filter_history(history(), &selected(&["go101"]), HistoryFilter::Related);
        assert!(visible.is_empty());
    }

    #[test]
    fn test_ties_broken_by_created_then_id() {
        let mut chats = vec![
            chat("b", &["x"], 10, 100),
            chat("a", &["x"], 10, 100),
            chat("z", &["x"], 20, 100),
        ];
        sort_history(&mut chats);
        assert_eq!(ids(&chats), vec!["z", "a", "b"]);
    }
}
