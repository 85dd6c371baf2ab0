//! Chat record domain model.

use crate::course::Course;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One course of a chat's context, as captured when the chat was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseContextEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub primary: bool,
}

impl CourseContextEntry {
    pub fn from_course(course: &Course, primary: bool) -> Self {
        Self {
            id: course.id.clone(),
            name: course.title.clone(),
            primary,
        }
    }
}

/// A chat in the user's history.
///
/// The course context is a snapshot taken when the chat is created and is
/// never rewritten afterwards; only the activity fields move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRecord {
    /// Unique chat identifier (UUID format for chats created by the widget)
    pub chat_id: String,
    /// Human-readable chat title
    pub title: String,
    course_context: Vec<CourseContextEntry>,
    /// Preview of the most recent message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(default)]
    pub message_count: u32,
    pub last_activity: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ChatRecord {
    /// Creates an empty chat with the given frozen course context.
    pub fn new(
        chat_id: impl Into<String>,
        title: impl Into<String>,
        course_context: Vec<CourseContextEntry>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            chat_id: chat_id.into(),
            title: title.into(),
            course_context,
            last_message: None,
            message_count: 0,
            last_activity: created_at,
            created_at,
        }
    }

    pub fn course_context(&self) -> &[CourseContextEntry] {
        &self.course_context
    }

    /// Context course ids as an order-independent set.
    pub fn context_ids(&self) -> BTreeSet<&str> {
        self.course_context.iter().map(|c| c.id.as_str()).collect()
    }

    /// The course marked primary, if any.
    pub fn primary_course(&self) -> Option<&CourseContextEntry> {
        self.course_context.iter().find(|c| c.primary)
    }

    /// The context as plain courses, in context order.
    ///
    /// Used to restore the selection when the user continues a chat with
    /// its original courses.
    pub fn context_courses(&self) -> Vec<Course> {
        self.course_context
            .iter()
            .map(|c| Course::new(c.id.clone(), c.name.clone()))
            .collect()
    }

    /// Records a new message on the chat.
    ///
    /// `last_activity` never moves backwards, so out-of-order delivery
    /// cannot reshuffle the history list.
    pub fn record_message(&mut self, preview: impl Into<String>, at: DateTime<Utc>) {
        self.last_message = Some(preview.into());
        self.message_count = self.message_count.saturating_add(1);
        if at > self.last_activity {
            self.last_activity = at;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn chat() -> ChatRecord {
        ChatRecord::new(
            "c-1",
            "Pointers",
            vec![
                CourseContextEntry::from_course(&Course::new("py101", "Python 101"), true),
                CourseContextEntry::from_course(&Course::new("cpp201", "C++ 201"), false),
            ],
            at(100),
        )
    }

    #[test]
    fn test_new_chat_is_empty() {
        let chat = chat();
        assert_eq!(chat.message_count, 0);
        assert!(chat.last_message.is_none());
        assert_eq!(chat.last_activity, chat.created_at);
        assert_eq!(chat.primary_course().unwrap().id, "py101");
    }

    #[test]
    fn test_record_message_is_monotonic() {
        let mut chat = chat();
        chat.record_message("hello", at(200));
        chat.record_message("late delivery", at(150));
        assert_eq!(chat.message_count, 2);
        assert_eq!(chat.last_message.as_deref(), Some("late delivery"));
        assert_eq!(chat.last_activity, at(200));
    }

    #[test]
    fn test_camel_case_wire_format() {
        let json = serde_json::to_value(chat()).unwrap();
        assert!(json.get("courseContext").is_some());
        assert!(json.get("messageCount").is_some());
        assert!(json.get("lastMessage").is_none());
    }
}
