//! Primary course policy for new chats.

use super::model::CourseContextEntry;
use crate::course::SelectedCourses;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Decides which course of a new chat's context is marked primary.
///
/// At most one entry is ever marked.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PrimaryCoursePolicy {
    /// The earliest selected course is primary.
    #[default]
    FirstSelected,
    /// The focused course is primary; falls back to the earliest selected
    /// course when nothing is focused.
    CurrentCourse,
    /// No course is marked primary.
    Unmarked,
}

impl PrimaryCoursePolicy {
    /// Snapshots `selection` into a chat course context, tagging the primary
    /// entry according to this policy.
    pub fn build_context(
        self,
        selection: &SelectedCourses,
        current_course_id: Option<&str>,
    ) -> Vec<CourseContextEntry> {
        let primary_id = match self {
            Self::FirstSelected => selection.first().map(|c| c.id.as_str()),
            Self::CurrentCourse => current_course_id
                .filter(|id| selection.contains(id))
                .or_else(|| selection.first().map(|c| c.id.as_str())),
            Self::Unmarked => None,
        };

        selection
            .iter()
            .map(|course| {
                CourseContextEntry::from_course(course, Some(course.id.as_str()) == primary_id)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::Course;

    fn selection() -> SelectedCourses {
        vec![
            Course::new("py101", "Python 101"),
            Course::new("cpp201", "C++ 201"),
            Course::new("ml401", "ML 401"),
        ]
        .into()
    }

    fn primaries(context: &[CourseContextEntry]) -> Vec<&str> {
        context.iter().filter(|c| c.primary).map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_first_selected() {
        let context = PrimaryCoursePolicy::FirstSelected.build_context(&selection(), Some("ml401"));
        assert_eq!(primaries(&context), vec!["py101"]);
        assert_eq!(context.len(), 3);
    }

    #[test]
    fn test_current_course() {
        let policy = PrimaryCoursePolicy::CurrentCourse;
        assert_eq!(primaries(&policy.build_context(&selection(), Some("cpp201"))), vec!["cpp201"]);
        assert_eq!(primaries(&policy.build_context(&selection(), None)), vec!["py101"]);
        assert_eq!(primaries(&policy.build_context(&selection(), Some("gone"))), vec!["py101"]);
    }

    #[test]
    fn test_unmarked() {
        let context = PrimaryCoursePolicy::Unmarked.build_context(&selection(), None);
        assert!(primaries(&context).is_empty());
    }

    #[test]
    fn test_parse_from_str() {
        let policy: PrimaryCoursePolicy = "current_course".parse().unwrap();
        assert_eq!(policy, PrimaryCoursePolicy::CurrentCourse);
        assert_eq!(PrimaryCoursePolicy::FirstSelected.to_string(), "first_selected");
    }
}
