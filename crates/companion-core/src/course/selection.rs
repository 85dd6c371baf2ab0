//! Ordered, id-unique course selection.

use super::model::Course;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The set of courses the user currently has selected.
///
/// Keeps first-insertion order for display and enforces id uniqueness on
/// every write path, including deserialization. This is the single source
/// of truth for the course context propagated into chat creation and
/// history filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Course>", into = "Vec<Course>")]
pub struct SelectedCourses {
    courses: Vec<Course>,
}

impl SelectedCourses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `course` unless a course with the same id is already selected.
    ///
    /// Returns `true` if the selection changed.
    pub fn insert(&mut self, course: Course) -> bool {
        if self.contains(&course.id) {
            return false;
        }
        self.courses.push(course);
        true
    }

    /// Removes the course with the given id, returning it if it was selected.
    pub fn remove(&mut self, course_id: &str) -> Option<Course> {
        let index = self.courses.iter().position(|c| c.id == course_id)?;
        Some(self.courses.remove(index))
    }

    pub fn clear(&mut self) {
        self.courses.clear();
    }

    pub fn contains(&self, course_id: &str) -> bool {
        self.courses.iter().any(|c| c.id == course_id)
    }

    pub fn get(&self, course_id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == course_id)
    }

    /// The earliest selected course still in the set.
    pub fn first(&self) -> Option<&Course> {
        self.courses.first()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Course> {
        self.courses.iter()
    }

    pub fn as_slice(&self) -> &[Course] {
        &self.courses
    }

    /// Course ids in selection order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.courses.iter().map(|c| c.id.as_str())
    }

    /// Course ids as an order-independent set, for context comparisons.
    pub fn id_set(&self) -> BTreeSet<&str> {
        self.ids().collect()
    }
}

impl From<Vec<Course>> for SelectedCourses {
    fn from(courses: Vec<Course>) -> Self {
        courses.into_iter().collect()
    }
}

impl From<SelectedCourses> for Vec<Course> {
    fn from(selection: SelectedCourses) -> Self {
        selection.courses
    }
}

impl FromIterator<Course> for SelectedCourses {
    fn from_iter<I: IntoIterator<Item = Course>>(iter: I) -> Self {
        let mut selection = Self::new();
        for course in iter {
            selection.insert(course);
        }
        selection
    }
}

impl<'a> IntoIterator for &'a SelectedCourses {
    type Item = &'a Course;
    type IntoIter = std::slice::Iter<'a, Course>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: &str) -> Course {
        Course::new(id, id.to_uppercase())
    }

    #[test]
    fn test_insert_is_unique_by_id() {
        let mut selection = SelectedCourses::new();
        assert!(selection.insert(course("py101")));
        assert!(!selection.insert(Course::new("py101", "Renamed")));
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.first().unwrap().title, "PY101");
    }

    #[test]
    fn test_remove_keeps_order_of_remaining() {
        let mut selection: SelectedCourses =
            vec![course("a"), course("b"), course("c")].into();
        assert!(selection.remove("b").is_some());
        assert!(selection.remove("b").is_none());
        assert_eq!(selection.ids().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_mixed_sequence_never_duplicates() {
        let mut selection = SelectedCourses::new();
        let ops: &[(&str, bool)] = &[
            ("a", true),
            ("b", true),
            ("a", true),
            ("c", true),
            ("b", false),
            ("b", true),
            ("a", false),
            ("a", true),
            ("c", true),
        ];
        for (id, add) in ops {
            if *add {
                selection.insert(course(id));
            } else {
                selection.remove(id);
            }
        }
        assert_eq!(selection.ids().collect::<Vec<_>>(), vec!["c", "b", "a"]);
        assert_eq!(selection.id_set().len(), selection.len());
    }

    #[test]
    fn test_deserialize_drops_duplicates() {
        let selection: SelectedCourses = serde_json::from_str(
            r#"[{"id":"a","title":"A"},{"id":"b","title":"B"},{"id":"a","title":"A again"}]"#,
        )
        .unwrap();
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.get("a").unwrap().title, "A");
    }
}
