//! Course domain model.

use serde::{Deserialize, Serialize};

/// A course as resolved by the catalog backend.
///
/// Identity is the `id`; two courses with the same id are the same course
/// regardless of title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Course {
    /// Catalog identifier (e.g. `py101`)
    pub id: String,
    /// Display title
    #[serde(alias = "name")]
    pub title: String,
}

impl Course {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_alias() {
        let course: Course = serde_json::from_str(r#"{"id":"py101","name":"Python 101"}"#).unwrap();
        assert_eq!(course, Course::new("py101", "Python 101"));
    }
}
