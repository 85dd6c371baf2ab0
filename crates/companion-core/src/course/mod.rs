//! Course domain module.
//!
//! - `model`: the immutable `Course` identity
//! - `selection`: `SelectedCourses`, the ordered unique set that drives chat
//!   creation and history filtering

mod model;
mod selection;

pub use model::Course;
pub use selection::SelectedCourses;
