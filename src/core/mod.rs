pub mod controller;
pub mod generation;
pub mod render;

pub use crate::domain::model::{
    Course, CourseEntry, CourseOption, PaneError, PrerequisiteMatch, ResultPane, Subject,
    SubjectOption,
};
pub use crate::domain::ports::{CatalogApi, ConfigProvider, SelectorView};
pub use crate::utils::error::Result;
