use crate::domain::model::{
    Course, CourseOption, Endpoints, PrerequisiteMatch, ResultPane, Subject, SubjectOption,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// The course-catalog backend.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Subjects in the order the backend lists them.
    async fn subjects(&self) -> Result<Vec<Subject>>;
    async fn courses(&self, subject_url: &str) -> Result<Vec<Course>>;
    async fn courses_with_prerequisite(
        &self,
        course_name: &str,
        course_number: &str,
    ) -> Result<Vec<PrerequisiteMatch>>;
}

/// Presentation surface driven by the controller.
pub trait SelectorView: Send {
    fn replace_subject_options(&mut self, options: Vec<SubjectOption>);
    fn subject_options(&self) -> &[SubjectOption];
    /// Leaves only the disabled, pre-selected placeholder.
    fn reset_course_options(&mut self);
    fn append_course_option(&mut self, option: CourseOption);
    /// Blocking notification (an alert in a browser).
    fn notify(&mut self, message: &str);
    fn set_loading(&mut self, visible: bool);
    fn show_results(&mut self, pane: ResultPane);
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
    fn endpoints(&self) -> &Endpoints;
}
