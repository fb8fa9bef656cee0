use crate::core::render::{render_pane, RenderedItem, PLACEHOLDER_LABEL};
use crate::domain::model::{CourseEntry, CourseOption, ResultPane, SubjectOption};
use crate::domain::ports::SelectorView;
use crate::utils::error::{CatalogError, Result};

/// In-memory selection state: both controls, the loading indicator, the
/// result pane and any pending notifications.
#[derive(Debug, Clone, Default)]
pub struct SelectorState {
    subjects: Vec<SubjectOption>,
    courses: Vec<CourseEntry>,
    selected_course: Option<usize>,
    loading: bool,
    results: ResultPane,
    notifications: Vec<String>,
}

impl SelectorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subjects(&self) -> &[SubjectOption] {
        &self.subjects
    }

    pub fn course_entries(&self) -> &[CourseEntry] {
        &self.courses
    }

    pub fn course_options(&self) -> impl Iterator<Item = &CourseOption> {
        self.courses.iter().filter_map(CourseEntry::as_course)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn results(&self) -> &ResultPane {
        &self.results
    }

    pub fn rendered_results(&self) -> Vec<RenderedItem> {
        render_pane(&self.results)
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notifications)
    }

    /// Label of an entry as shown in the course control.
    pub fn entry_label(entry: &CourseEntry) -> &str {
        match entry {
            CourseEntry::Placeholder => PLACEHOLDER_LABEL,
            CourseEntry::Course(option) => &option.label,
        }
    }

    /// 以顯示名稱（不分大小寫）或 URL 找出已提供的學科
    pub fn find_subject(&self, query: &str) -> Option<&SubjectOption> {
        let query = query.trim();
        self.subjects
            .iter()
            .find(|s| s.value == query)
            .or_else(|| {
                self.subjects
                    .iter()
                    .find(|s| s.label.eq_ignore_ascii_case(query))
            })
    }

    /// Index into [`course_entries`](Self::course_entries) of the course with
    /// this number.
    pub fn find_course(&self, number: &str) -> Option<usize> {
        let number = number.trim();
        self.courses.iter().position(|entry| {
            entry
                .as_course()
                .is_some_and(|option| option.course_number == number)
        })
    }

    /// 選取課程；placeholder 與超出範圍的索引都無法選取
    pub fn select_course(&mut self, index: usize) -> Result<&CourseOption> {
        match self.courses.get(index) {
            Some(CourseEntry::Course(_)) => {
                self.selected_course = Some(index);
                self.selected_course()
            }
            _ => Err(CatalogError::NoCourseSelected),
        }
    }

    pub fn selected_course(&self) -> Result<&CourseOption> {
        self.selected_course
            .and_then(|index| self.courses.get(index))
            .and_then(CourseEntry::as_course)
            .ok_or(CatalogError::NoCourseSelected)
    }
}

impl SelectorView for SelectorState {
    fn replace_subject_options(&mut self, options: Vec<SubjectOption>) {
        self.subjects = options;
    }

    fn subject_options(&self) -> &[SubjectOption] {
        &self.subjects
    }

    fn reset_course_options(&mut self) {
        self.courses = vec![CourseEntry::Placeholder];
        self.selected_course = None;
    }

    fn append_course_option(&mut self, option: CourseOption) {
        self.courses.push(CourseEntry::Course(option));
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }

    fn set_loading(&mut self, visible: bool) {
        self.loading = visible;
    }

    fn show_results(&mut self, pane: ResultPane) {
        self.results = pane;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::course_option;
    use crate::domain::model::Course;

    fn state_with_courses() -> SelectorState {
        let mut state = SelectorState::new();
        state.replace_subject_options(vec![SubjectOption {
            value: "https://cat/cpsc.html".to_string(),
            label: "Computer Science".to_string(),
        }]);
        state.reset_course_options();
        for number in ["231", "331"] {
            state.append_course_option(course_option(&Course {
                name: "Computer Science".to_string(),
                number: number.to_string(),
                title: None,
                url: None,
            }));
        }
        state
    }

    #[test]
    fn test_placeholder_is_first_and_disabled() {
        let state = state_with_courses();
        let entries = state.course_entries();

        assert_eq!(entries.len(), 3);
        assert!(entries[0].is_disabled());
        assert_eq!(SelectorState::entry_label(&entries[0]), "Select a course");
        assert!(state.selected_course().is_err());
    }

    #[test]
    fn test_select_course_recovers_structured_attributes() {
        let mut state = state_with_courses();
        let index = state.find_course("331").unwrap();

        let selected = state.select_course(index).unwrap();

        assert_eq!(selected.course_name, "Computer Science");
        assert_eq!(selected.course_number, "331");
    }

    #[test]
    fn test_placeholder_cannot_be_selected() {
        let mut state = state_with_courses();
        assert!(matches!(
            state.select_course(0),
            Err(CatalogError::NoCourseSelected)
        ));
        assert!(matches!(
            state.select_course(42),
            Err(CatalogError::NoCourseSelected)
        ));
    }

    #[test]
    fn test_reset_clears_selection() {
        let mut state = state_with_courses();
        state.select_course(1).unwrap();
        state.reset_course_options();

        assert!(state.selected_course().is_err());
        assert_eq!(state.course_options().count(), 0);
    }

    #[test]
    fn test_find_subject_by_label_or_url() {
        let state = state_with_courses();
        assert!(state.find_subject("computer science").is_some());
        assert!(state.find_subject("https://cat/cpsc.html").is_some());
        assert!(state.find_subject("Biology").is_none());
    }

    #[test]
    fn test_take_notifications_drains() {
        let mut state = SelectorState::new();
        state.notify("Failed to fetch data");
        assert_eq!(state.take_notifications(), vec!["Failed to fetch data"]);
        assert!(state.notifications().is_empty());
    }
}
