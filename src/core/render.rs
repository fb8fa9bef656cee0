use crate::domain::model::{Course, CourseOption, PaneError, PrerequisiteMatch, ResultPane};
use std::fmt;

pub const PLACEHOLDER_LABEL: &str = "Select a course";
pub const NO_TITLE_LABEL: &str = "No Title Available";
pub const EMPTY_NOTICE: &str = "No courses found that list this as a prerequisite.";
pub const GENERIC_SEARCH_ERROR: &str = "An error occurred while searching for prerequisites.";
pub const MISSING_SUBJECT_URL: &str = "No subject URL provided";

pub fn course_label(course: &Course) -> String {
    format!(
        "{} {} - {}",
        course.name,
        course.number,
        course
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(NO_TITLE_LABEL)
    )
}

pub fn course_option(course: &Course) -> CourseOption {
    CourseOption {
        value: course.number.clone(),
        label: course_label(course),
        course_name: course.name.clone(),
        course_number: course.number.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedItem {
    Notice(String),
    Entry {
        heading: String,
        title: Option<String>,
        prerequisites: String,
    },
}

impl From<&PrerequisiteMatch> for RenderedItem {
    fn from(m: &PrerequisiteMatch) -> Self {
        RenderedItem::Entry {
            heading: format!("{} {}", m.subject, m.number),
            title: m.title.clone().filter(|t| !t.is_empty()),
            prerequisites: format!("Prerequisites: {}", m.prereq_text),
        }
    }
}

impl fmt::Display for RenderedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderedItem::Notice(text) => write!(f, "{}", text),
            RenderedItem::Entry {
                heading,
                title,
                prerequisites,
            } => {
                writeln!(f, "{}", heading)?;
                if let Some(title) = title {
                    writeln!(f, "  {}", title)?;
                }
                write!(f, "  {}", prerequisites)
            }
        }
    }
}

/// Idle and Loading render nothing.
pub fn render_pane(pane: &ResultPane) -> Vec<RenderedItem> {
    match pane {
        ResultPane::Idle | ResultPane::Loading => Vec::new(),
        ResultPane::Empty => vec![RenderedItem::Notice(EMPTY_NOTICE.to_string())],
        ResultPane::Populated(matches) => matches.iter().map(RenderedItem::from).collect(),
        ResultPane::Errored(PaneError::ServerReported(message)) => {
            vec![RenderedItem::Notice(message.clone())]
        }
        ResultPane::Errored(PaneError::Transport(message)) => {
            vec![RenderedItem::Notice(format!("Error: {}", message))]
        }
    }
}
