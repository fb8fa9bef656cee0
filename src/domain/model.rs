use serde::{Deserialize, Serialize};

/// 學科：顯示名稱與後端使用的識別 URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub display_name: String,
    pub identifier_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// 先修條件文字中提到所選課程的課程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteMatch {
    pub subject: String,
    pub number: String,
    #[serde(default)]
    pub title: Option<String>,
    pub prereq_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectOption {
    pub value: String,
    pub label: String,
}

impl From<&Subject> for SubjectOption {
    fn from(subject: &Subject) -> Self {
        Self {
            value: subject.identifier_url.clone(),
            label: subject.display_name.clone(),
        }
    }
}

/// 課程選項：名稱與編號以獨立欄位保存，不從 label 反推
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseOption {
    pub value: String,
    pub label: String,
    pub course_name: String,
    pub course_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseEntry {
    Placeholder,
    Course(CourseOption),
}

impl CourseEntry {
    pub fn is_disabled(&self) -> bool {
        matches!(self, CourseEntry::Placeholder)
    }

    pub fn as_course(&self) -> Option<&CourseOption> {
        match self {
            CourseEntry::Placeholder => None,
            CourseEntry::Course(option) => Some(option),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneError {
    ServerReported(String),
    Transport(String),
}

/// Result pane: `Idle → Loading → {Empty, Populated, Errored}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultPane {
    #[default]
    Idle,
    Loading,
    Empty,
    Populated(Vec<PrerequisiteMatch>),
    Errored(PaneError),
}

impl ResultPane {
    pub fn matches(&self) -> &[PrerequisiteMatch] {
        match self {
            ResultPane::Populated(matches) => matches,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub subject_codes: String,
    pub courses: String,
    pub prerequisites: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            subject_codes: "subject-codes".to_string(),
            courses: "courses".to_string(),
            prerequisites: "all-courses-with-prerequisite".to_string(),
        }
    }
}
