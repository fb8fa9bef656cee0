use crate::adapters::output::{write_matches, OutputFormat};
use crate::adapters::view::SelectorState;
use crate::core::controller::CascadingSelector;
use crate::domain::model::{CourseOption, ResultPane};
use crate::domain::ports::CatalogApi;
use crate::utils::error::{CatalogError, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// CLI 工作階段：控制器加上記憶體中的選單狀態
pub struct Session<A: CatalogApi> {
    selector: CascadingSelector<A, SelectorState>,
}

impl<A: CatalogApi> Session<A> {
    pub fn new(api: A) -> Self {
        Self {
            selector: CascadingSelector::new(api, SelectorState::new()),
        }
    }

    pub fn selector(&self) -> &CascadingSelector<A, SelectorState> {
        &self.selector
    }

    pub async fn list_subjects<W: Write>(&self, out: &mut W) -> Result<()> {
        self.load_subjects().await?;
        let subjects = self.selector.view().subjects().to_vec();
        for subject in subjects {
            writeln!(out, "{}\t{}", subject.label, subject.value)?;
        }
        Ok(())
    }

    pub async fn list_courses<W: Write>(&self, subject: &str, out: &mut W) -> Result<()> {
        self.load_subjects().await?;
        self.load_courses_for(subject).await?;
        let labels: Vec<String> = self
            .selector
            .view()
            .course_entries()
            .iter()
            .filter(|entry| !entry.is_disabled())
            .map(|entry| SelectorState::entry_label(entry).to_string())
            .collect();
        for label in labels {
            writeln!(out, "{}", label)?;
        }
        Ok(())
    }

    /// Runs the whole cascade for one course and writes the pane in `format`.
    pub async fn show_prerequisites<W: Write>(
        &self,
        subject: &str,
        number: &str,
        format: OutputFormat,
        out: &mut W,
    ) -> Result<ResultPane> {
        self.load_subjects().await?;
        self.load_courses_for(subject).await?;

        let course = {
            let mut view = self.selector.view();
            let index = view
                .find_course(number)
                .ok_or_else(|| CatalogError::ValidationError {
                    message: format!("Course {} is not offered by {}", number, subject),
                })?;
            view.select_course(index)?.clone()
        };

        let pane = self.selector.load_prerequisite_matches(&course).await?;
        write_matches(&pane, format, &mut *out)?;
        Ok(pane)
    }

    /// 互動模式：逐行讀取選擇，直到輸入 `q` 或輸入結束
    pub async fn browse<R, W>(&self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();

        self.load_subjects().await?;
        let subjects = self.selector.view().subjects().to_vec();
        if subjects.is_empty() {
            writeln!(out, "The backend offered no subjects.")?;
            return Ok(());
        }

        loop {
            for (i, subject) in subjects.iter().enumerate() {
                writeln!(out, "{:>3}) {}", i + 1, subject.label)?;
            }
            let Some(choice) = prompt(&mut lines, out, "Subject (q to quit): ").await? else {
                break;
            };
            let Some(subject) = menu_choice(&choice, subjects.len()).map(|n| &subjects[n - 1]) else {
                writeln!(out, "! Invalid subject choice: {}", choice)?;
                continue;
            };

            if self.selector.load_courses(&subject.value).await.is_err() {
                self.print_notifications(out)?;
                continue;
            }

            let courses: Vec<CourseOption> =
                self.selector.view().course_options().cloned().collect();
            if courses.is_empty() {
                writeln!(out, "No courses listed for {}.", subject.label)?;
                continue;
            }
            for (i, course) in courses.iter().enumerate() {
                writeln!(out, "{:>3}) {}", i + 1, course.label)?;
            }

            let Some(choice) = prompt(&mut lines, out, "Course (b to go back, q to quit): ").await?
            else {
                break;
            };
            if choice.eq_ignore_ascii_case("b") {
                continue;
            }
            let Some(number) = menu_choice(&choice, courses.len()) else {
                writeln!(out, "! Invalid course choice: {}", choice)?;
                continue;
            };
            // placeholder 佔第 0 個位置，選單編號即為課程選單中的索引
            let course = self.selector.view().select_course(number)?.clone();

            let pane = self.selector.load_prerequisite_matches(&course).await?;
            writeln!(out, "Courses requiring {} {}:", course.course_name, course.course_number)?;
            write_matches(&pane, OutputFormat::Text, &mut *out)?;
        }

        Ok(())
    }

    async fn load_subjects(&self) -> Result<usize> {
        let result = self.selector.load_subjects().await;
        self.discard_notifications();
        result
    }

    async fn load_courses_for(&self, subject: &str) -> Result<usize> {
        let subject_url = self
            .selector
            .view()
            .find_subject(subject)
            .map(|option| option.value.clone())
            .ok_or_else(|| CatalogError::ValidationError {
                message: format!("Unknown subject: {}", subject),
            })?;

        let result = self.selector.load_courses(&subject_url).await;
        self.discard_notifications();
        result
    }

    /// 一次性指令的錯誤會直接回傳給呼叫端，通知不需重複顯示
    fn discard_notifications(&self) {
        self.selector.view().take_notifications();
    }

    fn print_notifications<W: Write>(&self, out: &mut W) -> Result<()> {
        let notifications = self.selector.view().take_notifications();
        for message in notifications {
            writeln!(out, "! {}", message)?;
        }
        Ok(())
    }
}

async fn prompt<R, W>(
    lines: &mut tokio::io::Lines<R>,
    out: &mut W,
    text: &str,
) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{}", text)?;
    out.flush()?;

    match lines.next_line().await? {
        Some(line) if line.trim().eq_ignore_ascii_case("q") => Ok(None),
        Some(line) => Ok(Some(line.trim().to_string())),
        None => Ok(None),
    }
}

/// 1-based menu choice within `1..=len`.
fn menu_choice(choice: &str, len: usize) -> Option<usize> {
    choice
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_choice_is_one_based() {
        assert_eq!(menu_choice("1", 3), Some(1));
        assert_eq!(menu_choice(" 3 ", 3), Some(3));
        assert_eq!(menu_choice("0", 3), None);
        assert_eq!(menu_choice("4", 3), None);
        assert_eq!(menu_choice("x", 3), None);
    }
}
