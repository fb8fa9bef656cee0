use crate::core::generation::{RequestGeneration, Ticket};
use crate::core::render::{course_option, GENERIC_SEARCH_ERROR, MISSING_SUBJECT_URL};
use crate::domain::model::{CourseOption, PaneError, ResultPane, SubjectOption};
use crate::domain::ports::{CatalogApi, SelectorView};
use crate::utils::error::{CatalogError, Result};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// 串接「學科 → 課程 → 先修條件」三個查詢的控制器
///
/// The view lock is only taken for short synchronous updates and never held
/// across an await, so operations of different kinds can be in flight at
/// once. Each kind keeps its own [`RequestGeneration`]; a response whose
/// ticket is no longer current is dropped without touching the view.
pub struct CascadingSelector<A: CatalogApi, V: SelectorView> {
    api: A,
    view: Mutex<V>,
    subjects_generation: RequestGeneration,
    courses_generation: RequestGeneration,
    prerequisites_generation: RequestGeneration,
}

impl<A: CatalogApi, V: SelectorView> CascadingSelector<A, V> {
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view: Mutex::new(view),
            subjects_generation: RequestGeneration::new(),
            courses_generation: RequestGeneration::new(),
            prerequisites_generation: RequestGeneration::new(),
        }
    }

    pub fn view(&self) -> MutexGuard<'_, V> {
        lock_view(&self.view)
    }

    pub async fn load_subjects(&self) -> Result<usize> {
        let ticket = self.subjects_generation.begin();
        tracing::debug!("Requesting subject catalog");

        let result = self.api.subjects().await;
        if !self.subjects_generation.is_current(ticket) {
            tracing::debug!("Discarding stale subject catalog response");
            return Err(CatalogError::Superseded {
                operation: "subjects",
            });
        }

        let mut view = self.view();
        match result {
            Ok(subjects) => {
                let options: Vec<SubjectOption> = subjects.iter().map(SubjectOption::from).collect();
                let count = options.len();
                view.replace_subject_options(options);
                tracing::info!("Loaded {} subjects", count);
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("Failed to load subjects: {}", e);
                view.notify(&e.user_friendly_message());
                Err(e)
            }
        }
    }

    pub async fn load_courses(&self, subject_url: &str) -> Result<usize> {
        if subject_url.trim().is_empty() {
            return Err(self.reject_selection(MISSING_SUBJECT_URL.to_string()));
        }

        let offered = self
            .view()
            .subject_options()
            .iter()
            .any(|option| option.value == subject_url);
        if !offered {
            return Err(self.reject_selection(format!(
                "Subject URL is not one of the offered subjects: {}",
                subject_url
            )));
        }

        let ticket = self.courses_generation.begin();
        tracing::debug!("Requesting courses for {}", subject_url);

        let result = self.api.courses(subject_url).await;
        if !self.courses_generation.is_current(ticket) {
            tracing::debug!("Discarding stale course list for {}", subject_url);
            return Err(CatalogError::Superseded {
                operation: "courses",
            });
        }

        let mut view = self.view();
        view.reset_course_options();
        match result {
            Ok(courses) => {
                for course in &courses {
                    view.append_course_option(course_option(course));
                }
                tracing::info!("Loaded {} courses for {}", courses.len(), subject_url);
                Ok(courses.len())
            }
            Err(e) => {
                tracing::warn!("Failed to load courses for {}: {}", subject_url, e);
                view.notify(&e.user_friendly_message());
                Err(e)
            }
        }
    }

    /// Returns the terminal pane. The loading indicator is hidden on every
    /// exit path, including cancellation of this future.
    pub async fn load_prerequisite_matches(&self, course: &CourseOption) -> Result<ResultPane> {
        let ticket = self.prerequisites_generation.begin();
        {
            let mut view = self.view();
            view.set_loading(true);
            view.show_results(ResultPane::Loading);
        }
        let mut cleanup = LoadingGuard {
            view: &self.view,
            generation: &self.prerequisites_generation,
            ticket,
            settled: false,
        };

        tracing::debug!(
            "Searching courses that require {} {}",
            course.course_name,
            course.course_number
        );
        let result = self
            .api
            .courses_with_prerequisite(&course.course_name, &course.course_number)
            .await;

        let pane = match result {
            Ok(matches) if matches.is_empty() => ResultPane::Empty,
            Ok(matches) => ResultPane::Populated(matches),
            Err(CatalogError::Server { message, .. }) if message.trim().is_empty() => {
                ResultPane::Errored(PaneError::ServerReported(GENERIC_SEARCH_ERROR.to_string()))
            }
            Err(CatalogError::Server { message, .. }) => {
                ResultPane::Errored(PaneError::ServerReported(message))
            }
            Err(e) => {
                tracing::warn!("Prerequisite search failed: {}", e);
                ResultPane::Errored(PaneError::Transport(e.to_string()))
            }
        };

        if !self.prerequisites_generation.is_current(ticket) {
            tracing::debug!(
                "Discarding stale prerequisite results for {} {}",
                course.course_name,
                course.course_number
            );
            return Err(CatalogError::Superseded {
                operation: "prerequisites",
            });
        }

        tracing::info!(
            "Prerequisite search for {} {} finished: {} matches",
            course.course_name,
            course.course_number,
            pane.matches().len()
        );
        self.view().show_results(pane.clone());
        cleanup.settled = true;
        Ok(pane)
    }

    fn reject_selection(&self, message: String) -> CatalogError {
        tracing::warn!("Rejected subject selection: {}", message);
        self.view().notify(&message);
        CatalogError::ValidationError { message }
    }
}

fn lock_view<V>(view: &Mutex<V>) -> MutexGuard<'_, V> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 離開查詢時隱藏載入指示；已被較新的查詢取代時交由新查詢負責
///
/// A current lookup that ends without showing a terminal pane (cancelled or
/// panicked) puts the pane back to `Idle` so it never stays `Loading`.
struct LoadingGuard<'a, V: SelectorView> {
    view: &'a Mutex<V>,
    generation: &'a RequestGeneration,
    ticket: Ticket,
    settled: bool,
}

impl<V: SelectorView> Drop for LoadingGuard<'_, V> {
    fn drop(&mut self) {
        if !self.generation.is_current(self.ticket) {
            return;
        }
        let mut view = lock_view(self.view);
        if !self.settled {
            view.show_results(ResultPane::Idle);
        }
        view.set_loading(false);
    }
}
