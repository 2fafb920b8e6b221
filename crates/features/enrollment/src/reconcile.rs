//! Counter repair.

use crate::engine::RegistrationEngine;
use crate::error::{EnrollmentError, EnrollmentErrorExt};
use registrar_domain::{Course, index};
use registrar_storage::EntityStore;
use tracing::{info, instrument, warn};

/// A course whose stored counter disagreed with its active registrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterCorrection {
    pub course_id: String,
    pub code: String,
    pub previous: u32,
    pub actual: u32,
}

/// Outcome of [`RegistrationEngine::reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub courses_checked: usize,
    pub corrections: Vec<CounterCorrection>,
}

impl ReconcileReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.corrections.is_empty()
    }
}

impl<S: EntityStore> RegistrationEngine<S> {
    /// Recomputes every course counter from its active registrations.
    ///
    /// Each course is re-read under its `course:<id>` key, so a concurrent enroll or drop
    /// cannot slip between the count and the write. Only drifted courses are written.
    /// Counts above capacity are clamped to capacity and logged.
    ///
    /// # Errors
    /// [`EnrollmentError::StoreUnavailable`] when a read or write fails. Corrections
    /// persisted before the failure stay in place.
    #[instrument(skip(self))]
    pub async fn reconcile(&self) -> Result<ReconcileReport, EnrollmentError> {
        let courses: Vec<Course> = self.store.scan_all().await.context("Scanning courses")?;
        let mut report = ReconcileReport { courses_checked: courses.len(), corrections: Vec::new() };

        for listed in courses {
            let _course_guard = self.locks.course(&listed.id).await;
            let Some(mut course) = self.store.get::<Course>(&listed.id).await.context("Loading course")? else {
                continue;
            };

            let active = self
                .active_by(index::REGISTRATION_BY_COURSE, &course.id)
                .await
                .context("Counting registrations")?;
            let counted = u32::try_from(active.len()).unwrap_or(u32::MAX);
            if counted > course.capacity {
                warn!(
                    course_id = %course.id,
                    code = %course.code,
                    active = counted,
                    capacity = course.capacity,
                    "Course is over capacity, clamping counter"
                );
            }

            let actual = counted.min(course.capacity);
            if actual == course.enrolled {
                continue;
            }

            let previous = course.enrolled;
            course.enrolled = actual;
            course.updated_at = self.clock.now();
            self.store.put(&course).await.context("Saving corrected counter")?;

            info!(course_id = %course.id, previous, actual, "Enrollment counter corrected");
            report.corrections.push(CounterCorrection {
                course_id: course.id,
                code: course.code,
                previous,
                actual,
            });
        }

        info!(
            checked = report.courses_checked,
            corrected = report.corrections.len(),
            "Reconciliation finished"
        );
        Ok(report)
    }
}
