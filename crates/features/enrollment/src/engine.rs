use crate::conflict::{ConflictChecker, OverlapConflict};
use crate::error::{EnrollmentError, EnrollmentErrorExt};
use registrar_catalog::AvailabilityTracker;
use registrar_domain::{Course, Registration, RegistrationStatus, Student, index};
use registrar_kernel::{Clock, KeyedLocks, SystemClock, safe_nanoid};
use registrar_storage::{EntityStore, StorageError};
use std::ops::Deref;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

#[derive(Debug)]
pub struct EngineInner<S> {
    pub(crate) store: S,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) conflicts: Arc<dyn ConflictChecker>,
    pub(crate) locks: KeyedLocks,
}

/// Registration consistency engine.
///
/// Keeps `Course::enrolled` equal to the number of active registrations of the course
/// and allows at most one active registration per `(student, course)` pair.
///
/// Every mutation holds the `student:<id>` key and then the `course:<id>` key for its
/// whole check-then-write sequence, so concurrent requests for the same course or the
/// same student are serialized while unrelated ones proceed in parallel.
///
/// The store offers no multi-record transactions. When the second of the two writes
/// fails, the first is rolled back; if the rollback fails too, the drift is logged and
/// left for [`RegistrationEngine::reconcile`].
#[derive(Debug)]
pub struct RegistrationEngine<S> {
    inner: Arc<EngineInner<S>>,
}

impl<S> Clone for RegistrationEngine<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S> Deref for RegistrationEngine<S> {
    type Target = EngineInner<S>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<S: EntityStore> RegistrationEngine<S> {
    pub fn new(
        store: S,
        clock: Arc<dyn Clock>,
        conflicts: Arc<dyn ConflictChecker>,
        locks: KeyedLocks,
    ) -> Self {
        Self { inner: Arc::new(EngineInner { store, clock, conflicts, locks }) }
    }

    /// System clock, overlap conflicts, private lock table.
    pub fn with_store(store: S) -> Self {
        Self::new(store, Arc::new(SystemClock::new()), Arc::new(OverlapConflict), KeyedLocks::new())
    }

    /// Enrolls a student in a course.
    ///
    /// Checks run in this order and the first failure wins, before anything is written:
    /// student exists, course exists, no active registration for the pair, a seat is
    /// free, no schedule conflict with the student's active courses.
    ///
    /// # Errors
    /// [`EnrollmentError::StudentNotFound`], [`EnrollmentError::CourseNotFound`],
    /// [`EnrollmentError::AlreadyRegistered`], [`EnrollmentError::CourseFull`],
    /// [`EnrollmentError::ScheduleConflict`], or [`EnrollmentError::StoreUnavailable`].
    #[instrument(skip(self))]
    pub async fn enroll(&self, student_id: &str, course_id: &str) -> Result<Registration, EnrollmentError> {
        let _student_guard = self.locks.student(student_id).await;
        let _course_guard = self.locks.course(course_id).await;

        self.require_student(student_id).await?;
        let mut course = self.require_course(course_id).await?;

        let active = self.active_of_student(student_id).await.context("Loading registrations")?;
        if active.iter().any(|r| r.course_id == course_id) {
            return Err(EnrollmentError::AlreadyRegistered {
                message: format!("{student_id} in {}", course.code).into(),
                context: None,
            });
        }

        if !AvailabilityTracker::is_available(&course) {
            return Err(EnrollmentError::CourseFull {
                message: format!("{} ({}/{})", course.code, course.enrolled, course.capacity).into(),
                context: None,
            });
        }

        let current = self.courses_of(&active).await.context("Loading current schedule")?;
        if let Some(clash) = self.conflicts.find_conflict(&current, &course) {
            return Err(EnrollmentError::ScheduleConflict {
                message: format!(
                    "{} ({}) clashes with {} ({})",
                    course.code,
                    course.schedule.as_deref().unwrap_or_default(),
                    clash.code,
                    clash.schedule.as_deref().unwrap_or_default()
                )
                .into(),
                context: None,
            });
        }

        let now = self.clock.now();
        AvailabilityTracker::increment(&mut course)?;
        course.updated_at = now;

        let registration = Registration {
            id: safe_nanoid!(),
            student_id: student_id.to_owned(),
            course_id: course_id.to_owned(),
            status: RegistrationStatus::Enrolled,
            grade: None,
            registered_at: now,
            dropped_at: None,
        };

        self.store.put(&registration).await.context("Saving registration")?;
        if let Err(err) = self.store.put(&course).await {
            self.undo_insert(&registration).await;
            return Err(EnrollmentError::StoreUnavailable {
                source: err,
                context: Some("Updating enrollment counter".into()),
            });
        }

        info!(
            registration_id = %registration.id,
            enrolled = course.enrolled,
            capacity = course.capacity,
            "Student enrolled"
        );
        Ok(registration)
    }

    /// Drops the student's active registration in a course.
    ///
    /// Returns `Ok(false)` when there is nothing to drop, so repeating a drop is safe.
    ///
    /// # Errors
    /// [`EnrollmentError::StoreUnavailable`] when the change cannot be persisted.
    #[instrument(skip(self))]
    pub async fn drop(&self, student_id: &str, course_id: &str) -> Result<bool, EnrollmentError> {
        let _student_guard = self.locks.student(student_id).await;
        let _course_guard = self.locks.course(course_id).await;

        let active = self.active_of_student(student_id).await.context("Loading registrations")?;
        let Some(mut registration) = active.into_iter().find(|r| r.course_id == course_id) else {
            info!("No active registration to drop");
            return Ok(false);
        };
        let course: Option<Course> = self.store.get(course_id).await.context("Loading course")?;

        let now = self.clock.now();
        registration.status = RegistrationStatus::Dropped;
        registration.dropped_at = Some(now);
        self.store.put(&registration).await.context("Saving dropped registration")?;

        let Some(mut course) = course else {
            warn!(registration_id = %registration.id, "Dropped registration of a course that no longer exists");
            return Ok(true);
        };

        AvailabilityTracker::decrement(&mut course);
        course.updated_at = now;
        if let Err(err) = self.store.put(&course).await {
            self.undo_drop(&mut registration).await;
            return Err(EnrollmentError::StoreUnavailable {
                source: err,
                context: Some("Updating enrollment counter".into()),
            });
        }

        info!(registration_id = %registration.id, enrolled = course.enrolled, "Student dropped");
        Ok(true)
    }

    /// Courses behind the student's active registrations, in registration order.
    ///
    /// Registrations whose course no longer resolves are skipped; a failing store
    /// yields what could be read and a warning.
    pub async fn student_courses(&self, student_id: &str) -> Vec<Course> {
        let active = match self.active_of_student(student_id).await {
            Ok(active) => active,
            Err(err) => {
                warn_read("student_courses", &err);
                return Vec::new();
            },
        };

        let mut courses = Vec::with_capacity(active.len());
        for registration in &active {
            match self.store.get::<Course>(&registration.course_id).await {
                Ok(Some(course)) => courses.push(course),
                Ok(None) => {
                    warn!(registration_id = %registration.id, course_id = %registration.course_id, "Registration refers to a missing course");
                },
                Err(err) => warn_read("student_courses", &err),
            }
        }
        courses
    }

    /// The student's active registrations, in registration order.
    pub async fn student_registrations(&self, student_id: &str) -> Vec<Registration> {
        self.active_of_student(student_id).await.unwrap_or_else(|err| {
            warn_read("student_registrations", &err);
            Vec::new()
        })
    }

    /// Active registrations of a course, in registration order.
    pub async fn course_registrations(&self, course_id: &str) -> Vec<Registration> {
        self.active_by(index::REGISTRATION_BY_COURSE, course_id).await.unwrap_or_else(|err| {
            warn_read("course_registrations", &err);
            Vec::new()
        })
    }

    /// Sets the grade of a registration, stored exactly as given. Touches nothing else.
    ///
    /// # Errors
    /// [`EnrollmentError::NotFound`] for an unknown id, or
    /// [`EnrollmentError::StoreUnavailable`].
    #[instrument(skip(self))]
    pub async fn update_grade(&self, registration_id: &str, grade: &str) -> Result<Registration, EnrollmentError> {
        let not_found = || EnrollmentError::NotFound { message: registration_id.to_owned().into(), context: None };

        let found: Option<Registration> = self.store.get(registration_id).await.context("Loading registration")?;
        let student_id = found.ok_or_else(not_found)?.student_id;

        // Re-read under the student key so a concurrent drop is not overwritten.
        let _student_guard = self.locks.student(&student_id).await;
        let mut registration: Registration = self
            .store
            .get(registration_id)
            .await
            .context("Loading registration")?
            .ok_or_else(not_found)?;

        registration.grade = Some(grade.to_owned());
        self.store.put(&registration).await.context("Saving grade")?;
        info!(student_id = %registration.student_id, course_id = %registration.course_id, "Grade recorded");
        Ok(registration)
    }

    async fn require_student(&self, student_id: &str) -> Result<Student, EnrollmentError> {
        self.store.get(student_id).await.context("Loading student")?.ok_or_else(|| {
            EnrollmentError::StudentNotFound { message: student_id.to_owned().into(), context: None }
        })
    }

    async fn require_course(&self, course_id: &str) -> Result<Course, EnrollmentError> {
        self.store.get(course_id).await.context("Loading course")?.ok_or_else(|| {
            EnrollmentError::CourseNotFound { message: course_id.to_owned().into(), context: None }
        })
    }

    async fn active_of_student(&self, student_id: &str) -> Result<Vec<Registration>, StorageError> {
        self.active_by(index::REGISTRATION_BY_STUDENT, student_id).await
    }

    pub(crate) async fn active_by(&self, index: &str, value: &str) -> Result<Vec<Registration>, StorageError> {
        let mut active: Vec<Registration> = self
            .store
            .find_by_index::<Registration>(index, value)
            .await?
            .into_iter()
            .filter(Registration::is_active)
            .collect();
        active.sort_by(|a, b| a.registered_at.cmp(&b.registered_at).then_with(|| a.id.cmp(&b.id)));
        Ok(active)
    }

    async fn courses_of(&self, registrations: &[Registration]) -> Result<Vec<Course>, StorageError> {
        let mut courses = Vec::with_capacity(registrations.len());
        for registration in registrations {
            if let Some(course) = self.store.get::<Course>(&registration.course_id).await? {
                courses.push(course);
            }
        }
        Ok(courses)
    }

    async fn undo_insert(&self, registration: &Registration) {
        match self.store.delete::<Registration>(&registration.id).await {
            Ok(_) => warn!(registration_id = %registration.id, "Enrollment rolled back"),
            Err(err) => error!(
                registration_id = %registration.id,
                error = %err,
                "Rollback failed, counter drift left for reconciliation"
            ),
        }
    }

    async fn undo_drop(&self, registration: &mut Registration) {
        registration.status = RegistrationStatus::Enrolled;
        registration.dropped_at = None;
        match self.store.put(&*registration).await {
            Ok(()) => warn!(registration_id = %registration.id, "Drop rolled back"),
            Err(err) => error!(
                registration_id = %registration.id,
                error = %err,
                "Rollback failed, counter drift left for reconciliation"
            ),
        }
    }
}

fn warn_read(operation: &'static str, err: &StorageError) {
    warn!(operation, error = %err, error.kind = err.kind(), "Store read failed, returning partial result");
}
