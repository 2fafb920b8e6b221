use crate::error::{CatalogError, CatalogErrorExt};
use registrar_domain::{Course, Registration, index};
use registrar_kernel::{Clock, KeyedLocks, SystemClock, safe_nanoid};
use registrar_storage::{EntityStore, StorageError};
use std::ops::Deref;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

/// Input for [`CourseCatalog::create_course`]. New courses start with no enrollments.
#[derive(Debug, Clone, Default)]
pub struct NewCourse {
    /// Fixed id, e.g. for imported data. A fresh id is generated when `None`.
    pub id: Option<String>,
    pub code: String,
    pub name: String,
    pub description: String,
    pub credits: u8,
    pub department: String,
    pub instructor: String,
    pub semester: String,
    pub year: u16,
    pub schedule: Option<String>,
    pub location: String,
    pub capacity: u32,
    pub prerequisites: Vec<String>,
}

#[derive(Debug)]
pub struct CatalogInner<S> {
    store: S,
    clock: Arc<dyn Clock>,
    locks: KeyedLocks,
    /// Serializes create/update so code uniqueness checks cannot interleave.
    writes: Mutex<()>,
}

/// Course catalog service.
///
/// Listings are tolerant reads: a failing store yields an empty list and a warning.
/// Point lookups and writes surface store errors.
#[derive(Debug)]
pub struct CourseCatalog<S> {
    inner: Arc<CatalogInner<S>>,
}

impl<S> Clone for CourseCatalog<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S> Deref for CourseCatalog<S> {
    type Target = CatalogInner<S>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<S: EntityStore> CourseCatalog<S> {
    /// `locks` must be the table shared with the enrollment engine so catalog edits
    /// never overwrite a concurrent counter change.
    pub fn new(store: S, clock: Arc<dyn Clock>, locks: KeyedLocks) -> Self {
        Self { inner: Arc::new(CatalogInner { store, clock, locks, writes: Mutex::new(()) }) }
    }

    pub fn with_store(store: S) -> Self {
        Self::new(store, Arc::new(SystemClock::new()), KeyedLocks::new())
    }

    /// Adds a course.
    ///
    /// A schedule that does not parse is stored as given and logged; conflict checks
    /// then fall back to comparing the raw text.
    ///
    /// # Errors
    /// [`CatalogError::InvalidCourse`] for a blank code or zero capacity,
    /// [`CatalogError::DuplicateCode`], or a store failure.
    #[instrument(skip(self, draft), fields(code = %draft.code))]
    pub async fn create_course(&self, draft: NewCourse) -> Result<Course, CatalogError> {
        if draft.code.trim().is_empty() {
            return Err(CatalogError::InvalidCourse { message: "course code must not be blank".into(), context: None });
        }
        if draft.capacity == 0 {
            return Err(CatalogError::InvalidCourse {
                message: format!("{}: capacity must be positive", draft.code).into(),
                context: None,
            });
        }

        let _guard = self.writes.lock().await;
        if self.find_by_code(&draft.code).await?.is_some() {
            return Err(CatalogError::DuplicateCode { message: draft.code.into(), context: None });
        }

        let id = draft.id.unwrap_or_else(|| safe_nanoid!());
        if self.store.get::<Course>(&id).await?.is_some() {
            return Err(CatalogError::InvalidCourse {
                message: format!("id '{id}' already in use").into(),
                context: None,
            });
        }

        let now = self.clock.now();
        let course = Course {
            id,
            code: draft.code,
            name: draft.name,
            description: draft.description,
            credits: draft.credits,
            department: draft.department,
            instructor: draft.instructor,
            semester: draft.semester,
            year: draft.year,
            schedule: draft.schedule,
            location: draft.location,
            capacity: draft.capacity,
            enrolled: 0,
            prerequisites: draft.prerequisites,
            created_at: now,
            updated_at: now,
        };
        warn_on_bad_schedule(&course);

        self.store.put(&course).await.context("Saving course")?;
        info!(course_id = %course.id, capacity = course.capacity, "Course created");
        Ok(course)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Course>, CatalogError> {
        Ok(self.store.get(id).await?)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Course>, CatalogError> {
        let matches: Vec<Course> = self.store.find_by_index(index::COURSE_BY_CODE, code).await?;
        Ok(matches.into_iter().next())
    }

    /// Courses of a department, ordered by id.
    pub async fn find_by_department(&self, department: &str) -> Vec<Course> {
        tolerant(self.store.find_by_index(index::COURSE_BY_DEPARTMENT, department).await, "department")
    }

    /// Every course, ordered by id.
    pub async fn list(&self) -> Vec<Course> {
        tolerant(self.store.scan_all().await, "list")
    }

    /// Courses with at least one open seat.
    pub async fn available(&self) -> Vec<Course> {
        self.list().await.into_iter().filter(Course::is_available).collect()
    }

    /// Case-insensitive substring match over name, code, instructor and department.
    pub async fn search(&self, term: &str) -> Vec<Course> {
        let needle = term.trim().to_lowercase();
        self.list()
            .await
            .into_iter()
            .filter(|course| {
                [&course.name, &course.code, &course.instructor, &course.department]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Replaces a course's descriptive fields and refreshes `updated_at`.
    ///
    /// `enrolled` is owned by the enrollment engine: the stored value is kept and the
    /// caller's is ignored.
    ///
    /// # Errors
    /// [`CatalogError::NotFound`], [`CatalogError::DuplicateCode`] when the new code is
    /// taken, [`CatalogError::InvalidCourse`] when capacity drops below the current
    /// enrollment, or a store failure.
    #[instrument(skip(self, course), fields(course_id = %course.id))]
    pub async fn update(&self, mut course: Course) -> Result<Course, CatalogError> {
        let _guard = self.writes.lock().await;
        let _seat_guard = self.locks.course(&course.id).await;

        let Some(existing) = self.find_by_id(&course.id).await? else {
            return Err(CatalogError::NotFound { message: course.id.into(), context: None });
        };

        if existing.code != course.code
            && self.find_by_code(&course.code).await?.is_some_and(|c| c.id != course.id)
        {
            return Err(CatalogError::DuplicateCode { message: course.code.into(), context: None });
        }
        if course.capacity == 0 || course.capacity < existing.enrolled {
            return Err(CatalogError::InvalidCourse {
                message: format!(
                    "capacity {} is below current enrollment {}",
                    course.capacity, existing.enrolled
                )
                .into(),
                context: Some(course.id.into()),
            });
        }

        course.enrolled = existing.enrolled;
        course.created_at = existing.created_at;
        course.updated_at = self.clock.now();
        if course.schedule != existing.schedule {
            warn_on_bad_schedule(&course);
        }

        self.store.put(&course).await.context("Updating course")?;
        info!("Course updated");
        Ok(course)
    }

    /// Removes a course that has no active registrations.
    ///
    /// # Errors
    /// [`CatalogError::CourseInUse`] while students are enrolled, or a store failure.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool, CatalogError> {
        let _seat_guard = self.locks.course(id).await;

        let registrations: Vec<Registration> =
            self.store.find_by_index(index::REGISTRATION_BY_COURSE, id).await?;
        let active = registrations.iter().filter(|r| r.is_active()).count();
        if active > 0 {
            return Err(CatalogError::CourseInUse {
                message: format!("{active} active registrations").into(),
                context: Some(id.to_owned().into()),
            });
        }

        let removed = self.store.delete::<Course>(id).await.context("Deleting course")?;
        if removed {
            info!(course_id = %id, "Course deleted");
        }
        Ok(removed)
    }
}

fn warn_on_bad_schedule(course: &Course) {
    if let Some(Err(err)) = course.schedule_spec() {
        warn!(course_id = %course.id, error = %err, "Schedule not parseable, conflicts fall back to exact text");
    }
}

fn tolerant(result: Result<Vec<Course>, StorageError>, query: &'static str) -> Vec<Course> {
    result.unwrap_or_else(|err| {
        warn!(query, error = %err, error.kind = err.kind(), "Catalog read failed, returning no courses");
        Vec::new()
    })
}
