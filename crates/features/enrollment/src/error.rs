use registrar_catalog::CatalogError;
use registrar_storage::StorageError;
use std::borrow::Cow;

/// A specialized [`EnrollmentError`] enum of this crate.
///
/// Every variant is recoverable and meant for the caller; none is process-fatal.
#[registrar_derive::registrar_error]
pub enum EnrollmentError {
    #[error("Student not found{}: {message}", format_context(.context))]
    StudentNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Course not found{}: {message}", format_context(.context))]
    CourseNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Already registered{}: {message}", format_context(.context))]
    AlreadyRegistered { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Course is full{}: {message}", format_context(.context))]
    CourseFull { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Schedule conflict{}: {message}", format_context(.context))]
    ScheduleConflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Unknown registration id.
    #[error("Registration not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The store failed on a path that must not guess.
    #[error("Store unavailable{}: {source}", format_context(.context))]
    StoreUnavailable { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Internal enrollment error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<CatalogError> for EnrollmentError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CourseFull { message, context } => Self::CourseFull { message, context },
            CatalogError::Store { source, context } => Self::StoreUnavailable { source, context },
            CatalogError::NotFound { message, context } => Self::CourseNotFound { message, context },
            other => Self::Internal { message: other.to_string().into(), context: None },
        }
    }
}
