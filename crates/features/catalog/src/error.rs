use registrar_storage::StorageError;
use std::borrow::Cow;

/// A specialized [`CatalogError`] enum of this crate.
#[registrar_derive::registrar_error]
pub enum CatalogError {
    #[error("Course code already exists{}: {message}", format_context(.context))]
    DuplicateCode { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Blank code, zero capacity, or a capacity below the current enrollment.
    #[error("Invalid course{}: {message}", format_context(.context))]
    InvalidCourse { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Course not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Raised by the availability tracker when a counter would pass capacity.
    #[error("Course is full{}: {message}", format_context(.context))]
    CourseFull { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The course still has active registrations.
    #[error("Course in use{}: {message}", format_context(.context))]
    CourseInUse { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Catalog store error{}: {source}", format_context(.context))]
    Store { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Internal catalog error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
