use registrar_enrollment::EnrollmentError;
use registrar_storage::StorageError;
use std::borrow::Cow;

#[registrar_derive::registrar_error]
pub enum RegistrarError {
    #[error("Storage bootstrap failed{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Enrollment bootstrap failed{}: {source}", format_context(.context))]
    Enrollment { source: EnrollmentError, context: Option<Cow<'static, str>> },

    #[error("Internal registrar error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
