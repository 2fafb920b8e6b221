use registrar_storage::StorageError;
use std::borrow::Cow;

/// A specialized [`IdentityError`] enum of this crate.
#[registrar_derive::registrar_error]
pub enum IdentityError {
    #[error("Username already taken{}: {message}", format_context(.context))]
    DuplicateUsername { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Email already registered{}: {message}", format_context(.context))]
    DuplicateEmail { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Student not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Missing or malformed account fields.
    #[error("Invalid account data{}: {message}", format_context(.context))]
    InvalidInput { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Salt generation or hashing failed.
    #[error("Credential error{}: {message}", format_context(.context))]
    Credential { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Account store error{}: {source}", format_context(.context))]
    Store { source: StorageError, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal identity error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
