use std::borrow::Cow;

/// A specialized [`DomainError`] enum of this crate.
#[registrar_derive::registrar_error]
pub enum DomainError {
    /// The schedule descriptor could not be parsed into a [`crate::ScheduleSpec`].
    #[error("Invalid schedule{}: {message}", format_context(.context))]
    InvalidSchedule { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
