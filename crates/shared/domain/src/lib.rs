//! # Domain Models
//!
//! Pure domain types for the registrar: [`Student`], [`Course`], [`Registration`], the
//! [`ScheduleSpec`] value type and the configuration tree.
//! Keep it lean: no I/O, networking, or heavy logic. Just data and simple helpers.

pub mod config;
mod course;
mod error;
pub mod index;
mod record;
mod registration;
mod schedule;
mod student;

pub use course::Course;
pub use error::{DomainError, DomainErrorExt};
pub use record::Record;
pub use registration::{Registration, RegistrationStatus};
pub use schedule::{ScheduleSpec, Weekdays};
pub use student::Student;

/// Timestamp type shared by every record.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
