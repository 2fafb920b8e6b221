//! # Enrollment
//!
//! The registration consistency engine. It owns every change to a course's `enrolled`
//! counter and to registration status, and keeps the two in agreement:
//!
//! * `enrolled` equals the number of `ENROLLED` registrations of the course;
//! * `enrolled` never exceeds `capacity`;
//! * a `(student, course)` pair has at most one active registration.
//!
//! Mutations for the same student or the same course are serialized through
//! [`registrar_kernel::KeyedLocks`]. Counter drift left behind by a crash between the two
//! writes of an operation is repaired by [`RegistrationEngine::reconcile`].
//!
//! ```rust,ignore
//! let engine = RegistrationEngine::with_store(store.clone());
//! let registration = engine.enroll("S001", "C001").await?;
//! assert!(engine.drop("S001", "C001").await?);
//! ```

mod conflict;
mod engine;
mod error;
mod reconcile;

pub use conflict::{ConflictChecker, LiteralConflict, OverlapConflict, checker_for};
pub use engine::{EngineInner, RegistrationEngine};
pub use error::{EnrollmentError, EnrollmentErrorExt};
pub use reconcile::{CounterCorrection, ReconcileReport};
