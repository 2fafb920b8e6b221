//! Course catalog.
//!
//! [`CourseCatalog`] manages course records; [`AvailabilityTracker`] owns the
//! `enrolled` counter arithmetic that the enrollment engine relies on.

mod availability;
mod catalog;
mod error;

pub use availability::AvailabilityTracker;
pub use catalog::{CourseCatalog, NewCourse};
pub use error::{CatalogError, CatalogErrorExt};
