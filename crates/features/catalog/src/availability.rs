use crate::error::CatalogError;
use registrar_domain::Course;

/// Seat accounting for a course.
///
/// Owns every change to `Course::enrolled`. Increments refuse to pass capacity even
/// when the caller already checked; decrements saturate at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvailabilityTracker;

impl AvailabilityTracker {
    #[must_use]
    pub const fn is_available(course: &Course) -> bool {
        course.enrolled < course.capacity
    }

    /// Takes one seat.
    ///
    /// # Errors
    /// [`CatalogError::CourseFull`] when no seat is left; the course is unchanged.
    pub fn increment(course: &mut Course) -> Result<(), CatalogError> {
        if !Self::is_available(course) {
            return Err(CatalogError::CourseFull {
                message: format!("{} ({}/{})", course.code, course.enrolled, course.capacity).into(),
                context: None,
            });
        }
        course.enrolled += 1;
        Ok(())
    }

    /// Releases one seat; a counter already at zero stays there.
    pub fn decrement(course: &mut Course) {
        if course.enrolled == 0 {
            tracing::warn!(course_id = %course.id, "Enrollment counter already at zero");
            return;
        }
        course.enrolled -= 1;
    }
}
