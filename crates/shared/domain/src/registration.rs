use crate::index::{REGISTRATION_BY_COURSE, REGISTRATION_BY_STUDENT};
use crate::{Record, Timestamp};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Lifecycle state of a [`Registration`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    Enrolled,
    Dropped,
    Waitlisted,
}

/// A student's registration in a course.
///
/// A `(student_id, course_id)` pair may accumulate several historical registrations,
/// but at most one of them is [`RegistrationStatus::Enrolled`] at any time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub status: RegistrationStatus,
    pub grade: Option<String>,
    pub registered_at: Timestamp,
    pub dropped_at: Option<Timestamp>,
}

impl Registration {
    /// Active means [`RegistrationStatus::Enrolled`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == RegistrationStatus::Enrolled
    }
}

impl Record for Registration {
    const TABLE: &'static str = "registrations";

    fn id(&self) -> &str {
        &self.id
    }

    fn index_entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (REGISTRATION_BY_STUDENT, self.student_id.clone()),
            (REGISTRATION_BY_COURSE, self.course_id.clone()),
        ]
    }
}
