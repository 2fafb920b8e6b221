use crate::index::{COURSE_BY_CODE, COURSE_BY_DEPARTMENT};
use crate::{DomainError, Record, ScheduleSpec, Timestamp};
use serde::{Deserialize, Serialize};

/// A course section in the catalog.
///
/// `enrolled` is a denormalized counter of active registrations and must stay within
/// `0..=capacity`. Only the enrollment engine mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: String,
    pub credits: u8,
    pub department: String,
    pub instructor: String,
    pub semester: String,
    pub year: u16,
    /// Schedule descriptor, e.g. `"MWF 10:00-11:00"`.
    pub schedule: Option<String>,
    pub location: String,
    pub capacity: u32,
    pub enrolled: u32,
    pub prerequisites: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Course {
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.enrolled < self.capacity
    }

    #[must_use]
    pub const fn seats_left(&self) -> u32 {
        self.capacity.saturating_sub(self.enrolled)
    }

    /// Parses the schedule descriptor. `None` when the course has no schedule.
    pub fn schedule_spec(&self) -> Option<Result<ScheduleSpec, DomainError>> {
        self.schedule.as_deref().map(str::parse::<ScheduleSpec>)
    }
}

impl Record for Course {
    const TABLE: &'static str = "courses";

    fn id(&self) -> &str {
        &self.id
    }

    fn index_entries(&self) -> Vec<(&'static str, String)> {
        vec![(COURSE_BY_CODE, self.code.clone()), (COURSE_BY_DEPARTMENT, self.department.clone())]
    }
}
