//! Secondary index names shared by the domain records and the entity stores.

pub const STUDENT_BY_USERNAME: &str = "student-by-username";
pub const STUDENT_BY_EMAIL: &str = "student-by-email";
pub const COURSE_BY_CODE: &str = "course-by-code";
pub const COURSE_BY_DEPARTMENT: &str = "course-by-department";
pub const REGISTRATION_BY_STUDENT: &str = "registration-by-student";
pub const REGISTRATION_BY_COURSE: &str = "registration-by-course";
