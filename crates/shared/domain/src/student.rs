use crate::index::{STUDENT_BY_EMAIL, STUDENT_BY_USERNAME};
use crate::{Record, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A student account.
///
/// `email` and `username` are unique across all students; the stores index both.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    /// Encoded credential hash, never the plaintext password.
    pub password_hash: String,
    pub major: String,
    pub year: u8,
    pub gpa: f64,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Student {
    /// Display name, `"<first> <last>"`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Debug for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Student")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("major", &self.major)
            .field("year", &self.year)
            .field("gpa", &self.gpa)
            .finish_non_exhaustive()
    }
}

impl Record for Student {
    const TABLE: &'static str = "students";

    fn id(&self) -> &str {
        &self.id
    }

    fn index_entries(&self) -> Vec<(&'static str, String)> {
        vec![(STUDENT_BY_USERNAME, self.username.clone()), (STUDENT_BY_EMAIL, self.email.clone())]
    }
}
