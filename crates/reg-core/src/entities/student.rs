use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Gender, StudentStatus};

/// A student record. `gpa` is a cached aggregate owned by the GPA aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Student {
    pub id: String,
    /// Institution-issued student number, unique.
    pub student_number: String,
    pub account_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Gender,
    pub cohort_year: Option<i32>,
    pub enrollment_year: Option<i32>,
    pub status: StudentStatus,
    pub is_active: bool,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub current_semester: Option<String>,
    pub gpa: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
