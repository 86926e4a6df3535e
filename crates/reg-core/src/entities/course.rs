use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::CourseStatus;

/// A catalog course. `credits` weights the course in GPA aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Course {
    pub id: String,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub credits: u32,
    pub contact_hours: Option<u32>,
    pub subject_area: Option<String>,
    pub faculty: Option<String>,
    pub prerequisites: Vec<String>,
    pub syllabus_url: Option<String>,
    pub status: CourseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
