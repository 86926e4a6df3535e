use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EnrollmentStatus;

/// A ledger row: the relationship between one student and one class offering.
///
/// At most one row exists per `(student_id, class_id)`; re-enrolling after a
/// drop reactivates this row instead of inserting another.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Enrollment {
    pub id: String,
    pub student_id: String,
    pub class_id: String,
    pub status: EnrollmentStatus,
    pub semester: Option<String>,
    pub score_breakdown: Vec<ScoreEntry>,
    pub final_score: Option<f64>,
    pub letter_grade: Option<String>,
    /// 0–4 scale.
    pub grade_point: Option<f64>,
    pub graded_by: Option<String>,
    pub graded_at: Option<DateTime<Utc>>,
    pub registered_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One weighted score component, stamped with the grader who recorded it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ScoreEntry {
    pub label: String,
    pub score: f64,
    pub max_score: Option<f64>,
    pub weight: Option<f64>,
    pub recorded_by: String,
    pub recorded_at: DateTime<Utc>,
}
