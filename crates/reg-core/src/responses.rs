//! Response types returned as JSON by `regctl` commands.
//!
//! Mutations return the updated entity projection together with any aggregate
//! they computed; listings return denormalized projections joined with their
//! class offering and course.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{ClassOffering, Course, Enrollment, Meeting, ScoreEntry, Student};
use crate::enums::{DeliveryMode, EnrollmentStatus, EntityType};
use crate::errors::ErrorKind;
use crate::gpa::GpaSummary;

/// Identifying fields of a student, embedded in other projections.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StudentSummary {
    pub id: String,
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&Student> for StudentSummary {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.clone(),
            student_number: student.student_number.clone(),
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
        }
    }
}

/// An enrollment with its class offering, course, and student resolved.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EnrollmentDetail {
    pub enrollment: Enrollment,
    pub class_offering: Option<ClassOffering>,
    pub course: Option<Course>,
    pub student: Option<StudentSummary>,
}

/// Response from `regctl enroll`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EnrollResponse {
    pub enrollment: EnrollmentDetail,
    /// `true` when a previously dropped row was reactivated.
    pub reenrolled: bool,
}

/// Response from `regctl drop`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DropResponse {
    pub enrollment: Enrollment,
    pub enrolled_count: u32,
}

/// Response from `regctl grade enter`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GradeResponse {
    pub enrollment: EnrollmentDetail,
    pub gpa: GpaSummary,
}

/// Response from GPA recomputation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GpaResponse {
    pub student: StudentSummary,
    #[serde(flatten)]
    pub summary: GpaSummary,
}

/// A student's own view of one enrollment's grades.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StudentGradeView {
    pub enrollment_id: String,
    pub class_code: Option<String>,
    pub course_code: Option<String>,
    pub course_title: Option<String>,
    pub credits: Option<u32>,
    pub semester: Option<String>,
    pub score_breakdown: Vec<ScoreEntry>,
    pub final_score: Option<f64>,
    pub letter_grade: Option<String>,
    pub grade_point: Option<f64>,
    pub status: EnrollmentStatus,
}

/// One row of a class gradebook.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ClassGradeView {
    pub enrollment_id: String,
    pub student_id: String,
    pub student_number: Option<String>,
    pub student_name: String,
    pub score_breakdown: Vec<ScoreEntry>,
    pub final_score: Option<f64>,
    pub letter_grade: Option<String>,
    pub grade_point: Option<f64>,
    pub status: EnrollmentStatus,
    pub graded_at: Option<DateTime<Utc>>,
}

/// One class in a student's weekly timetable.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TimetableEntry {
    pub enrollment_id: String,
    pub class_code: String,
    pub course_code: Option<String>,
    pub course_title: Option<String>,
    pub credits: Option<u32>,
    pub instructor_name: Option<String>,
    pub section: Option<String>,
    pub room: Option<String>,
    pub campus: Option<String>,
    pub mode: DeliveryMode,
    pub meetings: Vec<Meeting>,
    pub semester: Option<String>,
}

/// Response from `regctl timetable`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Timetable {
    pub semester: Option<String>,
    pub entries: Vec<TimetableEntry>,
}

/// An open class offering that still admits students.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AvailableOffering {
    pub class_offering: ClassOffering,
    pub course: Option<Course>,
    /// `None` when capacity is unlimited.
    pub remaining_seats: Option<u32>,
}

/// Pagination metadata.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(page: u32, limit: u32, total: u64) -> Self {
        let pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit as u64)
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Response from `regctl offering reconcile`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReconcileResponse {
    pub class_id: String,
    pub before: u32,
    pub after: u32,
}

/// Response from delete commands.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DeleteResponse {
    pub entity_type: EntityType,
    pub id: String,
    pub deleted: bool,
}

/// Structured failure printed by `regctl` for every recovered error.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FailureResponse {
    pub error: FailureBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FailureBody {
    pub kind: ErrorKind,
    pub status: u16,
    pub message: String,
}

impl FailureResponse {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error: FailureBody {
                kind,
                status: kind.http_status(),
                message: message.into(),
            },
        }
    }
}
