//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob. These types
//! provide schema validation for the most common detail shapes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detail for `AuditAction::StatusChanged` and `AuditAction::Dropped`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
    pub reason: Option<String>,
}

/// Detail for `AuditAction::Enrolled` and `AuditAction::Reenrolled`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EnrolledDetail {
    pub class_id: String,
    pub semester: Option<String>,
    pub enrolled_count: u32,
}

/// Detail for `AuditAction::Graded`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct GradedDetail {
    pub final_score: Option<f64>,
    pub letter_grade: Option<String>,
    pub grade_point: Option<f64>,
    pub components: u32,
}

/// Detail for `AuditAction::SeatsReconciled`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SeatsReconciledDetail {
    pub before: u32,
    pub after: u32,
}
