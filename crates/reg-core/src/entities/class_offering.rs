use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{DeliveryMode, OfferingStatus, Weekday};

/// A scheduled instance of a course with a seat capacity.
///
/// `capacity == 0` means unlimited. `enrolled_count` is written only by the
/// capacity controller and always mirrors the ledger's seat-holding rows.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClassOffering {
    pub id: String,
    pub class_code: String,
    pub course_id: String,
    pub semester: Option<String>,
    pub instructor_name: Option<String>,
    pub section: Option<String>,
    pub room: Option<String>,
    pub campus: Option<String>,
    pub mode: DeliveryMode,
    pub capacity: u32,
    pub enrolled_count: u32,
    pub status: OfferingStatus,
    pub meetings: Vec<Meeting>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClassOffering {
    /// Seats left, or `None` when capacity is unlimited.
    #[must_use]
    pub const fn remaining_seats(&self) -> Option<u32> {
        if self.capacity == 0 {
            None
        } else {
            Some(self.capacity.saturating_sub(self.enrolled_count))
        }
    }

    #[must_use]
    pub const fn has_open_seat(&self) -> bool {
        self.capacity == 0 || self.enrolled_count < self.capacity
    }
}

/// A weekly meeting slot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Meeting {
    pub day_of_week: Weekday,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub room: Option<String>,
    pub building: Option<String>,
}
