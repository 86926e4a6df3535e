//! Status enums, roles, entity types, and actions for Registrar.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `EnrollmentStatus` carries the ledger state machine: `allowed_next_states()`
//! enforces valid transitions and `holds_seat()` decides which rows count
//! against a class offering's capacity.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Role carried by an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AccountStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Pending,
    Active,
    Suspended,
}

impl AccountStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StudentStatus
// ---------------------------------------------------------------------------

/// Academic standing of a student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    Active,
    OnLeave,
    Suspended,
    Graduated,
    Alumni,
}

impl StudentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnLeave => "on_leave",
            Self::Suspended => "suspended",
            Self::Graduated => "graduated",
            Self::Alumni => "alumni",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    Undisclosed,
}

impl Gender {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
            Self::Undisclosed => "undisclosed",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CourseStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    Active,
    Inactive,
}

impl CourseStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OfferingStatus
// ---------------------------------------------------------------------------

/// Lifecycle of a class offering. Only `Open` offerings are listed as
/// available to students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OfferingStatus {
    Scheduled,
    Open,
    Closed,
    Cancelled,
}

impl OfferingStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OfferingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DeliveryMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    OnCampus,
    Online,
    Hybrid,
}

impl DeliveryMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnCampus => "on_campus",
            Self::Online => "online",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Weekday
// ---------------------------------------------------------------------------

/// Day of a class meeting. Declaration order is calendar order, which the
/// timetable projection sorts by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EnrollmentStatus
// ---------------------------------------------------------------------------

/// Status of an enrollment row in the ledger.
///
/// ```text
/// registered ⇄ dropped
/// registered → completed          (grading only; terminal)
/// registered ⇄ waitlist → dropped  (administrative)
/// registered ⇄ auditing → dropped  (administrative)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Registered,
    Waitlist,
    Dropped,
    Completed,
    Auditing,
}

impl EnrollmentStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Registered => &[Self::Dropped, Self::Completed, Self::Waitlist, Self::Auditing],
            Self::Waitlist | Self::Auditing => &[Self::Registered, Self::Dropped],
            Self::Dropped => &[Self::Registered],
            Self::Completed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether a row in this state occupies one of the offering's seats.
    #[must_use]
    pub const fn holds_seat(self) -> bool {
        matches!(self, Self::Registered | Self::Auditing | Self::Completed)
    }

    /// Whether a grade may be entered for a row in this state. Re-grading a
    /// completed row keeps it completed.
    #[must_use]
    pub const fn is_gradable(self) -> bool {
        matches!(self, Self::Registered | Self::Completed)
    }

    /// Statuses whose graded rows feed the GPA aggregate.
    pub const GPA_ELIGIBLE: [Self; 2] = [Self::Completed, Self::Registered];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Waitlist => "waitlist",
            Self::Dropped => "dropped",
            Self::Completed => "completed",
            Self::Auditing => "auditing",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
    Enrolled,
    Reenrolled,
    Dropped,
    StatusChanged,
    Graded,
    GpaRecomputed,
    SeatsReconciled,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Enrolled => "enrolled",
            Self::Reenrolled => "reenrolled",
            Self::Dropped => "dropped",
            Self::StatusChanged => "status_changed",
            Self::Graded => "graded",
            Self::GpaRecomputed => "gpa_recomputed",
            Self::SeatsReconciled => "seats_reconciled",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Entity types, used by the audit trail and `NotFound` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Account,
    Student,
    Course,
    ClassOffering,
    Enrollment,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Student => "student",
            Self::Course => "course",
            Self::ClassOffering => "class_offering",
            Self::Enrollment => "enrollment",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EnrollmentStatus::Registered, EnrollmentStatus::Dropped, true)]
    #[case(EnrollmentStatus::Dropped, EnrollmentStatus::Registered, true)]
    #[case(EnrollmentStatus::Registered, EnrollmentStatus::Completed, true)]
    #[case(EnrollmentStatus::Registered, EnrollmentStatus::Waitlist, true)]
    #[case(EnrollmentStatus::Waitlist, EnrollmentStatus::Registered, true)]
    #[case(EnrollmentStatus::Auditing, EnrollmentStatus::Dropped, true)]
    #[case(EnrollmentStatus::Completed, EnrollmentStatus::Dropped, false)]
    #[case(EnrollmentStatus::Completed, EnrollmentStatus::Registered, false)]
    #[case(EnrollmentStatus::Dropped, EnrollmentStatus::Completed, false)]
    #[case(EnrollmentStatus::Dropped, EnrollmentStatus::Dropped, false)]
    #[case(EnrollmentStatus::Waitlist, EnrollmentStatus::Completed, false)]
    fn enrollment_transitions(
        #[case] from: EnrollmentStatus,
        #[case] to: EnrollmentStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed, "{from} -> {to}");
    }

    #[rstest]
    #[case(EnrollmentStatus::Registered, true)]
    #[case(EnrollmentStatus::Auditing, true)]
    #[case(EnrollmentStatus::Completed, true)]
    #[case(EnrollmentStatus::Waitlist, false)]
    #[case(EnrollmentStatus::Dropped, false)]
    fn seat_holding_statuses(#[case] status: EnrollmentStatus, #[case] holds: bool) {
        assert_eq!(status.holds_seat(), holds);
    }

    #[test]
    fn completed_is_terminal() {
        assert!(EnrollmentStatus::Completed.allowed_next_states().is_empty());
    }

    #[test]
    fn only_registered_and_completed_are_gradable() {
        let gradable: Vec<_> = [
            EnrollmentStatus::Registered,
            EnrollmentStatus::Waitlist,
            EnrollmentStatus::Dropped,
            EnrollmentStatus::Completed,
            EnrollmentStatus::Auditing,
        ]
        .into_iter()
        .filter(|s| s.is_gradable())
        .collect();
        assert_eq!(
            gradable,
            vec![EnrollmentStatus::Registered, EnrollmentStatus::Completed]
        );
    }

    #[test]
    fn as_str_matches_serde() {
        for status in [
            EnrollmentStatus::Registered,
            EnrollmentStatus::Waitlist,
            EnrollmentStatus::Dropped,
            EnrollmentStatus::Completed,
            EnrollmentStatus::Auditing,
        ] {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json.as_str(), Some(status.as_str()));
        }
        let json = serde_json::to_value(OfferingStatus::Cancelled).unwrap();
        assert_eq!(json.as_str(), Some("cancelled"));
        let json = serde_json::to_value(StudentStatus::OnLeave).unwrap();
        assert_eq!(json.as_str(), Some("on_leave"));
        let json = serde_json::to_value(DeliveryMode::OnCampus).unwrap();
        assert_eq!(json.as_str(), Some("on_campus"));
    }

    #[test]
    fn weekdays_sort_in_calendar_order() {
        let mut days = vec![Weekday::Friday, Weekday::Monday, Weekday::Wednesday];
        days.sort();
        assert_eq!(days, vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday]);
    }
}
