//! Student inputs: creation, administrative update, and self-service profile update.
//!
//! `gpa`, `student_number`, and `account_id` never appear in an update type;
//! the GPA aggregator is the only writer of `gpa`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use reg_core::enums::{Gender, StudentStatus};
use reg_core::errors::CoreError;

use super::{SetClause, double_option, required};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewStudent {
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub cohort_year: Option<i32>,
    #[serde(default)]
    pub enrollment_year: Option<i32>,
    /// When present, a student-role account is created and linked.
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub current_semester: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewStudent {
    #[must_use]
    pub fn new(
        student_number: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            student_number: student_number.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    /// Trim the required fields in place.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` naming the first blank required field.
    pub fn validate(&mut self) -> Result<(), CoreError> {
        self.student_number = required("student_number", &self.student_number)?;
        self.first_name = required("first_name", &self.first_name)?;
        self.last_name = required("last_name", &self.last_name)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub cohort_year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub enrollment_year: Option<Option<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StudentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub current_semester: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl StudentUpdate {
    /// Whether the update changes the name shown on the linked account.
    #[must_use]
    pub const fn renames(&self) -> bool {
        self.first_name.is_some() || self.last_name.is_some()
    }

    pub(crate) fn apply(&self, set: &mut SetClause) -> Result<(), CoreError> {
        if let Some(ref first_name) = self.first_name {
            set.text("first_name", &required("first_name", first_name)?);
        }
        if let Some(ref last_name) = self.last_name {
            set.text("last_name", &required("last_name", last_name)?);
        }
        if let Some(ref middle_name) = self.middle_name {
            set.opt_text("middle_name", middle_name.as_deref());
        }
        if let Some(date_of_birth) = self.date_of_birth {
            set.opt_text(
                "date_of_birth",
                date_of_birth
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .as_deref(),
            );
        }
        if let Some(gender) = self.gender {
            set.text("gender", gender.as_str());
        }
        if let Some(cohort_year) = self.cohort_year {
            set.opt_integer("cohort_year", cohort_year.map(i64::from));
        }
        if let Some(enrollment_year) = self.enrollment_year {
            set.opt_integer("enrollment_year", enrollment_year.map(i64::from));
        }
        if let Some(status) = self.status {
            set.text("status", status.as_str());
        }
        if let Some(is_active) = self.is_active {
            set.integer("is_active", i64::from(is_active));
        }
        if let Some(ref email) = self.email {
            set.opt_text("email", email.as_deref());
        }
        if let Some(ref phone) = self.phone {
            set.opt_text("phone", phone.as_deref());
        }
        if let Some(ref current_semester) = self.current_semester {
            set.opt_text("current_semester", current_semester.as_deref());
        }
        if let Some(ref notes) = self.notes {
            set.opt_text("notes", notes.as_deref());
        }
        Ok(())
    }
}

/// Fields a student may change on their own record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub current_semester: Option<Option<String>>,
}

impl From<ProfileUpdate> for StudentUpdate {
    fn from(profile: ProfileUpdate) -> Self {
        Self {
            first_name: profile.first_name,
            last_name: profile.last_name,
            middle_name: profile.middle_name,
            date_of_birth: profile.date_of_birth,
            gender: profile.gender,
            email: profile.email,
            phone: profile.phone,
            current_semester: profile.current_semester,
            ..Self::default()
        }
    }
}

pub struct StudentUpdateBuilder(StudentUpdate);

impl StudentUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(StudentUpdate::default())
    }

    #[must_use]
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.0.first_name = Some(first_name.into());
        self
    }

    #[must_use]
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.0.last_name = Some(last_name.into());
        self
    }

    #[must_use]
    pub const fn status(mut self, status: StudentStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub const fn is_active(mut self, is_active: bool) -> Self {
        self.0.is_active = Some(is_active);
        self
    }

    #[must_use]
    pub fn current_semester(mut self, semester: Option<String>) -> Self {
        self.0.current_semester = Some(semester);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.0.notes = Some(notes);
        self
    }

    #[must_use]
    pub fn build(self) -> StudentUpdate {
        self.0
    }
}

impl Default for StudentUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
