//! Class offering inputs.
//!
//! `capacity` is only settable at creation or through `set_capacity`;
//! `enrolled_count` is never settable. Both belong to the capacity controller.

use serde::{Deserialize, Serialize};

use reg_core::entities::Meeting;
use reg_core::enums::{DeliveryMode, OfferingStatus};
use reg_core::errors::CoreError;

use super::{SetClause, double_option, required};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewClassOffering {
    pub class_code: String,
    pub course_id: String,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub instructor_name: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub campus: Option<String>,
    #[serde(default)]
    pub mode: Option<DeliveryMode>,
    /// 0 means unlimited.
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub status: Option<OfferingStatus>,
    #[serde(default)]
    pub meetings: Vec<Meeting>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewClassOffering {
    #[must_use]
    pub fn new(class_code: impl Into<String>, course_id: impl Into<String>) -> Self {
        Self {
            class_code: class_code.into(),
            course_id: course_id.into(),
            semester: None,
            instructor_name: None,
            section: None,
            room: None,
            campus: None,
            mode: None,
            capacity: 0,
            status: None,
            meetings: Vec::new(),
            notes: None,
        }
    }

    #[must_use]
    pub const fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_semester(mut self, semester: impl Into<String>) -> Self {
        self.semester = Some(semester.into());
        self
    }

    #[must_use]
    pub const fn with_status(mut self, status: OfferingStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// # Errors
    ///
    /// Returns `CoreError::Validation` when class code or course is blank.
    pub fn validate(&mut self) -> Result<(), CoreError> {
        self.class_code = required("class_code", &self.class_code)?;
        self.course_id = required("course_id", &self.course_id)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassOfferingUpdate {
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub semester: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub instructor_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub section: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub room: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub campus: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<DeliveryMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OfferingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meetings: Option<Vec<Meeting>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl ClassOfferingUpdate {
    pub(crate) fn apply(&self, set: &mut SetClause) -> Result<(), CoreError> {
        if let Some(ref semester) = self.semester {
            set.opt_text("semester", semester.as_deref());
        }
        if let Some(ref instructor_name) = self.instructor_name {
            set.opt_text("instructor_name", instructor_name.as_deref());
        }
        if let Some(ref section) = self.section {
            set.opt_text("section", section.as_deref());
        }
        if let Some(ref room) = self.room {
            set.opt_text("room", room.as_deref());
        }
        if let Some(ref campus) = self.campus {
            set.opt_text("campus", campus.as_deref());
        }
        if let Some(mode) = self.mode {
            set.text("mode", mode.as_str());
        }
        if let Some(status) = self.status {
            set.text("status", status.as_str());
        }
        if let Some(ref meetings) = self.meetings {
            let text = serde_json::to_string(meetings).map_err(|e| CoreError::Other(e.into()))?;
            set.text("meetings", &text);
        }
        if let Some(ref notes) = self.notes {
            set.opt_text("notes", notes.as_deref());
        }
        Ok(())
    }
}

pub struct ClassOfferingUpdateBuilder(ClassOfferingUpdate);

impl ClassOfferingUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ClassOfferingUpdate::default())
    }

    #[must_use]
    pub const fn status(mut self, status: OfferingStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn room(mut self, room: Option<String>) -> Self {
        self.0.room = Some(room);
        self
    }

    #[must_use]
    pub fn instructor_name(mut self, name: Option<String>) -> Self {
        self.0.instructor_name = Some(name);
        self
    }

    #[must_use]
    pub fn meetings(mut self, meetings: Vec<Meeting>) -> Self {
        self.0.meetings = Some(meetings);
        self
    }

    #[must_use]
    pub fn build(self) -> ClassOfferingUpdate {
        self.0
    }
}

impl Default for ClassOfferingUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
