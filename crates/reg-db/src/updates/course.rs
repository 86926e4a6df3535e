//! Course inputs. The course code is immutable after creation.

use serde::{Deserialize, Serialize};

use reg_core::enums::CourseStatus;
use reg_core::errors::CoreError;

use super::{SetClause, double_option, required};

const fn default_credits() -> u32 {
    3
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCourse {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_credits")]
    pub credits: u32,
    #[serde(default)]
    pub contact_hours: Option<u32>,
    #[serde(default)]
    pub subject_area: Option<String>,
    #[serde(default)]
    pub faculty: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub syllabus_url: Option<String>,
    #[serde(default)]
    pub status: Option<CourseStatus>,
}

impl NewCourse {
    #[must_use]
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            description: None,
            credits: default_credits(),
            contact_hours: None,
            subject_area: None,
            faculty: None,
            prerequisites: Vec::new(),
            syllabus_url: None,
            status: None,
        }
    }

    #[must_use]
    pub const fn with_credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    /// # Errors
    ///
    /// Returns `CoreError::Validation` when code or title is blank.
    pub fn validate(&mut self) -> Result<(), CoreError> {
        self.code = required("code", &self.code)?;
        self.title = required("title", &self.title)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CourseUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<u32>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub contact_hours: Option<Option<u32>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub subject_area: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub faculty: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub syllabus_url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CourseStatus>,
}

impl CourseUpdate {
    pub(crate) fn apply(&self, set: &mut SetClause) -> Result<(), CoreError> {
        if let Some(ref title) = self.title {
            set.text("title", &required("title", title)?);
        }
        if let Some(ref description) = self.description {
            set.opt_text("description", description.as_deref());
        }
        if let Some(credits) = self.credits {
            set.integer("credits", i64::from(credits));
        }
        if let Some(contact_hours) = self.contact_hours {
            set.opt_integer("contact_hours", contact_hours.map(i64::from));
        }
        if let Some(ref subject_area) = self.subject_area {
            set.opt_text("subject_area", subject_area.as_deref());
        }
        if let Some(ref faculty) = self.faculty {
            set.opt_text("faculty", faculty.as_deref());
        }
        if let Some(ref prerequisites) = self.prerequisites {
            let text = serde_json::to_string(prerequisites).map_err(|e| CoreError::Other(e.into()))?;
            set.text("prerequisites", &text);
        }
        if let Some(ref syllabus_url) = self.syllabus_url {
            set.opt_text("syllabus_url", syllabus_url.as_deref());
        }
        if let Some(status) = self.status {
            set.text("status", status.as_str());
        }
        Ok(())
    }
}

pub struct CourseUpdateBuilder(CourseUpdate);

impl CourseUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(CourseUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn credits(mut self, credits: u32) -> Self {
        self.0.credits = Some(credits);
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub const fn status(mut self, status: CourseStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn build(self) -> CourseUpdate {
        self.0
    }
}

impl Default for CourseUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
