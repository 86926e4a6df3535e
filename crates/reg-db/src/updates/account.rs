//! Account input.

use reg_core::enums::{AccountStatus, Role};
use reg_core::errors::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAccount {
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default = "default_status")]
    pub status: AccountStatus,
}

const fn default_status() -> AccountStatus {
    AccountStatus::Active
}

impl NewAccount {
    #[must_use]
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
            display_name: None,
            status: default_status(),
        }
    }

    /// Lowercased, trimmed email.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when the email is blank or has no `@`.
    pub fn normalized_email(&self) -> Result<String, CoreError> {
        normalize_email(&self.email)
    }
}

pub(crate) fn normalize_email(raw: &str) -> Result<String, CoreError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(CoreError::Validation("email is required".into()));
    }
    if !email.contains('@') {
        return Err(CoreError::Validation(format!("'{email}' is not an email address")));
    }
    Ok(email)
}
