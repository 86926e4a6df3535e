use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// Authenticated principal handed to the engine by the auth collaborator.
///
/// The engine trusts it unconditionally: `account_id` is used for ownership
/// checks and for `recorded_by`/`graded_by` attribution. Role gating happens
/// at the boundary, never inside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Principal {
    pub account_id: String,
    pub role: Role,
}

impl Principal {
    #[must_use]
    pub fn new(account_id: impl Into<String>, role: Role) -> Self {
        Self {
            account_id: account_id.into(),
            role,
        }
    }
}
