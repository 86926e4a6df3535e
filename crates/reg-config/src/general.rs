//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default page size for listings.
const fn default_limit() -> u32 {
    10
}

/// Upper bound on any requested page size.
const fn default_max_limit() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default page size for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Requested page sizes are clamped to this value.
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,

    /// Semester used by timetable lookups when neither the caller nor the
    /// student record names one.
    #[serde(default)]
    pub default_semester: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            default_semester: String::new(),
        }
    }
}

impl GeneralConfig {
    /// Resolve a requested page size against the configured default and cap.
    #[must_use]
    pub fn effective_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit.max(1))
    }

    #[must_use]
    pub fn default_semester(&self) -> Option<&str> {
        if self.default_semester.is_empty() {
            None
        } else {
            Some(&self.default_semester)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.max_limit, 100);
        assert!(config.default_semester().is_none());
    }

    #[test]
    fn effective_limit_clamps() {
        let config = GeneralConfig::default();
        assert_eq!(config.effective_limit(None), 10);
        assert_eq!(config.effective_limit(Some(25)), 25);
        assert_eq!(config.effective_limit(Some(0)), 1);
        assert_eq!(config.effective_limit(Some(5000)), 100);
    }
}
