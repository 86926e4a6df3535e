//! Database location configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    String::from("registrar.db")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the libSQL database file, or `:memory:`.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_file_database() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, "registrar.db");
        assert!(!config.is_in_memory());
    }

    #[test]
    fn detects_in_memory() {
        let config = DatabaseConfig {
            path: ":memory:".into(),
        };
        assert!(config.is_in_memory());
    }
}
