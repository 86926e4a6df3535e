//! Input and update builder types for entity mutations.
//!
//! Each update type has `Option` fields; only `Some` fields generate SET
//! clauses in the dynamic UPDATE SQL. Nullable columns use `Option<Option<T>>`
//! so that an explicit JSON `null` clears the column while an absent key
//! leaves it alone. Every type that is read from JSON rejects unknown fields,
//! which makes the type itself the whitelist of writable columns.

pub mod account;
pub mod class_offering;
pub mod course;
pub mod grade;
pub mod student;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Distinguish an absent key (`None`) from an explicit `null` (`Some(None)`).
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Accumulates `column = ?N` fragments and their positional parameters.
#[derive(Debug, Default)]
pub(crate) struct SetClause {
    sets: Vec<String>,
    params: Vec<libsql::Value>,
}

impl SetClause {
    pub(crate) fn text(&mut self, column: &str, value: &str) {
        self.push(column, libsql::Value::Text(value.to_string()));
    }

    pub(crate) fn opt_text(&mut self, column: &str, value: Option<&str>) {
        self.push(
            column,
            value.map_or(libsql::Value::Null, |v| libsql::Value::Text(v.to_string())),
        );
    }

    pub(crate) fn integer(&mut self, column: &str, value: i64) {
        self.push(column, libsql::Value::Integer(value));
    }

    pub(crate) fn opt_integer(&mut self, column: &str, value: Option<i64>) {
        self.push(column, value.map_or(libsql::Value::Null, libsql::Value::Integer));
    }

    pub(crate) fn real(&mut self, column: &str, value: f64) {
        self.push(column, libsql::Value::Real(value));
    }

    pub(crate) fn push(&mut self, column: &str, value: libsql::Value) {
        self.params.push(value);
        self.sets.push(format!("{column} = ?{}", self.params.len()));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Finish as `UPDATE {table} SET ... WHERE id = ?N`, stamping `updated_at`.
    pub(crate) fn into_update(
        mut self,
        table: &str,
        id: &str,
        now: DateTime<Utc>,
    ) -> (String, Vec<libsql::Value>) {
        self.text("updated_at", &now.to_rfc3339());
        self.params.push(libsql::Value::Text(id.to_string()));
        let sql = format!(
            "UPDATE {table} SET {} WHERE id = ?{}",
            self.sets.join(", "),
            self.params.len()
        );
        (sql, self.params)
    }
}

/// Trim a required text field, rejecting blanks.
pub(crate) fn required(field: &str, value: &str) -> Result<String, reg_core::errors::CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(reg_core::errors::CoreError::Validation(format!(
            "{field} is required"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_clause_numbers_parameters() {
        let mut set = SetClause::default();
        set.text("title", "Databases");
        set.opt_integer("contact_hours", None);
        assert!(!set.is_empty());

        let now = Utc::now();
        let (sql, params) = set.into_update("courses", "crs-1", now);
        assert_eq!(
            sql,
            "UPDATE courses SET title = ?1, contact_hours = ?2, updated_at = ?3 WHERE id = ?4"
        );
        assert_eq!(params.len(), 4);
        assert!(matches!(params[1], libsql::Value::Null));
        assert!(matches!(&params[3], libsql::Value::Text(id) if id == "crs-1"));
    }

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("code", "  CS101 ").unwrap(), "CS101");
        assert!(required("code", "   ").is_err());
    }
}
