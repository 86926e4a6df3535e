//! Row-to-entity parsing helpers.
//!
//! Every repo needs to convert `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing logic and handle the dual datetime
//! format issue (`SQLite`'s `datetime('now')` vs Rust's `to_rfc3339()`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use reg_core::enums::{EnrollmentStatus, EntityType};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse an optional `YYYY-MM-DD` TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string is not a calendar date.
pub fn parse_optional_date(s: Option<&str>) -> Result<Option<NaiveDate>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| DatabaseError::Query(format!("Failed to parse date '{s}': {e}"))),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all reg-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read a non-negative INTEGER column as `u32`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for negative or oversized values.
pub fn get_u32(row: &libsql::Row, idx: i32) -> Result<u32, DatabaseError> {
    let raw = row.get::<i64>(idx)?;
    u32::try_from(raw)
        .map_err(|_| DatabaseError::InvalidState(format!("column {idx} out of range: {raw}")))
}

/// Nullable variant of [`get_u32`].
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for negative or oversized values.
pub fn get_opt_u32(row: &libsql::Row, idx: i32) -> Result<Option<u32>, DatabaseError> {
    row.get::<Option<i64>>(idx)?
        .map(|raw| {
            u32::try_from(raw).map_err(|_| {
                DatabaseError::InvalidState(format!("column {idx} out of range: {raw}"))
            })
        })
        .transpose()
}

/// Read a nullable INTEGER column as `i32`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for values outside `i32`.
pub fn get_opt_i32(row: &libsql::Row, idx: i32) -> Result<Option<i32>, DatabaseError> {
    row.get::<Option<i64>>(idx)?
        .map(|raw| {
            i32::try_from(raw).map_err(|_| {
                DatabaseError::InvalidState(format!("column {idx} out of range: {raw}"))
            })
        })
        .transpose()
}

/// Extract an optional JSON value from a TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string contains invalid JSON.
pub fn parse_optional_json(s: Option<&str>) -> Result<Option<serde_json::Value>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => {
            let val = serde_json::from_str(s)
                .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))?;
            Ok(Some(val))
        }
        _ => Ok(None),
    }
}

/// Parse a JSON array column (meetings, score breakdown, prerequisites).
///
/// Empty or NULL columns yield an empty list.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the column is not a JSON array of `T`.
pub fn parse_json_list<T: DeserializeOwned>(s: Option<&str>) -> Result<Vec<T>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => serde_json::from_str(s)
            .map_err(|e| DatabaseError::Query(format!("Invalid JSON list in column: {e}"))),
        _ => Ok(Vec::new()),
    }
}

/// Serialize a list for storage in a TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if serialization fails.
pub fn to_json_text<T: Serialize>(value: &T) -> Result<String, DatabaseError> {
    Ok(serde_json::to_string(value)?)
}

/// Render statuses as a quoted SQL `IN (...)` list body.
#[must_use]
pub fn status_in_list(statuses: &[EnrollmentStatus]) -> String {
    statuses
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Map `EntityType` to the corresponding SQL table name.
///
/// Uses exhaustive match so adding a new `EntityType` variant forces updating this.
#[must_use]
pub const fn entity_type_to_table(entity: EntityType) -> &'static str {
    match entity {
        EntityType::Account => "accounts",
        EntityType::Student => "students",
        EntityType::Course => "courses",
        EntityType::ClassOffering => "class_offerings",
        EntityType::Enrollment => "enrollments",
    }
}
