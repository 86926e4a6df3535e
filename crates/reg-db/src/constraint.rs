//! Classification of store constraint failures.
//!
//! `SQLite` reports every constraint violation through the same error variant,
//! so the kind is recovered from the message. The predicates are narrow on
//! purpose: anything they don't recognize stays an internal error.

use crate::error::DatabaseError;

/// `UNIQUE constraint failed: <table>.<column>`
#[must_use]
pub fn is_unique_violation(e: &libsql::Error) -> bool {
    e.to_string().contains("UNIQUE constraint failed")
}

/// `FOREIGN KEY constraint failed`
#[must_use]
pub fn is_foreign_key_violation(e: &libsql::Error) -> bool {
    e.to_string().contains("FOREIGN KEY constraint failed")
}

/// `CHECK constraint failed: <expr>`
#[must_use]
pub fn is_check_violation(e: &libsql::Error) -> bool {
    e.to_string().contains("CHECK constraint failed")
}

/// Map a write error onto the boundary taxonomy, using `what` to describe the
/// conflicting value.
pub fn classify_write_error(e: libsql::Error, what: &str) -> DatabaseError {
    if is_unique_violation(&e) {
        DatabaseError::Conflict(format!("{what} already exists"))
    } else if is_foreign_key_violation(&e) {
        DatabaseError::Conflict(format!("{what} is referenced by other records"))
    } else if is_check_violation(&e) {
        DatabaseError::Invalid(format!("{what} violates a value constraint"))
    } else {
        DatabaseError::LibSql(e)
    }
}
