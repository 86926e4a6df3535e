//! Database error types for reg-db.

use reg_core::enums::EntityType;
use reg_core::errors::{CoreError, ErrorKind};
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityType, id: String },

    /// Uniqueness violation or a deletion blocked by dependent rows.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A state machine transition was attempted that is not allowed.
    #[error("Cannot transition {entity} {id} from {from} to {to}")]
    InvalidTransition {
        entity: EntityType,
        id: String,
        from: String,
        to: String,
    },

    /// The class offering has no seat left.
    #[error("Class offering {class_id} is full")]
    CapacityExceeded { class_id: String },

    /// A non-dropped enrollment already exists for the pair.
    #[error("Student {student_id} is already enrolled in {class_id}")]
    AlreadyEnrolled {
        student_id: String,
        class_id: String,
    },

    #[error("Enrollment {enrollment_id} is already dropped")]
    AlreadyDropped { enrollment_id: String },

    /// Ownership mismatch.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Missing or malformed input.
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    pub(crate) fn not_found(entity: EntityType, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Failure kind reported at the boundary.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict(_) | Self::InvalidTransition { .. } => ErrorKind::Conflict,
            Self::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Self::AlreadyEnrolled { .. } => ErrorKind::AlreadyEnrolled,
            Self::AlreadyDropped { .. } => ErrorKind::AlreadyDropped,
            Self::AccessDenied(_) => ErrorKind::AccessDenied,
            Self::Invalid(_) => ErrorKind::Invalid,
            Self::Query(_)
            | Self::Migration(_)
            | Self::NoResult
            | Self::InvalidState(_)
            | Self::LibSql(_)
            | Self::Other(_) => ErrorKind::Internal,
        }
    }
}

impl From<CoreError> for DatabaseError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Invalid(msg),
            CoreError::Other(e) => Self::Other(e),
        }
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(err.into())
    }
}
