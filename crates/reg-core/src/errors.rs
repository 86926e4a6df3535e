//! Cross-cutting error types for Registrar.
//!
//! `ErrorKind` is the closed failure taxonomy every operation reports at the
//! boundary. Domain-specific errors (e.g., `DatabaseError`, `ConfigError`) are
//! defined in their respective crates and classify themselves into a kind;
//! `regctl` maps the kind to its exit code and failure response.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure kind reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A referenced entity is absent.
    NotFound,
    /// Uniqueness violation, referential-integrity block, or disallowed transition.
    Conflict,
    /// The class offering has no seat left.
    CapacityExceeded,
    /// The student already holds a non-dropped enrollment for the class.
    AlreadyEnrolled,
    /// The enrollment is already dropped.
    AlreadyDropped,
    /// Ownership or role mismatch.
    AccessDenied,
    /// Missing or malformed input.
    Invalid,
    /// Unexpected store or runtime failure. Never carries internal detail.
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::AlreadyEnrolled => "already_enrolled",
            Self::AlreadyDropped => "already_dropped",
            Self::AccessDenied => "access_denied",
            Self::Invalid => "invalid",
            Self::Internal => "internal",
        }
    }

    /// Transport-level status a request/response boundary would use.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Invalid => 400,
            Self::AccessDenied => 403,
            Self::NotFound => 404,
            Self::Conflict | Self::CapacityExceeded | Self::AlreadyEnrolled | Self::AlreadyDropped => {
                409
            }
            Self::Internal => 500,
        }
    }

    /// Process exit code used by `regctl`.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Internal => 1,
            Self::Invalid => 2,
            Self::AccessDenied => 3,
            Self::NotFound => 4,
            Self::Conflict => 5,
            Self::CapacityExceeded => 6,
            Self::AlreadyEnrolled => 7,
            Self::AlreadyDropped => 8,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while validating or encoding inputs, before the store is
/// touched. Lookups and transitions fail in the store layer instead.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (required fields, ranges, formats).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Invalid,
            Self::Other(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let kinds = [
            ErrorKind::NotFound,
            ErrorKind::Conflict,
            ErrorKind::CapacityExceeded,
            ErrorKind::AlreadyEnrolled,
            ErrorKind::AlreadyDropped,
            ErrorKind::AccessDenied,
            ErrorKind::Invalid,
            ErrorKind::Internal,
        ];
        let mut codes: Vec<i32> = kinds.iter().map(|k| k.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn core_error_kinds() {
        assert_eq!(CoreError::Validation("x".into()).kind(), ErrorKind::Invalid);
        let other = CoreError::from(anyhow::anyhow!("encoding failed"));
        assert_eq!(other.kind(), ErrorKind::Internal);
    }
}
