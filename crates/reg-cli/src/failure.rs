//! Boundary failure handling: every error becomes a `{"error": {...}}`
//! response on stdout and a kind-specific exit code.

use reg_config::ConfigError;
use reg_core::errors::ErrorKind;
use reg_core::responses::FailureResponse;
use reg_db::error::DatabaseError;
use thiserror::Error;

use crate::cli::OutputFormat;
use crate::output;

/// Failures raised by the CLI itself before the engine is reached.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    AccessDenied(String),
}

impl Rejection {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Invalid(_) => ErrorKind::Invalid,
            Self::AccessDenied(_) => ErrorKind::AccessDenied,
        }
    }
}

/// Find the first classified error in the chain. Unclassified errors are
/// `Internal`.
pub fn classify(error: &anyhow::Error) -> (ErrorKind, String) {
    for cause in error.chain() {
        if let Some(err) = cause.downcast_ref::<DatabaseError>() {
            return (err.kind(), err.to_string());
        }
        if let Some(err) = cause.downcast_ref::<Rejection>() {
            return (err.kind(), err.to_string());
        }
        if let Some(err) = cause.downcast_ref::<ConfigError>() {
            return (ErrorKind::Invalid, err.to_string());
        }
    }
    (ErrorKind::Internal, error.to_string())
}

/// Build the failure response. Internal detail goes to the log only.
pub fn failure_response(error: &anyhow::Error) -> FailureResponse {
    let (kind, message) = classify(error);
    if kind == ErrorKind::Internal {
        tracing::error!(error = %format!("{error:#}"), "internal failure");
        return FailureResponse::new(kind, "internal error");
    }
    tracing::debug!(%kind, %message, "request rejected");
    FailureResponse::new(kind, message)
}

/// Print the failure response and return the process exit code.
pub fn report(error: &anyhow::Error, format: OutputFormat) -> i32 {
    let response = failure_response(error);
    let format = match format {
        OutputFormat::Raw => OutputFormat::Raw,
        OutputFormat::Json | OutputFormat::Table => OutputFormat::Json,
    };
    match output::render(&response, format) {
        Ok(rendered) => println!("{rendered}"),
        Err(render_error) => eprintln!("regctl: {render_error:#}"),
    }
    response.error.kind.exit_code()
}

#[cfg(test)]
mod tests {
    use anyhow::Context;
    use pretty_assertions::assert_eq;
    use reg_core::enums::EntityType;

    use super::*;

    #[test]
    fn database_errors_keep_their_kind() {
        let error = anyhow::Error::from(DatabaseError::CapacityExceeded {
            class_id: "cls-1".into(),
        });
        let (kind, message) = classify(&error);
        assert_eq!(kind, ErrorKind::CapacityExceeded);
        assert!(message.contains("cls-1"));
    }

    #[test]
    fn kind_survives_added_context() {
        let error = Err::<(), _>(DatabaseError::NotFound {
            entity: EntityType::Course,
            id: "crs-1".into(),
        })
        .context("failed to load course")
        .unwrap_err();
        assert_eq!(classify(&error).0, ErrorKind::NotFound);
    }

    #[test]
    fn rejections_map_to_boundary_kinds() {
        let denied = anyhow::Error::from(Rejection::AccessDenied("nope".into()));
        assert_eq!(classify(&denied), (ErrorKind::AccessDenied, "nope".to_string()));
        let invalid = anyhow::Error::from(Rejection::Invalid("bad body".into()));
        assert_eq!(classify(&invalid).0, ErrorKind::Invalid);
    }

    #[test]
    fn internal_errors_are_opaque() {
        let error = anyhow::Error::from(DatabaseError::Query("no such column: secret".into()));
        let response = failure_response(&error);
        assert_eq!(response.error.kind, ErrorKind::Internal);
        assert_eq!(response.error.message, "internal error");

        let unknown = anyhow::anyhow!("socket closed");
        assert_eq!(failure_response(&unknown).error.message, "internal error");
    }

    #[test]
    fn failure_body_shape() {
        let error = anyhow::Error::from(DatabaseError::AlreadyDropped {
            enrollment_id: "enr-1".into(),
        });
        let value = serde_json::to_value(failure_response(&error)).unwrap();
        assert_eq!(value["error"]["kind"], "already_dropped");
        assert_eq!(value["error"]["status"], 409);
        assert!(value["error"]["message"].as_str().unwrap().contains("enr-1"));
    }
}
