use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Merging or extracting the layered providers failed.
    #[error("cannot load registrar configuration: {0}")]
    Figment(#[from] figment::Error),

    #[error("configuration field '{field}' rejected: {reason}")]
    InvalidValue { field: String, reason: String },
}
