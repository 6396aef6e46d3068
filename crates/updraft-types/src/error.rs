use thiserror::Error;

/// Request validation failures. Detected before any store interaction so
/// malformed input never reaches persistence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid version format '{0}'. Expected: X.Y.Z")]
    InvalidFormat(String),

    #[error("Invalid {field}: '{value}'")]
    InvalidEnum {
        field: &'static str,
        value: String,
    },
}
