#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("patient not found: {0}")]
    NotFound(String),
    #[error("patient id already exists: {0}")]
    Conflict(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("failed to read patient file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write patient file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize patients: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize patients: {0}")]
    Deserialization(String),
    #[error("patient store lock poisoned")]
    LockPoisoned,
}

impl PatientError {
    /// Shorthand for a [`PatientError::Validation`] naming the offending field.
    pub(crate) fn field(field: &str, reason: impl std::fmt::Display) -> Self {
        PatientError::Validation(format!("{field}: {reason}"))
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
