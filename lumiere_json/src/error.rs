use thiserror::Error;

/// Errors that can occur while reading or writing scene files.
#[derive(Error, Debug)]
pub enum SceneFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing field \"{0}\"")]
    MissingField(&'static str),

    #[error("invalid \"{field}\": {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("unknown element kind \"{0}\"")]
    UnknownKind(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SceneFileError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

pub type SceneFileResult<T> = Result<T, SceneFileError>;
