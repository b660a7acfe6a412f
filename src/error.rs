use thiserror::Error;

#[derive(Error, Debug)]
pub enum PKError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unrecognized command: {0}")]
    UnrecognizedCommand(String),

    #[error("Unsupported dose unit: '{0}' (use mg or µg)")]
    UnsupportedUnit(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Parameter {field} must be positive (got {value})")]
    NonPositiveParameter { field: String, value: f64 },

    #[error("Curve cannot be represented: {0}")]
    UnrepresentableCurve(String),

    #[error("Drug lookup unavailable: {0}")]
    LookupUnavailable(String),

    #[error("Parsing service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PKError {
    pub fn non_positive(field: impl Into<String>, value: f64) -> Self {
        PKError::NonPositiveParameter {
            field: field.into(),
            value,
        }
    }

    /// Errors the user should see and act on. Everything else is recovered
    /// by a fallback or is an internal failure.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            PKError::UnrecognizedCommand(_)
                | PKError::UnsupportedUnit(_)
                | PKError::NonPositiveParameter { .. }
                | PKError::UnrepresentableCurve(_)
        )
    }
}

pub type PKResult<T> = Result<T, PKError>;
