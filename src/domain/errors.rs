use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error("Data error: {0}")]
    Data(String),
    #[error("Invalid date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Rendering error: {0}")]
    Rendering(String),
}

impl AppError {
    pub fn invalid_date(input: &str, reason: impl ToString) -> Self {
        AppError::InvalidDate { input: input.to_string(), reason: reason.to_string() }
    }
}

pub type AppResult<T> = Result<T, AppError>;
