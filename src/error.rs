use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ChamaError {
    #[error("Invalid argument: {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Loan {0} not found")]
    NotFound(String),

    #[error("Loan application submission was cancelled")]
    Cancelled,
}

impl ChamaError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ChamaError::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChamaError>;
