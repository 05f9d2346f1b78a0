use serde::Serialize;

use crate::repository::RepositoryError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    /// Malformed pagination, negative weights, out-of-range difficulty
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Hard filters matched nothing at all
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    RepositoryUnavailable(#[from] RepositoryError),
}

impl SelectionError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::RepositoryUnavailable(_) => "REPOSITORY_UNAVAILABLE",
        }
    }

    /// Only collaborator failures are worth retrying, and never by the engine itself.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RepositoryUnavailable(_))
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            error: self.to_string(),
            code: self.code().to_string(),
        }
    }
}
