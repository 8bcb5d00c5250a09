use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Stable, machine-readable identifier for every failure a request can end in.
#[derive(Debug, Clone, Copy, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    #[error("Candidate is not on the ballot")]
    InvalidCandidate,
    #[error("User has already voted")]
    AlreadyVoted,
    #[error("Login required")]
    Unauthenticated,
    #[error("Operation not authorized")]
    Unauthorized,
    #[error("Username already taken")]
    DuplicateUsername,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Candidate already exists")]
    DuplicateCandidate,
    #[error("Invalid name")]
    InvalidName,
    #[error("Data store unavailable")]
    StoreFailure,
    #[error("Invalid request")]
    BadRequest,
    #[error("Resource not found")]
    NotFound,
    #[error("Internal system error")]
    SystemError,
}

impl ErrorCode {
    /// Best-effort code for a bare HTTP status produced outside the handlers.
    pub const fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => ErrorCode::BadRequest,
            401 => ErrorCode::Unauthenticated,
            403 => ErrorCode::Unauthorized,
            404 => ErrorCode::NotFound,
            _ => ErrorCode::SystemError,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self { code, error: error.into() }
    }
}

impl From<ErrorCode> for ErrorResponse {
    fn from(code: ErrorCode) -> Self {
        Self::new(code, code.to_string())
    }
}
