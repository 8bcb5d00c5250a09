use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Flash, Redirect, Responder};
use rocket::tokio::task::JoinError;
use shared::{ErrorCode, ValidationError};
use thiserror::Error;
use tracing::{debug, error};

use crate::password::SaltError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),
    #[error("You have already voted")]
    AlreadyVoted,
    #[error("Please log in first")]
    Unauthenticated,
    #[error("Administrator access required")]
    Unauthorized,
    #[error("Username '{0}' is already taken")]
    DuplicateUsername(String),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Candidate '{0}' already exists")]
    DuplicateCandidate(String),
    #[error("{0}")]
    InvalidName(ValidationError),
    #[error("{0}")]
    InvalidRegistration(ValidationError),
    #[error("The voting data is unavailable right now")]
    Store(#[from] StoreError),
    #[error("Could not secure the password, please try again")]
    Hashing(#[from] SaltError),
    #[error("The request could not be completed")]
    Worker(#[from] JoinError),
}

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::InvalidCandidate(_) => ErrorCode::InvalidCandidate,
            ApiError::AlreadyVoted => ErrorCode::AlreadyVoted,
            ApiError::Unauthenticated => ErrorCode::Unauthenticated,
            ApiError::Unauthorized => ErrorCode::Unauthorized,
            ApiError::DuplicateUsername(_) => ErrorCode::DuplicateUsername,
            ApiError::InvalidCredentials => ErrorCode::InvalidCredentials,
            ApiError::DuplicateCandidate(_) => ErrorCode::DuplicateCandidate,
            ApiError::InvalidName(_) | ApiError::InvalidRegistration(_) => ErrorCode::InvalidName,
            ApiError::Store(_) => ErrorCode::StoreFailure,
            ApiError::Hashing(_) | ApiError::Worker(_) => ErrorCode::SystemError,
        }
    }

    /// Errors answered with a bare status instead of a redirect.
    pub fn status(&self) -> Option<Status> {
        match self {
            ApiError::InvalidCandidate(_) => Some(Status::BadRequest),
            ApiError::Unauthorized => Some(Status::Forbidden),
            _ => None,
        }
    }

    /// Page the user is sent back to, with the error as a flash message.
    pub fn redirect_to(&self) -> &'static str {
        match self {
            ApiError::AlreadyVoted => "/results",
            ApiError::Unauthenticated | ApiError::InvalidCredentials => "/login",
            ApiError::DuplicateUsername(_)
            | ApiError::InvalidRegistration(_)
            | ApiError::Hashing(_) => "/register",
            ApiError::DuplicateCandidate(_) | ApiError::InvalidName(_) => "/admin",
            ApiError::InvalidCandidate(_) => "/vote",
            ApiError::Unauthorized | ApiError::Store(_) | ApiError::Worker(_) => "/",
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        match self {
            ApiError::Store(ref e) => error!("Store failure on {} {}: {}", req.method(), req.uri(), e),
            ApiError::Worker(ref e) => error!("Worker failed on {} {}: {}", req.method(), req.uri(), e),
            _ => debug!("{} {} rejected: {:?}", req.method(), req.uri(), self.code()),
        }

        match self.status() {
            Some(status) => rocket::Response::build_from(self.to_string().respond_to(req)?)
                .status(status)
                .ok(),
            None => Flash::error(Redirect::to(self.redirect_to()), self.to_string()).respond_to(req),
        }
    }
}
