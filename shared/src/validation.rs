use rustrict::CensorStr;

pub const MAX_USERNAME_LENGTH: usize = 32;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MAX_CANDIDATE_LENGTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Username must not be empty")]
    EmptyUsername,
    #[error("Username exceeds maximum length of {MAX_USERNAME_LENGTH}")]
    UsernameTooLong,
    #[error("Username may only contain letters, digits, '-', '_' and '.'")]
    UsernameCharacters,
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,
    #[error("Password exceeds maximum length of {MAX_PASSWORD_LENGTH}")]
    PasswordTooLong,
    #[error("Candidate name must not be empty")]
    EmptyCandidate,
    #[error("Candidate name exceeds maximum length of {MAX_CANDIDATE_LENGTH}")]
    CandidateTooLong,
    #[error("Possible profanity detected in name: {0}")]
    Inappropriate(String),
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() { return Err(ValidationError::EmptyUsername); }
    if username.chars().count() > MAX_USERNAME_LENGTH { return Err(ValidationError::UsernameTooLong); }
    if !username.chars().all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.')) {
        return Err(ValidationError::UsernameCharacters);
    }
    if username.is_inappropriate() {
        return Err(ValidationError::Inappropriate(username.to_string()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH { return Err(ValidationError::PasswordTooShort); }
    if len > MAX_PASSWORD_LENGTH { return Err(ValidationError::PasswordTooLong); }
    Ok(())
}

/// Checks an already trimmed candidate name.
pub fn validate_candidate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() { return Err(ValidationError::EmptyCandidate); }
    if name.chars().count() > MAX_CANDIDATE_LENGTH { return Err(ValidationError::CandidateTooLong); }
    if name.is_inappropriate() {
        return Err(ValidationError::Inappropriate(name.to_string()));
    }
    Ok(())
}
