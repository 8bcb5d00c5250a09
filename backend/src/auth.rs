use shared::models::UserRecord;
use shared::validation::{validate_password, validate_username};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::password::PasswordHasher;
use crate::session::Voter;
use crate::store::Store;

pub struct AuthService {
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(password_iterations: u32) -> Self {
        Self {
            hasher: PasswordHasher::new(password_iterations),
        }
    }

    pub fn register(&self, store: &Store, username: &str, password: &str) -> Result<(), ApiError> {
        validate_username(username).map_err(ApiError::InvalidRegistration)?;
        validate_password(password).map_err(ApiError::InvalidRegistration)?;

        let hash = self.hasher.hash(password)?;

        store.users().update(|users| {
            if users.contains_key(username) {
                return Err(ApiError::DuplicateUsername(username.to_string()));
            }
            users.insert(username.to_string(), UserRecord::new(hash));
            Ok(())
        })?;

        info!("Registered user {}", username);
        Ok(())
    }

    pub fn login(&self, store: &Store, username: &str, password: &str) -> Result<Voter, ApiError> {
        let users = store.users().read()?;

        match users.get(username) {
            Some(user) if self.hasher.verify(password, &user.password) => {
                info!("User {} logged in", username);
                Ok(Voter::new(username))
            }
            _ => {
                debug!("Rejected login for {}", username);
                Err(ApiError::InvalidCredentials)
            }
        }
    }
}
