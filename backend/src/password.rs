use std::num::NonZeroU32;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ring::rand::{SecureRandom, SystemRandom};
use ring::{digest, pbkdf2};
use tracing::warn;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const CREDENTIAL_LEN: usize = digest::SHA256_OUTPUT_LEN;
pub const DEFAULT_ITERATIONS: u32 = 100_000;

#[derive(Debug, thiserror::Error)]
#[error("Failed to generate a password salt")]
pub struct SaltError;

/// Salted PBKDF2-HMAC-SHA256 hashes, encoded as
/// `pbkdf2-sha256$<iterations>$<salt>$<hash>`.
pub struct PasswordHasher {
    rng: SystemRandom,
    iterations: NonZeroU32,
}

impl PasswordHasher {
    /// Zero iterations falls back to the default.
    pub fn new(iterations: u32) -> Self {
        let iterations = NonZeroU32::new(iterations)
            .or_else(|| NonZeroU32::new(DEFAULT_ITERATIONS))
            .unwrap_or(NonZeroU32::MIN);
        Self {
            rng: SystemRandom::new(),
            iterations,
        }
    }

    pub fn hash(&self, password: &str) -> Result<String, SaltError> {
        let mut salt = [0u8; SALT_LEN];
        self.rng.fill(&mut salt).map_err(|_| SaltError)?;

        let mut credential = [0u8; CREDENTIAL_LEN];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            self.iterations,
            &salt,
            password.as_bytes(),
            &mut credential,
        );

        Ok(format!(
            "{}${}${}${}",
            SCHEME,
            self.iterations,
            URL_SAFE_NO_PAD.encode(salt),
            URL_SAFE_NO_PAD.encode(credential)
        ))
    }

    /// Checks `password` against a stored hash. Iterations are taken from the
    /// stored value, so hashes made with another cost still verify.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let Some((iterations, salt, credential)) = parse(stored) else {
            warn!("Unrecognized password hash format");
            return false;
        };

        pbkdf2::verify(
            pbkdf2::PBKDF2_HMAC_SHA256,
            iterations,
            &salt,
            password.as_bytes(),
            &credential,
        )
        .is_ok()
    }
}

fn parse(stored: &str) -> Option<(NonZeroU32, Vec<u8>, Vec<u8>)> {
    let mut parts = stored.split('$');
    if parts.next()? != SCHEME {
        return None;
    }
    let iterations = parts.next()?.parse::<NonZeroU32>().ok()?;
    let salt = URL_SAFE_NO_PAD.decode(parts.next()?).ok()?;
    let credential = URL_SAFE_NO_PAD.decode(parts.next()?).ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((iterations, salt, credential))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new(1_000);
        let stored = hasher.hash("correct horse").unwrap();

        assert!(stored.starts_with("pbkdf2-sha256$1000$"));
        assert!(hasher.verify("correct horse", &stored));
        assert!(!hasher.verify("wrong horse", &stored));
    }

    #[test]
    fn test_salts_differ() {
        let hasher = PasswordHasher::new(1_000);
        assert_ne!(hasher.hash("secret").unwrap(), hasher.hash("secret").unwrap());
    }

    #[test]
    fn test_zero_iterations_uses_default() {
        let stored = PasswordHasher::new(0).hash("secret").unwrap();
        assert!(stored.starts_with(&format!("{SCHEME}${DEFAULT_ITERATIONS}$")));
    }

    #[test]
    fn test_verify_uses_stored_iterations() {
        let stored = PasswordHasher::new(500).hash("secret").unwrap();
        assert!(PasswordHasher::new(2_000).verify("secret", &stored));
    }

    #[test]
    fn test_rejects_malformed_hashes() {
        let hasher = PasswordHasher::new(1_000);
        assert!(!hasher.verify("secret", "secret"));
        assert!(!hasher.verify("secret", "pbkdf2-sha256$0$AAAA$AAAA"));
        assert!(!hasher.verify("secret", "md5$1000$AAAA$AAAA"));
    }
}
