use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use foodie_error::ext::ResultExt;
use foodie_error::Result;
use std::sync::LazyLock;
use thiserror::Error;

static CONTEXT: LazyLock<Argon2<'static>> = LazyLock::new(|| {
    Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params(),
    )
});

#[cfg(not(test))]
fn params() -> argon2::Params {
    argon2::Params::DEFAULT
}

// Hashing with the default cost makes the test suite crawl.
#[cfg(test)]
fn params() -> argon2::Params {
    argon2::Params::new(1024, 1, 1, None).unwrap()
}

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error)]
#[error("Failed to generate password hash")]
pub struct HashPasswordError;

/// Hashes the password into a PHC string. This is CPU heavy, call it
/// inside [`tokio::task::spawn_blocking`].
pub fn hash(password: impl AsRef<[u8]>) -> Result<String, HashPasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = CONTEXT
        .hash_password(password.as_ref(), &salt)
        .change_context(HashPasswordError)?;

    Ok(password_hash.to_string())
}

#[derive(Debug, Error)]
#[error("Failed to verify password")]
pub struct VerifyPasswordError;

pub fn verify(password: &[u8], hash: &str) -> Result<bool, VerifyPasswordError> {
    let hash = PasswordHash::new(hash)
        .change_context(VerifyPasswordError)
        .attach_printable("could not parse password hash")?;

    match CONTEXT.verify_password(password, &hash) {
        Ok(..) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(error) => Err(error).change_context(VerifyPasswordError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_verify_hashed_password() {
        let hash = hash("correct-horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify(b"correct-horse", &hash).unwrap());
        assert!(!verify(b"wrong-horse", &hash).unwrap());
    }

    #[test]
    fn should_reject_malformed_hash() {
        assert!(verify(b"password", "not a hash").is_err());
    }
}
