//! bcrypt hashing on the blocking pool.
use bcrypt::{hash, verify};
use thiserror::Error;

/// bcrypt refuses to look past this many bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("hashing failed: {0}")]
    Hashing(String),
}

pub async fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || {
        hash(password, cost).map_err(|e| PasswordError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| PasswordError::Hashing(format!("task join error: {e}")))?
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
pub async fn verify_password(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();

    tokio::task::spawn_blocking(move || {
        verify(password, &stored_hash).map_err(|e| PasswordError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| PasswordError::Hashing(format!("task join error: {e}")))?
}
