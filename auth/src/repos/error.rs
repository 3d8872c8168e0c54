/*
 * Responsibility
 * - What the repo layer tells the services above it
 */
use geekplay_trust::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("user not found")]
    NotFound,
    #[error("{0}")]
    Conflict(&'static str),
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound => AppError::NotFound("user"),
            RepoError::Conflict(msg) => AppError::conflict(msg),
        }
    }
}
