/*
 * Responsibility
 * - Failures the category repo reports upward (posts and comments use Option)
 */
use geekplay_trust::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(what) => AppError::NotFound(what),
            RepoError::Conflict(msg) => AppError::conflict(msg),
        }
    }
}
