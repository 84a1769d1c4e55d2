//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidInput`] thrown when a caller supplied value is rejected before
//!   touching the database.
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`ExistingKey`] thrown when a unique key is already taken. This is the
//!   outcome of two concurrent first contacts for the same user, so the
//!   caller may retry.
//!
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Whether repeating the same call can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExistingKey(_))
    }

    /// Turns a unique constraint violation into [`EngineError::ExistingKey`],
    /// keeping every other database error as is.
    pub(crate) fn from_insert(err: DbErr, key: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::ExistingKey(key.to_string()),
            _ => Self::Database(err),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_existing_key_is_retryable() {
        assert!(EngineError::ExistingKey("42".to_string()).is_retryable());
        assert!(!EngineError::InvalidInput("x".to_string()).is_retryable());
        assert!(!EngineError::KeyNotFound("x".to_string()).is_retryable());
        assert!(!EngineError::Database(DbErr::Custom("boom".to_string())).is_retryable());
    }

    #[test]
    fn plain_database_error_is_kept() {
        let err = EngineError::from_insert(DbErr::Custom("boom".to_string()), "42");
        assert_eq!(err, EngineError::Database(DbErr::Custom("boom".to_string())));
    }
}
