//! Authentication error types.

use thiserror::Error;

use mochileros_core::ValidationErrors;

use crate::services::avatar::FileReadError;
use crate::storage::StorageError;

/// Errors that can occur during registration and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// One or more form rules failed; all of them are listed.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// An account with this email (case-insensitive) already exists.
    #[error("user already exists")]
    DuplicateEmail,

    /// Unknown email or wrong password. The two are not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The avatar upload could not be read.
    #[error("avatar could not be read: {0}")]
    FileRead(#[from] FileReadError),

    /// The user registry could not be read or saved.
    #[error("user registry unavailable: {0}")]
    Storage(#[from] StorageError),
}
