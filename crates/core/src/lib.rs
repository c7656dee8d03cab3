//! Shared primitives for all Rust crates in Rostrum.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;
mod server_failure;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::UserIdentity;
pub use server_failure::{FieldError, FormErrorRouting, ServerFailure};

/// Result type used across Rostrum crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// User is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The remote backend could not be reached or its reply could not be read.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote backend answered with a failure status.
    #[error("server error: {0}")]
    Server(ServerFailure),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
