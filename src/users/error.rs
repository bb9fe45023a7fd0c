use thiserror::Error;
use uuid::Uuid;

use crate::auth::password::PasswordError;
use crate::users::repo::{StoreError, UniqueField};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("Username already registered")]
    DuplicateUsername,
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("User {0} not found")]
    NotFound(Uuid),
    #[error("User store is unavailable")]
    PersistenceUnavailable(#[source] sqlx::Error),
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl UserError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<StoreError> for UserError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation(UniqueField::Username) => Self::DuplicateUsername,
            StoreError::UniqueViolation(UniqueField::Email) => Self::DuplicateEmail,
            StoreError::Unavailable(source) => Self::PersistenceUnavailable(source),
            StoreError::Query(source) => Self::Internal(source.into()),
        }
    }
}

impl From<PasswordError> for UserError {
    fn from(e: PasswordError) -> Self {
        Self::Internal(e.into())
    }
}
