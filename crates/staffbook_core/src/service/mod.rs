//! Core use-case services.
//!
//! # Responsibility
//! - Implement record semantics (header enforcement, key lookups, duplicate
//!   checks) on top of the storage contracts.
//! - Map storage faults into one semantic error type.
//!
//! # Invariants
//! - Services are storage-agnostic; every store is injected.
//! - No retries: a failed store call is reported once.

use crate::repo::StorageError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod employee_service;
pub mod photo_service;
pub mod schema_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

pub const MSG_DUPLICATE_KEY: &str = "Employee ID already exists";
pub const MSG_NOT_FOUND: &str = "Employee not found";
pub const MSG_INVALID_FORMAT: &str = "Invalid image data format";
pub const MSG_MISSING_IMAGE: &str = "No image data provided";
pub const MSG_MISSING_EMP_ID: &str = "Employee ID is required";

/// Stable error category exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    DuplicateKey,
    NotFound,
    InvalidFormat,
    MissingInput,
    BackingStoreFailure,
}

/// Failure of one record or photo operation.
#[derive(Debug)]
pub enum ServiceError {
    /// Another row already carries this emp id.
    DuplicateKey(String),
    /// No row carries this emp id.
    NotFound(String),
    InvalidFormat,
    MissingInput(&'static str),
    Storage(StorageError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateKey(_) => ErrorKind::DuplicateKey,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidFormat => ErrorKind::InvalidFormat,
            Self::MissingInput(_) => ErrorKind::MissingInput,
            Self::Storage(_) => ErrorKind::BackingStoreFailure,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey(_) => f.write_str(MSG_DUPLICATE_KEY),
            Self::NotFound(_) => f.write_str(MSG_NOT_FOUND),
            Self::InvalidFormat => f.write_str(MSG_INVALID_FORMAT),
            Self::MissingInput(message) => f.write_str(message),
            Self::Storage(err) => write!(f, "Backing store failure: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, ServiceError};
    use crate::repo::StorageError;

    #[test]
    fn storage_errors_are_backing_store_failures() {
        let err = ServiceError::from(StorageError::UnknownFolder("f1".to_string()));
        assert_eq!(err.kind(), ErrorKind::BackingStoreFailure);
        assert_eq!(err.to_string(), "Backing store failure: folder not found: f1");
    }

    #[test]
    fn duplicate_key_message_is_user_facing() {
        let err = ServiceError::DuplicateKey("E1".to_string());
        assert_eq!(err.to_string(), "Employee ID already exists");
    }
}
