//! Error taxonomy for record store operations.

use std::error::Error;
use std::fmt;

use crate::persist::StorageError;
use crate::schema::ValidationError;

/// Failure outcome of a store operation.
#[derive(Debug)]
pub enum StoreError {
    /// The inbound record failed schema validation; no I/O was performed.
    Validation(ValidationError),
    /// The backing document could not be read or written.
    Storage(StorageError),
    /// The referenced id does not exist (update/delete).
    NotFound(u64),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Validation(e) => write!(f, "validation failed: {}", e),
            StoreError::Storage(e) => write!(f, "storage unavailable: {}", e),
            StoreError::NotFound(id) => write!(f, "no item with id {}", id),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Validation(e) => Some(e),
            StoreError::Storage(e) => Some(e),
            StoreError::NotFound(_) => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Validation(err)
    }
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        StoreError::Storage(err)
    }
}

impl StoreError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::Validation(_) => 400,
            StoreError::Storage(_) => 503,
            StoreError::NotFound(_) => 404,
        }
    }
}
