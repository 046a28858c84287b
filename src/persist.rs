//! Whole-document persistence for the catalog collection.
//!
//! The collection is one JSON document on disk. Every load parses the full
//! document; every save rewrites it through a temp file and an atomic
//! rename, so a concurrent loader never observes a half-written document.

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::item::Collection;

#[derive(Debug)]
pub enum StorageError {
    /// The backing document is missing or cannot be read.
    Unreadable { path: PathBuf, detail: String },
    /// The backing document exists but is not a valid collection.
    Malformed { path: PathBuf, detail: String },
    /// The document could not be written back.
    Unwritable { path: PathBuf, detail: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unreadable { path, detail } => {
                write!(f, "cannot read catalog document {}: {}", path.display(), detail)
            }
            StorageError::Malformed { path, detail } => {
                write!(f, "catalog document {} is malformed: {}", path.display(), detail)
            }
            StorageError::Unwritable { path, detail } => {
                write!(f, "cannot write catalog document {}: {}", path.display(), detail)
            }
        }
    }
}

impl Error for StorageError {}

/// The persisted collection document.
pub struct JsonDocument {
    path: PathBuf,
}

impl JsonDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the full document. A missing or malformed file is an
    /// error, never an empty collection.
    pub fn load(&self) -> Result<Collection, StorageError> {
        let bytes = fs::read(&self.path).map_err(|e| StorageError::Unreadable {
            path: self.path.clone(),
            detail: e.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| StorageError::Malformed {
            path: self.path.clone(),
            detail: e.to_string(),
        })
    }

    /// Serialize the full collection and replace the document atomically.
    pub fn save(&self, collection: &Collection) -> Result<(), StorageError> {
        let unwritable = |detail: String| StorageError::Unwritable {
            path: self.path.clone(),
            detail,
        };
        // The temp file must live in the same directory for rename to be atomic.
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| unwritable(e.to_string()))?;
        serde_json::to_writer_pretty(&mut tmp, collection)
            .map_err(|e| unwritable(e.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|e| unwritable(e.error.to_string()))?;
        Ok(())
    }
}
