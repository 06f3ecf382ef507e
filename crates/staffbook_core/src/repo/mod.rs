//! Storage abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the two external collaborators: a cell-grid table store and a
//!   folder/file store.
//! - Provide SQLite-backed implementations and in-memory fakes.
//!
//! # Invariants
//! - Row and column indexes are 1-based everywhere in this layer.
//! - Stores report transport faults only; record semantics (duplicate keys,
//!   missing records) live in the service layer.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod file_repo;
pub mod memory;
pub mod table_repo;

pub type RepoResult<T> = Result<T, StorageError>;

/// Transport-level failure raised by a table or file store.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Caller passed an address outside the 1-based grid.
    InvalidRange(String),
    /// Persisted state could not be decoded.
    InvalidData(String),
    UnknownFolder(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidRange(message) => write!(f, "invalid range: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UnknownFolder(id) => write!(f, "folder not found: {id}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn ensure_origin(row: usize, col: usize) -> RepoResult<()> {
    if row == 0 || col == 0 {
        return Err(StorageError::InvalidRange(format!(
            "row {row} col {col}; indexes are 1-based"
        )));
    }
    Ok(())
}
