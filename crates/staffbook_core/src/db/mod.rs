//! SQLite bootstrap for the employee table and photo stores.
//!
//! One database file holds both stores: `sheet_cells`/`sheet_styles` back
//! `SqliteTableStore`, `file_folders`/`stored_files` back `SqliteFileStore`.
//! `open_db*` hands out a connection only after those tables exist at the
//! latest schema version recorded in `PRAGMA user_version`. A file written by
//! a newer build is refused rather than downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "staffbook database error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "staffbook database is at schema v{db_version}; this build reads up to v{latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;

    #[test]
    fn newer_schema_message_names_both_versions() {
        let err = DbError::UnsupportedSchemaVersion {
            db_version: 9,
            latest_supported: 2,
        };
        assert_eq!(
            err.to_string(),
            "staffbook database is at schema v9; this build reads up to v2"
        );
    }
}
