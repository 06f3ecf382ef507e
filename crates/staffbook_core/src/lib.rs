//! Core record store for Staffbook.
//! This crate is the single source of truth for employee record invariants.

pub mod api;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::{ApiResponse, EmployeeDetail, EmployeeDirectory, EmployeeList, ReplaceSummary};
pub use config::DirectoryConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::employee::{Employee, PhotoRef, EMPLOYEE_HEADERS};
pub use repo::file_repo::{FileStore, SqliteFileStore};
pub use repo::memory::{MemoryFileStore, MemoryTableStore};
pub use repo::table_repo::{SqliteTableStore, TableStore};
pub use repo::{RepoResult, StorageError};
pub use service::employee_service::EmployeeService;
pub use service::photo_service::PhotoService;
pub use service::{ErrorKind, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
