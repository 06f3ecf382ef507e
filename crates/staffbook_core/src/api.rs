//! Public record-store boundary for UI callers.
//!
//! # Responsibility
//! - Expose list/replace/add/update/delete/get and photo upload as calls
//!   returning a serializable success/failure envelope.
//! - Convert every service and storage error into a message plus error kind.
//!
//! # Invariants
//! - No operation returns `Err`; failures are data.
//! - Error messages are stable and safe to display verbatim.

use crate::config::DirectoryConfig;
use crate::model::employee::{Employee, PhotoRef};
use crate::repo::file_repo::{FileStore, SqliteFileStore};
use crate::repo::table_repo::{SqliteTableStore, TableStore};
use crate::service::employee_service::EmployeeService;
use crate::service::photo_service::PhotoService;
use crate::service::{ErrorKind, ServiceError, ServiceResult};
use log::error;
use rusqlite::Connection;
use serde::Serialize;

/// Success/failure envelope returned by every directory call.
///
/// Payload fields are flattened next to `success`, e.g.
/// `{"success":true,"employees":[...]}` or
/// `{"success":false,"error":"Employee not found","errorKind":"NotFound"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
        }
    }

    fn failure(operation: &'static str, err: &ServiceError) -> Self {
        if err.kind() == ErrorKind::BackingStoreFailure {
            error!("event={operation} module=api status=error error={err}");
        }
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
        }
    }

    fn from_result(operation: &'static str, result: ServiceResult<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(operation, &err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeList {
    pub employees: Vec<Employee>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeDetail {
    pub employee: Employee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplaceSummary {
    pub count: usize,
}

/// Employee directory over injected table and file stores.
pub struct EmployeeDirectory<T: TableStore, F: FileStore> {
    employees: EmployeeService<T>,
    photos: PhotoService<F>,
}

impl<'conn> EmployeeDirectory<SqliteTableStore<'conn>, SqliteFileStore<'conn>> {
    /// Directory whose table and photos both live in one SQLite database.
    pub fn sqlite(conn: &'conn Connection, config: &DirectoryConfig) -> Self {
        Self::new(
            SqliteTableStore::new(conn, config.sheet_name.clone()),
            SqliteFileStore::new(conn),
            config,
        )
    }
}

impl<T: TableStore, F: FileStore> EmployeeDirectory<T, F> {
    pub fn new(table: T, files: F, config: &DirectoryConfig) -> Self {
        Self {
            employees: EmployeeService::new(table),
            photos: PhotoService::new(files, config),
        }
    }

    pub fn list_all(&self) -> ApiResponse<EmployeeList> {
        let result = self
            .employees
            .list_all()
            .map(|employees| EmployeeList { employees });
        ApiResponse::from_result("employees_list", result)
    }

    pub fn replace_all(&self, employees: &[Employee]) -> ApiResponse<ReplaceSummary> {
        let result = self
            .employees
            .replace_all(employees)
            .map(|count| ReplaceSummary { count });
        ApiResponse::from_result("employees_replace", result)
    }

    pub fn add(&self, employee: &Employee) -> ApiResponse<()> {
        ApiResponse::from_result("employee_add", self.employees.add(employee))
    }

    pub fn update(&self, employee: &Employee, original_emp_id: &str) -> ApiResponse<()> {
        ApiResponse::from_result(
            "employee_update",
            self.employees.update(employee, original_emp_id),
        )
    }

    pub fn delete(&self, emp_id: &str) -> ApiResponse<()> {
        ApiResponse::from_result("employee_delete", self.employees.delete(emp_id))
    }

    /// Looks up one record; an unknown id is a `NotFound` failure.
    pub fn get(&self, emp_id: &str) -> ApiResponse<EmployeeDetail> {
        let result = self.employees.get(emp_id).and_then(|found| {
            found
                .map(|employee| EmployeeDetail { employee })
                .ok_or_else(|| ServiceError::NotFound(emp_id.to_string()))
        });
        ApiResponse::from_result("employee_get", result)
    }

    /// Stores an inline image; attach the returned id with `update` or `add`.
    pub fn upload_photo(&self, data_url: &str, emp_id: &str) -> ApiResponse<PhotoRef> {
        ApiResponse::from_result("photo_upload", self.photos.upload(data_url, emp_id))
    }

    pub fn table(&self) -> &T {
        self.employees.table()
    }

    pub fn files(&self) -> &F {
        self.photos.files()
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiResponse, EmployeeList};
    use crate::model::employee::Employee;
    use crate::service::ServiceError;

    #[test]
    fn success_envelope_flattens_payload() {
        let response = ApiResponse::success(EmployeeList {
            employees: vec![Employee::new("E1")],
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["employees"][0]["empId"], "E1");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn failure_envelope_carries_message_and_kind() {
        let response: ApiResponse<()> =
            ApiResponse::failure("employee_add", &ServiceError::DuplicateKey("E1".into()));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Employee ID already exists");
        assert_eq!(json["errorKind"], "DuplicateKey");
    }
}
