//! Employee record use-case service.
//!
//! # Responsibility
//! - List, replace, add, update, get and delete employee rows.
//! - Enforce emp-id presence and uniqueness on single-record writes.
//!
//! # Invariants
//! - Every operation except `delete` repairs the header row first.
//! - Lookups are linear scans in table order; the earliest match wins.
//! - A rejected write leaves the table untouched.

use crate::model::employee::{is_present_key, Employee, DATA_START_ROW, EMPLOYEE_COLUMNS};
use crate::repo::table_repo::TableStore;
use crate::service::schema_service::ensure_headers;
use crate::service::{ServiceError, ServiceResult, MSG_MISSING_EMP_ID};
use log::{info, warn};

/// Record store over an injected table.
pub struct EmployeeService<T: TableStore> {
    table: T,
}

impl<T: TableStore> EmployeeService<T> {
    pub fn new(table: T) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    /// Repairs the header row; returns whether it had to be rewritten.
    pub fn ensure_headers(&self) -> ServiceResult<bool> {
        Ok(ensure_headers(&self.table)?)
    }

    /// Returns every record in table order, skipping rows without an emp id.
    pub fn list_all(&self) -> ServiceResult<Vec<Employee>> {
        self.ensure_headers()?;
        let rows = self.data_rows(EMPLOYEE_COLUMNS)?;
        Ok(rows
            .iter()
            .filter(|row| row.first().is_some_and(|id| is_present_key(id)))
            .map(|row| Employee::from_row(row))
            .collect())
    }

    /// Overwrites every data row with `employees`, in order.
    ///
    /// Returns the number of rows written. No duplicate checks.
    pub fn replace_all(&self, employees: &[Employee]) -> ServiceResult<usize> {
        self.ensure_headers()?;
        let last_row = self.table.last_row()?;
        if last_row >= DATA_START_ROW {
            self.table.clear_range(
                DATA_START_ROW,
                1,
                last_row - DATA_START_ROW + 1,
                EMPLOYEE_COLUMNS,
            )?;
        }

        if !employees.is_empty() {
            let rows: Vec<Vec<String>> = employees.iter().map(Employee::to_row).collect();
            self.table.write_range(DATA_START_ROW, 1, &rows)?;
        }

        info!(
            "event=employees_replace module=employee status=ok cleared_rows={} written={}",
            last_row.saturating_sub(DATA_START_ROW - 1),
            employees.len()
        );
        Ok(employees.len())
    }

    /// Appends one record after checking its emp id is unused.
    pub fn add(&self, employee: &Employee) -> ServiceResult<()> {
        self.ensure_headers()?;
        require_key(employee)?;

        let existing = self.list_all()?;
        if existing.iter().any(|current| current.emp_id == employee.emp_id) {
            warn!(
                "event=employee_add module=employee status=rejected reason=duplicate_key emp_id={}",
                employee.emp_id
            );
            return Err(ServiceError::DuplicateKey(employee.emp_id.clone()));
        }

        self.table.append_row(&employee.to_row())?;
        info!(
            "event=employee_add module=employee status=ok emp_id={}",
            employee.emp_id
        );
        Ok(())
    }

    /// Overwrites the row currently keyed by `original_emp_id`.
    ///
    /// The row keeps its position. Renaming the key to one held by another row
    /// fails with `DuplicateKey`.
    pub fn update(&self, employee: &Employee, original_emp_id: &str) -> ServiceResult<()> {
        self.ensure_headers()?;
        require_key(employee)?;

        let Some(row) = self.find_row(original_emp_id)? else {
            return Err(ServiceError::NotFound(original_emp_id.to_string()));
        };

        if employee.emp_id != original_emp_id && self.find_row(&employee.emp_id)?.is_some() {
            warn!(
                "event=employee_update module=employee status=rejected reason=duplicate_key emp_id={}",
                employee.emp_id
            );
            return Err(ServiceError::DuplicateKey(employee.emp_id.clone()));
        }

        self.table.write_range(row, 1, &[employee.to_row()])?;
        info!(
            "event=employee_update module=employee status=ok row={} original_emp_id={} emp_id={}",
            row, original_emp_id, employee.emp_id
        );
        Ok(())
    }

    /// Returns the first record keyed by `emp_id`.
    pub fn get(&self, emp_id: &str) -> ServiceResult<Option<Employee>> {
        self.ensure_headers()?;
        let Some(row) = self.find_row(emp_id)? else {
            return Ok(None);
        };
        let cells = self.table.read_range(row, 1, 1, EMPLOYEE_COLUMNS)?;
        Ok(cells.first().map(|cells| Employee::from_row(cells)))
    }

    /// Removes the first row keyed by `emp_id`; later rows shift up.
    ///
    /// Runs without header enforcement.
    pub fn delete(&self, emp_id: &str) -> ServiceResult<()> {
        let Some(row) = self.find_row(emp_id)? else {
            return Err(ServiceError::NotFound(emp_id.to_string()));
        };

        self.table.delete_row(row)?;
        info!("event=employee_delete module=employee status=ok row={row} emp_id={emp_id}");
        Ok(())
    }

    /// Linear scan of the emp-id column; returns the 1-based row index.
    ///
    /// Filler rows never match, so a row hidden from `list_all` cannot be
    /// updated or deleted.
    fn find_row(&self, emp_id: &str) -> ServiceResult<Option<usize>> {
        let ids = self.data_rows(1)?;
        Ok(ids
            .iter()
            .position(|cells| {
                cells
                    .first()
                    .is_some_and(|id| is_present_key(id) && id == emp_id)
            })
            .map(|offset| DATA_START_ROW + offset))
    }

    fn data_rows(&self, num_cols: usize) -> ServiceResult<Vec<Vec<String>>> {
        let last_row = self.table.last_row()?;
        if last_row < DATA_START_ROW {
            return Ok(Vec::new());
        }
        Ok(self.table.read_range(
            DATA_START_ROW,
            1,
            last_row - DATA_START_ROW + 1,
            num_cols,
        )?)
    }
}

fn require_key(employee: &Employee) -> ServiceResult<()> {
    if employee.has_key() {
        Ok(())
    } else {
        Err(ServiceError::MissingInput(MSG_MISSING_EMP_ID))
    }
}

#[cfg(test)]
mod tests {
    use super::EmployeeService;
    use crate::model::employee::{Employee, EMPLOYEE_HEADERS};
    use crate::repo::memory::MemoryTableStore;
    use crate::service::ServiceError;

    #[test]
    fn list_skips_rows_with_blank_emp_id() {
        let table = MemoryTableStore::with_rows([
            EMPLOYEE_HEADERS.to_vec(),
            vec!["E1", "Ann"],
            vec!["", "Filler"],
            vec!["E2", "Bo"],
        ]);
        let service = EmployeeService::new(&table);

        let ids: Vec<String> = service
            .list_all()
            .unwrap()
            .into_iter()
            .map(|employee| employee.emp_id)
            .collect();
        assert_eq!(ids, vec!["E1", "E2"]);
    }

    #[test]
    fn find_row_uses_earliest_match() {
        let table = MemoryTableStore::with_rows([
            EMPLOYEE_HEADERS.to_vec(),
            vec!["E1", "first"],
            vec!["E1", "second"],
        ]);
        let service = EmployeeService::new(&table);

        assert_eq!(service.find_row("E1").unwrap(), Some(2));
        let found = service.get("E1").unwrap().unwrap();
        assert_eq!(found.first_name, "first");
    }

    #[test]
    fn add_rejects_blank_emp_id() {
        let table = MemoryTableStore::new();
        let service = EmployeeService::new(&table);

        let err = service.add(&Employee::new("  ")).unwrap_err();
        assert!(matches!(err, ServiceError::MissingInput(_)));
        assert_eq!(service.list_all().unwrap(), Vec::new());
    }

    #[test]
    fn find_row_skips_filler_rows() {
        let table = MemoryTableStore::with_rows([
            EMPLOYEE_HEADERS.to_vec(),
            vec!["", "Filler"],
            vec![" ", "Spaced"],
        ]);
        let service = EmployeeService::new(&table);

        assert_eq!(service.find_row("").unwrap(), None);
        assert_eq!(service.find_row(" ").unwrap(), Some(3));
    }

    #[test]
    fn update_rejects_blank_new_emp_id() {
        let table = MemoryTableStore::with_rows([EMPLOYEE_HEADERS.to_vec(), vec!["E1", "Ann"]]);
        let service = EmployeeService::new(&table);
        let before = table.snapshot();

        let err = service.update(&Employee::new(" "), "E1").unwrap_err();
        assert!(matches!(err, ServiceError::MissingInput(_)));
        assert_eq!(table.snapshot(), before);
    }
}
