use staffbook_core::db::open_db_in_memory;
use staffbook_core::{
    DirectoryConfig, Employee, EmployeeDirectory, ErrorKind, MemoryFileStore, MemoryTableStore,
    TableStore, EMPLOYEE_HEADERS,
};

fn directory(table: &MemoryTableStore) -> EmployeeDirectory<&MemoryTableStore, MemoryFileStore> {
    EmployeeDirectory::new(table, MemoryFileStore::new(), &DirectoryConfig::default())
}

fn employee(emp_id: &str, first_name: &str) -> Employee {
    Employee {
        first_name: first_name.to_string(),
        ..Employee::new(emp_id)
    }
}

fn seeded_table() -> MemoryTableStore {
    MemoryTableStore::with_rows([
        EMPLOYEE_HEADERS.to_vec(),
        vec!["E1", "Ann"],
        vec!["E2", "Bo"],
        vec!["E3", "Cy"],
    ])
}

fn ids(directory: &EmployeeDirectory<&MemoryTableStore, MemoryFileStore>) -> Vec<String> {
    directory
        .list_all()
        .data
        .unwrap()
        .employees
        .into_iter()
        .map(|employee| employee.emp_id)
        .collect()
}

#[test]
fn header_only_table_scenario() {
    let table = MemoryTableStore::with_rows([EMPLOYEE_HEADERS]);
    let directory = directory(&table);

    let listed = directory.list_all();
    assert!(listed.success);
    assert!(listed.data.unwrap().employees.is_empty());

    assert!(directory.add(&employee("E1", "Ann")).success);

    let employees = directory.list_all().data.unwrap().employees;
    assert_eq!(employees, vec![employee("E1", "Ann")]);
    assert_eq!(employees[0].last_name, "");

    let duplicate = directory.add(&employee("E1", "Other"));
    assert!(!duplicate.success);
    assert_eq!(duplicate.error.as_deref(), Some("Employee ID already exists"));
    assert_eq!(duplicate.error_kind, Some(ErrorKind::DuplicateKey));
}

#[test]
fn duplicate_add_leaves_table_unchanged() {
    let table = seeded_table();
    let directory = directory(&table);
    let before = table.snapshot();

    let response = directory.add(&employee("E2", "Again"));

    assert_eq!(response.error_kind, Some(ErrorKind::DuplicateKey));
    assert_eq!(table.snapshot(), before);
}

#[test]
fn replace_all_round_trips_in_order() {
    let table = seeded_table();
    let directory = directory(&table);
    let mut last = employee("Z9", "Zed");
    last.photo_id = "file-3".to_string();
    last.note = "night shift".to_string();
    let records = vec![employee("B2", "Bea"), employee("A1", "Al"), last];

    let response = directory.replace_all(&records);
    assert_eq!(response.data.unwrap().count, 3);

    assert_eq!(directory.list_all().data.unwrap().employees, records);
}

#[test]
fn replace_all_with_fewer_records_drops_the_rest() {
    let table = seeded_table();
    let directory = directory(&table);

    directory.replace_all(&[employee("N1", "New")]);

    assert_eq!(ids(&directory), vec!["N1"]);
    assert_eq!(table.last_row().unwrap(), 2);
}

#[test]
fn replace_all_with_empty_list_clears_data_but_keeps_headers() {
    let table = seeded_table();
    let directory = directory(&table);

    let response = directory.replace_all(&[]);

    assert_eq!(response.data.unwrap().count, 0);
    assert!(ids(&directory).is_empty());
    assert_eq!(table.read_range(1, 1, 1, 8).unwrap()[0], EMPLOYEE_HEADERS.to_vec());
}

#[test]
fn update_overwrites_row_in_place() {
    let table = seeded_table();
    let directory = directory(&table);

    let mut changed = employee("E2", "Bob");
    changed.email = "bob@example.com".to_string();
    assert!(directory.update(&changed, "E2").success);

    let employees = directory.list_all().data.unwrap().employees;
    assert_eq!(employees[1], changed);
    assert_eq!(ids(&directory), vec!["E1", "E2", "E3"]);
}

#[test]
fn update_can_rename_key_to_unused_value() {
    let table = seeded_table();
    let directory = directory(&table);

    assert!(directory.update(&employee("E20", "Bo"), "E2").success);
    assert_eq!(ids(&directory), vec!["E1", "E20", "E3"]);
}

#[test]
fn update_missing_original_is_not_found_and_changes_nothing() {
    let table = seeded_table();
    let directory = directory(&table);
    let before = table.snapshot();

    let response = directory.update(&employee("E9", "Nobody"), "E9");

    assert_eq!(response.error_kind, Some(ErrorKind::NotFound));
    assert_eq!(response.error.as_deref(), Some("Employee not found"));
    assert_eq!(table.snapshot(), before);
}

#[test]
fn update_renaming_onto_other_row_is_duplicate_and_changes_nothing() {
    let table = seeded_table();
    let directory = directory(&table);
    let before = table.snapshot();

    let response = directory.update(&employee("E3", "Bo"), "E2");

    assert_eq!(response.error_kind, Some(ErrorKind::DuplicateKey));
    assert_eq!(table.snapshot(), before);
}

#[test]
fn delete_removes_first_match_and_keeps_order() {
    let table = MemoryTableStore::with_rows([
        EMPLOYEE_HEADERS.to_vec(),
        vec!["E1", "Ann"],
        vec!["E2", "first"],
        vec!["E3", "Cy"],
        vec!["E2", "second"],
    ]);
    let directory = directory(&table);

    assert!(directory.delete("E2").success);

    let employees = directory.list_all().data.unwrap().employees;
    let names: Vec<&str> = employees.iter().map(|e| e.first_name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Cy", "second"]);
}

#[test]
fn delete_missing_is_not_found() {
    let table = seeded_table();
    let directory = directory(&table);

    let response = directory.delete("E404");
    assert_eq!(response.error_kind, Some(ErrorKind::NotFound));
    assert_eq!(ids(&directory), vec!["E1", "E2", "E3"]);
}

#[test]
fn delete_does_not_repair_headers() {
    let table = MemoryTableStore::with_rows([vec!["legacy id"], vec!["E1"], vec!["E2"]]);
    let directory = directory(&table);

    assert!(directory.delete("E1").success);

    assert_eq!(table.read_range(1, 1, 1, 1).unwrap()[0][0], "legacy id");
}

#[test]
fn get_returns_record_or_not_found() {
    let table = seeded_table();
    let directory = directory(&table);

    let found = directory.get("E3");
    assert_eq!(found.data.unwrap().employee, employee("E3", "Cy"));

    let missing = directory.get("E4");
    assert_eq!(missing.error_kind, Some(ErrorKind::NotFound));
}

#[test]
fn crud_works_against_sqlite_table() {
    let conn = open_db_in_memory().unwrap();
    let directory = EmployeeDirectory::sqlite(&conn, &DirectoryConfig::default());

    assert!(directory.add(&employee("E1", "Ann")).success);
    assert!(directory.add(&employee("E2", "Bo")).success);
    assert!(directory.add(&employee("E3", "Cy")).success);
    assert!(directory.update(&employee("E2", "Bob"), "E2").success);
    assert!(directory.delete("E1").success);

    let employees = directory.list_all().data.unwrap().employees;
    assert_eq!(employees, vec![employee("E2", "Bob"), employee("E3", "Cy")]);
    assert_eq!(directory.table().last_row().unwrap(), 3);
}

#[test]
fn storage_faults_become_backing_store_failures() {
    let conn = open_db_in_memory().unwrap();
    let directory = EmployeeDirectory::sqlite(&conn, &DirectoryConfig::default());
    conn.execute_batch("DROP TABLE sheet_cells;").unwrap();

    let response = directory.list_all();

    assert!(!response.success);
    assert_eq!(response.error_kind, Some(ErrorKind::BackingStoreFailure));
    assert!(response
        .error
        .unwrap()
        .starts_with("Backing store failure:"));
}

#[test]
fn whitespace_key_survives_replace_all_round_trip() {
    let table = seeded_table();
    let directory = directory(&table);
    let records = vec![employee(" ", "Spaced"), employee("E2", "Bo")];

    assert_eq!(directory.replace_all(&records).data.unwrap().count, 2);

    assert_eq!(directory.list_all().data.unwrap().employees, records);
}

#[test]
fn blank_filler_rows_cannot_be_updated_or_deleted() {
    let table = MemoryTableStore::with_rows([
        EMPLOYEE_HEADERS.to_vec(),
        vec!["", "Filler"],
        vec!["E2", "Bo"],
    ]);
    let directory = directory(&table);
    let before = table.snapshot();

    let deleted = directory.delete("");
    assert_eq!(deleted.error_kind, Some(ErrorKind::NotFound));

    let updated = directory.update(&employee("X", "Xan"), "");
    assert_eq!(updated.error_kind, Some(ErrorKind::NotFound));

    assert_eq!(table.snapshot(), before);
    assert_eq!(ids(&directory), vec!["E2"]);
}

#[test]
fn update_with_blank_new_key_is_missing_input() {
    let table = seeded_table();
    let directory = directory(&table);
    let before = table.snapshot();

    let response = directory.update(&employee("", "Ann"), "E1");

    assert_eq!(response.error_kind, Some(ErrorKind::MissingInput));
    assert_eq!(response.error.as_deref(), Some("Employee ID is required"));
    assert_eq!(table.snapshot(), before);
}
