//! Command-line front end over the employee directory.
//!
//! # Responsibility
//! - Open the SQLite-backed directory named by `STAFFBOOK_DB`.
//! - Run one operation per invocation and print its JSON envelope.
//!
//! Usage: `staffbook_cli list | get <id> | add <id> [first] [last] |
//! update <original-id> <id> [first] [last] | replace | delete <id> |
//! photo <id> <data-url>`
//!
//! `replace` reads a JSON array of employee records from stdin.

use serde::Serialize;
use staffbook_core::db::open_db;
use staffbook_core::{
    default_log_level, init_logging, ApiResponse, DirectoryConfig, Employee, EmployeeDirectory,
};
use std::io::Read;
use std::process::ExitCode;

const DEFAULT_DB_PATH: &str = "staffbook.sqlite3";

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("STAFFBOOK_LOG_DIR") {
        let level =
            std::env::var("STAFFBOOK_LOG_LEVEL").unwrap_or_else(|_| default_log_level().to_string());
        if let Err(err) = init_logging(&level, &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let db_path = std::env::var("STAFFBOOK_DB").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };
    let directory = EmployeeDirectory::sqlite(&conn, &DirectoryConfig::default());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let arg = |index: usize| args.get(index).map(String::as_str).unwrap_or_default();

    match arg(0) {
        "list" => print_response(&directory.list_all()),
        "get" => print_response(&directory.get(arg(1))),
        "add" => print_response(&directory.add(&employee_from_args(arg(1), arg(2), arg(3)))),
        "update" => {
            let employee = employee_from_args(arg(2), arg(3), arg(4));
            print_response(&directory.update(&employee, arg(1)))
        }
        "replace" => {
            let employees = match read_employees(std::io::stdin().lock()) {
                Ok(employees) => employees,
                Err(err) => {
                    eprintln!("failed to read employee records from stdin: {err}");
                    return ExitCode::from(2);
                }
            };
            print_response(&directory.replace_all(&employees))
        }
        "delete" => print_response(&directory.delete(arg(1))),
        "photo" => print_response(&directory.upload_photo(arg(2), arg(1))),
        other => {
            eprintln!("unknown command `{other}`; expected list|get|add|update|replace|delete|photo");
            ExitCode::from(2)
        }
    }
}

fn employee_from_args(emp_id: &str, first_name: &str, last_name: &str) -> Employee {
    Employee {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        ..Employee::new(emp_id)
    }
}

fn read_employees<R: Read>(reader: R) -> serde_json::Result<Vec<Employee>> {
    serde_json::from_reader(reader)
}

fn print_response<T: Serialize>(response: &ApiResponse<T>) -> ExitCode {
    match serde_json::to_string_pretty(response) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("failed to encode response: {err}");
            return ExitCode::FAILURE;
        }
    }
    if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
