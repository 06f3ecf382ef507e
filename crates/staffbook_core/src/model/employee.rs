//! Employee domain model.
//!
//! # Responsibility
//! - Define the canonical employee record stored as one table row.
//! - Own the canonical header list and positional row mapping.
//!
//! # Invariants
//! - `emp_id` is the unique key; a row with an empty `emp_id` is filler.
//! - Column order of `EMPLOYEE_HEADERS` never changes; rows map positionally.

use serde::{Deserialize, Serialize};

/// Canonical header labels, in column order.
pub const EMPLOYEE_HEADERS: [&str; 8] = [
    "Employee ID",
    "First Name",
    "Last Name",
    "Phone",
    "Email",
    "Position",
    "Note",
    "Photo ID",
];

/// Number of columns owned by the employee table.
pub const EMPLOYEE_COLUMNS: usize = EMPLOYEE_HEADERS.len();

/// First 1-based row holding employee data. Row 1 is the header row.
pub const DATA_START_ROW: usize = 2;

/// One employee record.
///
/// Optional fields are plain strings; an absent value is the empty string,
/// matching how blank cells read back from the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Employee {
    pub emp_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub position: String,
    pub note: String,
    /// Weak reference to a file in the photo store.
    pub photo_id: String,
}

impl Employee {
    /// Creates a record with only the key set.
    pub fn new(emp_id: impl Into<String>) -> Self {
        Self {
            emp_id: emp_id.into(),
            ..Self::default()
        }
    }

    /// Builds a record from one table row.
    ///
    /// Missing trailing cells default to empty strings; extra cells are ignored.
    pub fn from_row(row: &[String]) -> Self {
        let cell = |index: usize| row.get(index).cloned().unwrap_or_default();
        Self {
            emp_id: cell(0),
            first_name: cell(1),
            last_name: cell(2),
            phone: cell(3),
            email: cell(4),
            position: cell(5),
            note: cell(6),
            photo_id: cell(7),
        }
    }

    /// Flattens this record into one table row in header order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.emp_id.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.phone.clone(),
            self.email.clone(),
            self.position.clone(),
            self.note.clone(),
            self.photo_id.clone(),
        ]
    }

    /// Returns whether this record carries a usable key for single-record writes.
    pub fn has_key(&self) -> bool {
        !self.emp_id.trim().is_empty()
    }
}

/// Returns whether a raw emp-id cell denotes a record rather than filler.
///
/// Only the empty string is filler; a whitespace-only id is still a record.
pub fn is_present_key(value: &str) -> bool {
    !value.is_empty()
}

/// Reference to an uploaded photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRef {
    /// Store-assigned file identifier.
    pub photo_id: String,
    /// Public view URL derived from `photo_id`.
    pub view_url: String,
}
