//! Domain model for employee records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the positional row shape next to the record it encodes.
//!
//! # Invariants
//! - Every record is identified by its `emp_id`.
//! - Photos are referenced by id only; the record never owns the file.

pub mod employee;
