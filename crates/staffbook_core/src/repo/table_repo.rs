//! Cell-grid table store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide rectangular read/write/clear access over a named sheet.
//! - Support row append and row deletion with upward shift.
//!
//! # Invariants
//! - Blank cells are never persisted; reading them yields `""`.
//! - `last_row()` is the highest row holding at least one non-blank cell,
//!   or 0 for an empty sheet.
//! - `delete_row` shifts every later row up by one inside one transaction.

use crate::repo::{ensure_origin, RepoResult, StorageError};
use rusqlite::{params, Connection, OptionalExtension};

/// Cosmetic cell formatting. Never affects stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStyle {
    pub bold: bool,
    /// CSS-style color such as `#e8eaed`.
    pub background: Option<String>,
    pub bordered: bool,
}

/// Tabular backing store addressed by 1-based row/column indexes.
pub trait TableStore {
    /// Reads `num_rows x num_cols` cells starting at (`row`, `col`).
    fn read_range(
        &self,
        row: usize,
        col: usize,
        num_rows: usize,
        num_cols: usize,
    ) -> RepoResult<Vec<Vec<String>>>;
    /// Writes `values` with its top-left cell at (`row`, `col`).
    fn write_range(&self, row: usize, col: usize, values: &[Vec<String>]) -> RepoResult<()>;
    fn clear_range(&self, row: usize, col: usize, num_rows: usize, num_cols: usize)
        -> RepoResult<()>;
    /// Writes `values` into the row after `last_row()`.
    fn append_row(&self, values: &[String]) -> RepoResult<()>;
    fn delete_row(&self, row: usize) -> RepoResult<()>;
    fn last_row(&self) -> RepoResult<usize>;
    fn format_range(&self, row: usize, col: usize, num_cols: usize, style: &CellStyle)
        -> RepoResult<()>;
}

impl<T: TableStore + ?Sized> TableStore for &T {
    fn read_range(
        &self,
        row: usize,
        col: usize,
        num_rows: usize,
        num_cols: usize,
    ) -> RepoResult<Vec<Vec<String>>> {
        (**self).read_range(row, col, num_rows, num_cols)
    }

    fn write_range(&self, row: usize, col: usize, values: &[Vec<String>]) -> RepoResult<()> {
        (**self).write_range(row, col, values)
    }

    fn clear_range(
        &self,
        row: usize,
        col: usize,
        num_rows: usize,
        num_cols: usize,
    ) -> RepoResult<()> {
        (**self).clear_range(row, col, num_rows, num_cols)
    }

    fn append_row(&self, values: &[String]) -> RepoResult<()> {
        (**self).append_row(values)
    }

    fn delete_row(&self, row: usize) -> RepoResult<()> {
        (**self).delete_row(row)
    }

    fn last_row(&self) -> RepoResult<usize> {
        (**self).last_row()
    }

    fn format_range(
        &self,
        row: usize,
        col: usize,
        num_cols: usize,
        style: &CellStyle,
    ) -> RepoResult<()> {
        (**self).format_range(row, col, num_cols, style)
    }
}

/// SQLite-backed sheet. Several sheets may share one database.
pub struct SqliteTableStore<'conn> {
    conn: &'conn Connection,
    sheet: String,
}

impl<'conn> SqliteTableStore<'conn> {
    pub fn new(conn: &'conn Connection, sheet: impl Into<String>) -> Self {
        Self {
            conn,
            sheet: sheet.into(),
        }
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// Returns the formatting applied to one cell, if any.
    pub fn cell_style(&self, row: usize, col: usize) -> RepoResult<Option<CellStyle>> {
        let style = self
            .conn
            .query_row(
                "SELECT bold, background, bordered
                 FROM sheet_styles
                 WHERE sheet = ?1 AND row_index = ?2 AND col_index = ?3;",
                params![self.sheet, to_db_index(row)?, to_db_index(col)?],
                |row| {
                    Ok(CellStyle {
                        bold: row.get::<_, i64>(0)? == 1,
                        background: row.get(1)?,
                        bordered: row.get::<_, i64>(2)? == 1,
                    })
                },
            )
            .optional()?;
        Ok(style)
    }

    fn put_cell(&self, row: i64, col: i64, value: &str) -> RepoResult<()> {
        if value.is_empty() {
            self.conn.execute(
                "DELETE FROM sheet_cells WHERE sheet = ?1 AND row_index = ?2 AND col_index = ?3;",
                params![self.sheet, row, col],
            )?;
        } else {
            self.conn.execute(
                "INSERT INTO sheet_cells (sheet, row_index, col_index, value)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (sheet, row_index, col_index) DO UPDATE SET value = excluded.value;",
                params![self.sheet, row, col, value],
            )?;
        }
        Ok(())
    }

    /// Drops `row` and moves every later cell up by one row.
    ///
    /// Cells are re-inserted rather than renumbered in place so the primary
    /// key never collides mid-statement.
    fn shift_cells_up(&self, row: i64) -> RepoResult<()> {
        let moved = {
            let mut stmt = self.conn.prepare(
                "SELECT row_index, col_index, value
                 FROM sheet_cells
                 WHERE sheet = ?1 AND row_index > ?2;",
            )?;
            let cells = stmt.query_map(params![self.sheet, row], |cell| {
                Ok((cell.get::<_, i64>(0)?, cell.get::<_, i64>(1)?, cell.get::<_, String>(2)?))
            })?;
            cells.collect::<Result<Vec<_>, _>>()?
        };

        self.conn.execute(
            "DELETE FROM sheet_cells WHERE sheet = ?1 AND row_index >= ?2;",
            params![self.sheet, row],
        )?;
        for (cell_row, cell_col, value) in moved {
            self.put_cell(cell_row - 1, cell_col, &value)?;
        }
        Ok(())
    }

    fn shift_styles_up(&self, row: i64) -> RepoResult<()> {
        let moved = {
            let mut stmt = self.conn.prepare(
                "SELECT row_index, col_index, bold, background, bordered
                 FROM sheet_styles
                 WHERE sheet = ?1 AND row_index > ?2;",
            )?;
            let styles = stmt.query_map(params![self.sheet, row], |style| {
                Ok((
                    style.get::<_, i64>(0)?,
                    style.get::<_, i64>(1)?,
                    style.get::<_, i64>(2)?,
                    style.get::<_, Option<String>>(3)?,
                    style.get::<_, i64>(4)?,
                ))
            })?;
            styles.collect::<Result<Vec<_>, _>>()?
        };

        self.conn.execute(
            "DELETE FROM sheet_styles WHERE sheet = ?1 AND row_index >= ?2;",
            params![self.sheet, row],
        )?;
        for (style_row, style_col, bold, background, bordered) in moved {
            self.conn.execute(
                "INSERT INTO sheet_styles (sheet, row_index, col_index, bold, background, bordered)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![self.sheet, style_row - 1, style_col, bold, background, bordered],
            )?;
        }
        Ok(())
    }
}

impl TableStore for SqliteTableStore<'_> {
    fn read_range(
        &self,
        row: usize,
        col: usize,
        num_rows: usize,
        num_cols: usize,
    ) -> RepoResult<Vec<Vec<String>>> {
        ensure_origin(row, col)?;
        let mut grid = vec![vec![String::new(); num_cols]; num_rows];
        if num_rows == 0 || num_cols == 0 {
            return Ok(grid);
        }

        let mut stmt = self.conn.prepare(
            "SELECT row_index, col_index, value
             FROM sheet_cells
             WHERE sheet = ?1
               AND row_index BETWEEN ?2 AND ?3
               AND col_index BETWEEN ?4 AND ?5;",
        )?;
        let mut rows = stmt.query(params![
            self.sheet,
            to_db_index(row)?,
            to_db_index(row + num_rows - 1)?,
            to_db_index(col)?,
            to_db_index(col + num_cols - 1)?,
        ])?;

        while let Some(cell) = rows.next()? {
            let cell_row = from_db_index(cell.get(0)?)?;
            let cell_col = from_db_index(cell.get(1)?)?;
            grid[cell_row - row][cell_col - col] = cell.get(2)?;
        }
        Ok(grid)
    }

    fn write_range(&self, row: usize, col: usize, values: &[Vec<String>]) -> RepoResult<()> {
        ensure_origin(row, col)?;
        let tx = self.conn.unchecked_transaction()?;
        for (row_offset, cells) in values.iter().enumerate() {
            for (col_offset, value) in cells.iter().enumerate() {
                self.put_cell(
                    to_db_index(row + row_offset)?,
                    to_db_index(col + col_offset)?,
                    value,
                )?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn clear_range(
        &self,
        row: usize,
        col: usize,
        num_rows: usize,
        num_cols: usize,
    ) -> RepoResult<()> {
        ensure_origin(row, col)?;
        if num_rows == 0 || num_cols == 0 {
            return Ok(());
        }
        self.conn.execute(
            "DELETE FROM sheet_cells
             WHERE sheet = ?1
               AND row_index BETWEEN ?2 AND ?3
               AND col_index BETWEEN ?4 AND ?5;",
            params![
                self.sheet,
                to_db_index(row)?,
                to_db_index(row + num_rows - 1)?,
                to_db_index(col)?,
                to_db_index(col + num_cols - 1)?,
            ],
        )?;
        Ok(())
    }

    fn append_row(&self, values: &[String]) -> RepoResult<()> {
        let next_row = self.last_row()? + 1;
        self.write_range(next_row, 1, &[values.to_vec()])
    }

    fn delete_row(&self, row: usize) -> RepoResult<()> {
        ensure_origin(row, 1)?;
        let row = to_db_index(row)?;
        let tx = self.conn.unchecked_transaction()?;
        self.shift_cells_up(row)?;
        self.shift_styles_up(row)?;
        tx.commit()?;
        Ok(())
    }

    fn last_row(&self) -> RepoResult<usize> {
        let last: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(row_index), 0) FROM sheet_cells WHERE sheet = ?1;",
            [self.sheet.as_str()],
            |row| row.get(0),
        )?;
        from_db_index(last)
    }

    fn format_range(
        &self,
        row: usize,
        col: usize,
        num_cols: usize,
        style: &CellStyle,
    ) -> RepoResult<()> {
        ensure_origin(row, col)?;
        let tx = self.conn.unchecked_transaction()?;
        for offset in 0..num_cols {
            self.conn.execute(
                "INSERT INTO sheet_styles (sheet, row_index, col_index, bold, background, bordered)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (sheet, row_index, col_index) DO UPDATE SET
                    bold = excluded.bold,
                    background = excluded.background,
                    bordered = excluded.bordered;",
                params![
                    self.sheet,
                    to_db_index(row)?,
                    to_db_index(col + offset)?,
                    bool_to_int(style.bold),
                    style.background.as_deref(),
                    bool_to_int(style.bordered),
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn to_db_index(value: usize) -> RepoResult<i64> {
    i64::try_from(value)
        .map_err(|_| StorageError::InvalidRange(format!("index {value} exceeds storage range")))
}

fn from_db_index(value: i64) -> RepoResult<usize> {
    usize::try_from(value)
        .map_err(|_| StorageError::InvalidData(format!("negative cell index `{value}`")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
