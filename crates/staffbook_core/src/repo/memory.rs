//! In-memory table and file stores.
//!
//! Used as injected fakes by tests and by callers that do not need
//! persistence. State sits behind `RefCell`, so these stores are not `Sync`.

use crate::repo::file_repo::{FileId, FileStore, FolderId, NewFile, StoredFile};
use crate::repo::table_repo::{CellStyle, TableStore};
use crate::repo::{ensure_origin, RepoResult, StorageError};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Grid of rows held in memory. Row `n` lives at index `n - 1`.
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    rows: RefCell<Vec<Vec<String>>>,
    styles: RefCell<BTreeMap<(usize, usize), CellStyle>>,
    mutations: Cell<usize>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the grid; the first row is row 1.
    pub fn with_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Self {
            rows: RefCell::new(rows),
            ..Self::default()
        }
    }

    /// Copy of every stored row, trailing blank rows included.
    pub fn snapshot(&self) -> Vec<Vec<String>> {
        self.rows.borrow().clone()
    }

    /// Number of mutating calls (write, clear, append, delete, format) so far.
    pub fn mutation_count(&self) -> usize {
        self.mutations.get()
    }

    pub fn cell_style(&self, row: usize, col: usize) -> Option<CellStyle> {
        self.styles.borrow().get(&(row, col)).cloned()
    }

    fn record_mutation(&self) {
        self.mutations.set(self.mutations.get() + 1);
    }

    fn put(&self, row: usize, col: usize, value: &str) {
        let mut rows = self.rows.borrow_mut();
        if rows.len() < row {
            rows.resize_with(row, Vec::new);
        }
        let cells = &mut rows[row - 1];
        if cells.len() < col {
            cells.resize(col, String::new());
        }
        cells[col - 1] = value.to_string();
    }
}

impl TableStore for MemoryTableStore {
    fn read_range(
        &self,
        row: usize,
        col: usize,
        num_rows: usize,
        num_cols: usize,
    ) -> RepoResult<Vec<Vec<String>>> {
        ensure_origin(row, col)?;
        let rows = self.rows.borrow();
        let grid = (row..row + num_rows)
            .map(|r| {
                (col..col + num_cols)
                    .map(|c| {
                        rows.get(r - 1)
                            .and_then(|cells| cells.get(c - 1))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();
        Ok(grid)
    }

    fn write_range(&self, row: usize, col: usize, values: &[Vec<String>]) -> RepoResult<()> {
        ensure_origin(row, col)?;
        self.record_mutation();
        for (row_offset, cells) in values.iter().enumerate() {
            for (col_offset, value) in cells.iter().enumerate() {
                self.put(row + row_offset, col + col_offset, value);
            }
        }
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
        self.record_mutation();
        let mut rows = self.rows.borrow_mut();
        for cells in rows.iter_mut().skip(row - 1).take(num_rows) {
            for value in cells.iter_mut().skip(col - 1).take(num_cols) {
                value.clear();
            }
        }
        Ok(())
    }

    fn append_row(&self, values: &[String]) -> RepoResult<()> {
        let next_row = self.last_row()? + 1;
        self.write_range(next_row, 1, &[values.to_vec()])
    }

    fn delete_row(&self, row: usize) -> RepoResult<()> {
        ensure_origin(row, 1)?;
        self.record_mutation();
        let mut rows = self.rows.borrow_mut();
        if row <= rows.len() {
            rows.remove(row - 1);
        }

        let mut styles = self.styles.borrow_mut();
        let shifted: BTreeMap<_, _> = std::mem::take(&mut *styles)
            .into_iter()
            .filter(|((style_row, _), _)| *style_row != row)
            .map(|((style_row, col), style)| {
                let style_row = if style_row > row { style_row - 1 } else { style_row };
                ((style_row, col), style)
            })
            .collect();
        *styles = shifted;
        Ok(())
    }

    fn last_row(&self) -> RepoResult<usize> {
        let rows = self.rows.borrow();
        let last = rows
            .iter()
            .rposition(|cells| cells.iter().any(|value| !value.is_empty()))
            .map_or(0, |index| index + 1);
        Ok(last)
    }

    fn format_range(
        &self,
        row: usize,
        col: usize,
        num_cols: usize,
        style: &CellStyle,
    ) -> RepoResult<()> {
        ensure_origin(row, col)?;
        self.record_mutation();
        let mut styles = self.styles.borrow_mut();
        for c in col..col + num_cols {
            styles.insert((row, c), style.clone());
        }
        Ok(())
    }
}

/// Folders and files held in memory with sequential ids.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    folders: RefCell<Vec<(FolderId, String)>>,
    files: RefCell<Vec<StoredFile>>,
    next_id: Cell<u64>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn folder_count(&self) -> usize {
        self.folders.borrow().len()
    }

    pub fn files(&self) -> Vec<StoredFile> {
        self.files.borrow().clone()
    }

    fn allocate_id(&self, prefix: &str) -> String {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        format!("{prefix}-{id}")
    }
}

impl FileStore for MemoryFileStore {
    fn find_folders(&self, name: &str) -> RepoResult<Vec<FolderId>> {
        Ok(self
            .folders
            .borrow()
            .iter()
            .filter(|(_, folder_name)| folder_name == name)
            .map(|(id, _)| id.clone())
            .collect())
    }

    fn create_folder(&self, name: &str) -> RepoResult<FolderId> {
        let id = self.allocate_id("folder");
        self.folders
            .borrow_mut()
            .push((id.clone(), name.to_string()));
        Ok(id)
    }

    fn create_file(&self, folder: &str, file: &NewFile<'_>) -> RepoResult<FileId> {
        if !self.folders.borrow().iter().any(|(id, _)| id == folder) {
            return Err(StorageError::UnknownFolder(folder.to_string()));
        }
        let id = self.allocate_id("file");
        self.files.borrow_mut().push(StoredFile {
            id: id.clone(),
            folder_id: folder.to_string(),
            name: file.name.to_string(),
            mime_type: file.mime_type.to_string(),
            bytes: file.bytes.to_vec(),
        });
        Ok(id)
    }

    fn get_file(&self, id: &str) -> RepoResult<Option<StoredFile>> {
        Ok(self.files.borrow().iter().find(|file| file.id == id).cloned())
    }
}
