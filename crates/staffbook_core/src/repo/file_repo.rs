//! Folder/file store contract and SQLite implementation.
//!
//! # Responsibility
//! - Look up and create named folders.
//! - Persist raw file bytes under a folder and hand back a stable id.
//!
//! # Invariants
//! - Folder names are not unique; lookups return matches in creation order.
//! - File ids are never reused and files are never modified after creation.

use crate::repo::{RepoResult, StorageError};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

pub type FolderId = String;
pub type FileId = String;

/// File contents handed to `FileStore::create_file`.
#[derive(Debug, Clone, Copy)]
pub struct NewFile<'a> {
    pub name: &'a str,
    pub mime_type: &'a str,
    pub bytes: &'a [u8],
}

/// File as read back from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub id: FileId,
    pub folder_id: FolderId,
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub trait FileStore {
    /// Returns every folder named exactly `name`, oldest first.
    fn find_folders(&self, name: &str) -> RepoResult<Vec<FolderId>>;
    fn create_folder(&self, name: &str) -> RepoResult<FolderId>;
    fn create_file(&self, folder: &str, file: &NewFile<'_>) -> RepoResult<FileId>;
    fn get_file(&self, id: &str) -> RepoResult<Option<StoredFile>>;
}

impl<T: FileStore + ?Sized> FileStore for &T {
    fn find_folders(&self, name: &str) -> RepoResult<Vec<FolderId>> {
        (**self).find_folders(name)
    }

    fn create_folder(&self, name: &str) -> RepoResult<FolderId> {
        (**self).create_folder(name)
    }

    fn create_file(&self, folder: &str, file: &NewFile<'_>) -> RepoResult<FileId> {
        (**self).create_file(folder, file)
    }

    fn get_file(&self, id: &str) -> RepoResult<Option<StoredFile>> {
        (**self).get_file(id)
    }
}

/// SQLite-backed file store with UUID v4 identifiers.
pub struct SqliteFileStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFileStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl FileStore for SqliteFileStore<'_> {
    fn find_folders(&self, name: &str) -> RepoResult<Vec<FolderId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM file_folders WHERE name = ?1 ORDER BY rowid ASC;")?;
        let ids = stmt.query_map([name], |row| row.get::<_, String>(0))?;
        Ok(ids.collect::<Result<Vec<_>, _>>()?)
    }

    fn create_folder(&self, name: &str) -> RepoResult<FolderId> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO file_folders (id, name) VALUES (?1, ?2);",
            params![id, name],
        )?;
        Ok(id)
    }

    fn create_file(&self, folder: &str, file: &NewFile<'_>) -> RepoResult<FileId> {
        let folder_exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM file_folders WHERE id = ?1);",
            [folder],
            |row| row.get(0),
        )?;
        if folder_exists == 0 {
            return Err(StorageError::UnknownFolder(folder.to_string()));
        }

        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO stored_files (id, folder_id, name, mime_type, bytes)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![id, folder, file.name, file.mime_type, file.bytes],
        )?;
        Ok(id)
    }

    fn get_file(&self, id: &str) -> RepoResult<Option<StoredFile>> {
        let file = self
            .conn
            .query_row(
                "SELECT id, folder_id, name, mime_type, bytes FROM stored_files WHERE id = ?1;",
                [id],
                |row| {
                    Ok(StoredFile {
                        id: row.get(0)?,
                        folder_id: row.get(1)?,
                        name: row.get(2)?,
                        mime_type: row.get(3)?,
                        bytes: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(file)
    }
}
