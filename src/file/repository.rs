//! Metadata store for file records.

use sqlx::SqlitePool;

use super::record::{FileRecord, NewFileRecord};
use crate::{FileboxError, Result};

const SELECT_COLUMNS: &str = "SELECT id, file_name, file_path, file_extension, file_size FROM file_info";

/// Repository for file record operations.
pub struct FileRecordRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRecordRepository<'a> {
    /// Create a new FileRecordRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new record and return it with its assigned ID.
    pub async fn create(&self, record: &NewFileRecord) -> Result<FileRecord> {
        let result = sqlx::query(
            "INSERT INTO file_info (file_name, file_path, file_extension, file_size)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&record.file_name)
        .bind(&record.file_path)
        .bind(&record.file_extension)
        .bind(record.file_size)
        .execute(self.pool)
        .await
        .map_err(|e| FileboxError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| FileboxError::NotFound("file record".to_string()))
    }

    /// Get a record by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<FileRecord>> {
        let record = sqlx::query_as::<_, FileRecord>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| FileboxError::Database(e.to_string()))?;

        Ok(record)
    }

    /// Get a record by exact name and size.
    pub async fn get_by_name_and_size(&self, file_name: &str, file_size: i64) -> Result<Option<FileRecord>> {
        let record = sqlx::query_as::<_, FileRecord>(&format!(
            "{SELECT_COLUMNS} WHERE file_name = ? AND file_size = ? ORDER BY id LIMIT 1"
        ))
        .bind(file_name)
        .bind(file_size)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| FileboxError::Database(e.to_string()))?;

        Ok(record)
    }

    /// List all records in ascending ID order.
    pub async fn list_all(&self) -> Result<Vec<FileRecord>> {
        let records = sqlx::query_as::<_, FileRecord>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(self.pool)
            .await
            .map_err(|e| FileboxError::Database(e.to_string()))?;

        Ok(records)
    }

    /// Overwrite name, path, extension and size of an existing record.
    ///
    /// Returns `None` if no row has the record's ID.
    pub async fn save(&self, record: &FileRecord) -> Result<Option<FileRecord>> {
        let result = sqlx::query(
            "UPDATE file_info SET file_name = ?, file_path = ?, file_extension = ?, file_size = ?
             WHERE id = ?",
        )
        .bind(&record.file_name)
        .bind(&record.file_path)
        .bind(&record.file_extension)
        .bind(record.file_size)
        .bind(record.id)
        .execute(self.pool)
        .await
        .map_err(|e| FileboxError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(record.id).await
    }

    /// Delete a record by ID.
    ///
    /// Returns `false` if the record did not exist.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM file_info WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| FileboxError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
