//! File workflow service for Filebox.
//!
//! This module coordinates the two stores:
//! - Upload with duplicate detection, extension and size checks
//! - Listing, single lookup and content retrieval
//! - Update and delete of record plus blob
//!
//! The blob write and the record write are not atomic. A failure between
//! them leaves the blob behind without a record.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::db::Database;
use crate::{FileboxError, Result};

use super::record::{derive_extension, FileRecord, NewFileRecord};
use super::repository::FileRecordRepository;
use super::storage::BlobStore;

/// Request data for file upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Original filename.
    pub file_name: String,
    /// File content.
    pub content: Vec<u8>,
}

impl UploadRequest {
    /// Create a new upload request.
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }
}

/// Request data for replacing a stored file.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    /// Name of the uploaded part; decides where the new blob is written.
    pub uploaded_name: String,
    /// New file content.
    pub content: Vec<u8>,
    /// Name stored on the record.
    pub file_name: String,
    /// Extension stored on the record, as given.
    pub file_extension: String,
}

impl UpdateRequest {
    /// Create a new update request.
    pub fn new(
        uploaded_name: impl Into<String>,
        content: Vec<u8>,
        file_name: impl Into<String>,
        file_extension: impl Into<String>,
    ) -> Self {
        Self {
            uploaded_name: uploaded_name.into(),
            content,
            file_name: file_name.into(),
            file_extension: file_extension.into(),
        }
    }
}

/// Result of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// A new record and blob were written.
    Stored(FileRecord),
    /// A record with the same name and size already existed; nothing was written.
    DuplicateSkipped(FileRecord),
}

impl UploadOutcome {
    /// The record the upload resolved to.
    pub fn record(&self) -> &FileRecord {
        match self {
            UploadOutcome::Stored(record) | UploadOutcome::DuplicateSkipped(record) => record,
        }
    }

    /// Human-readable outcome message.
    pub fn message(&self) -> &'static str {
        "File uploaded successfully"
    }
}

/// Result of an update.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// The record and blob were replaced.
    Updated(FileRecord),
    /// No record has the requested ID.
    NotFound,
    /// A step failed; earlier steps are not rolled back.
    Failed(FileboxError),
}

impl UpdateOutcome {
    /// Human-readable outcome message.
    pub fn message(&self) -> String {
        match self {
            UpdateOutcome::Updated(_) => "File updated successfully".to_string(),
            UpdateOutcome::NotFound => "File not found!".to_string(),
            UpdateOutcome::Failed(e) => e.to_string(),
        }
    }
}

/// Result of a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Record and blob were removed.
    Deleted,
    /// The record delete ran but the blob could not be removed.
    Failed(String),
}

impl DeleteOutcome {
    /// Human-readable outcome message.
    pub fn message(&self) -> &str {
        match self {
            DeleteOutcome::Deleted => "File deleted successfully",
            DeleteOutcome::Failed(msg) => msg,
        }
    }
}

/// File service coordinating the metadata store and the blob store.
pub struct FileService<'a> {
    db: &'a Database,
    blobs: &'a dyn BlobStore,
}

impl<'a> FileService<'a> {
    /// Create a new FileService.
    pub fn new(db: &'a Database, blobs: &'a dyn BlobStore) -> Self {
        Self { db, blobs }
    }

    fn repository(&self) -> FileRecordRepository<'_> {
        FileRecordRepository::new(self.db.pool())
    }

    /// Upload a file.
    ///
    /// An existing record with the same name and size short-circuits the
    /// upload before validation; nothing is written in that case.
    ///
    /// # Errors
    /// - `MalformedName` when the name has no extension segment
    /// - `Extension` when the extension is outside the allow-set
    /// - `Size` when the content exceeds the ceiling
    /// - `BlobIo` / `Database` when a store write fails
    pub async fn upload(&self, request: &UploadRequest) -> Result<UploadOutcome> {
        let extension = derive_extension(&request.file_name)?;
        let candidate = NewFileRecord::new(
            request.file_name.as_str(),
            extension,
            request.content.len() as i64,
        );

        let repo = self.repository();
        if let Some(existing) = repo
            .get_by_name_and_size(&candidate.file_name, candidate.file_size)
            .await?
        {
            info!(
                "File {} ({} bytes) already exists as id {}, skipping",
                existing.file_name, existing.file_size, existing.id
            );
            return Ok(UploadOutcome::DuplicateSkipped(existing));
        }

        info!(
            "Uploading file: name={}, extension={}, size={}",
            candidate.file_name, candidate.file_extension, candidate.file_size
        );
        candidate.validate()?;

        let path = self.blobs.path_for(&candidate.file_name)?;
        self.blobs.write(&path, &request.content)?;

        let to_save = NewFileRecord {
            file_extension: candidate.file_extension.to_lowercase(),
            ..candidate
        }
        .with_path(path.to_string_lossy());

        let record = repo.create(&to_save).await?;
        Ok(UploadOutcome::Stored(record))
    }

    /// List all files in ascending ID order.
    pub async fn list(&self) -> Result<Vec<FileRecord>> {
        let records = self.repository().list_all().await?;

        debug!("Listing {} files", records.len());
        for record in &records {
            debug!(
                "File id={}, name={}, extension={}, size={}",
                record.id, record.file_name, record.file_extension, record.file_size
            );
        }

        Ok(records)
    }

    /// Get a single file record.
    pub async fn get_single(&self, id: i64) -> Result<Option<FileRecord>> {
        self.repository().get_by_id(id).await
    }

    /// Get the content of a file.
    ///
    /// An unknown ID or an unreadable blob yields empty content.
    pub async fn get_content(&self, id: i64) -> Result<Vec<u8>> {
        let Some(record) = self.get_single(id).await? else {
            return Ok(Vec::new());
        };

        match self.blobs.read(Path::new(&record.file_path)) {
            Ok(content) => Ok(content),
            Err(e) => {
                warn!("Cannot read blob for file {}: {}", id, e);
                Ok(Vec::new())
            }
        }
    }

    /// Replace a file's content, name and extension.
    ///
    /// Validation runs against the record as currently stored, not the
    /// incoming content. The new extension is stored as given.
    pub async fn update(&self, id: i64, request: &UpdateRequest) -> UpdateOutcome {
        let record = match self.get_single(id).await {
            Ok(Some(record)) => record,
            Ok(None) => return UpdateOutcome::NotFound,
            Err(e) => return UpdateOutcome::Failed(e),
        };

        match self.replace(record, request).await {
            Ok(updated) => {
                info!("Updated file {}", id);
                UpdateOutcome::Updated(updated)
            }
            Err(e) => {
                warn!("Update of file {} failed: {}", id, e);
                UpdateOutcome::Failed(e)
            }
        }
    }

    async fn replace(&self, mut record: FileRecord, request: &UpdateRequest) -> Result<FileRecord> {
        record.validate()?;

        self.blobs.delete(Path::new(&record.file_path))?;

        let path = self.blobs.path_for(&request.uploaded_name)?;
        self.blobs.write(&path, &request.content)?;

        record.file_name = request.file_name.clone();
        record.file_extension = request.file_extension.clone();
        record.file_path = path.to_string_lossy().into_owned();
        record.file_size = request.content.len() as i64;

        self.repository()
            .save(&record)
            .await?
            .ok_or_else(|| FileboxError::NotFound("file record".to_string()))
    }

    /// Delete a file record and its blob.
    ///
    /// The record delete runs even when no record exists. Blob failures are
    /// reported through the outcome; metadata store failures are returned
    /// as errors.
    pub async fn delete(&self, id: i64) -> Result<DeleteOutcome> {
        let record = self.get_single(id).await?;
        if record.is_none() {
            info!("File not found with id {}", id);
        }

        info!("Deleting file with id {}", id);
        self.repository().delete(id).await?;

        let blob_result = match record {
            Some(record) => self.blobs.delete(Path::new(&record.file_path)),
            None => Err(FileboxError::BlobIo(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no blob path for file {id}"),
            ))),
        };

        match blob_result {
            Ok(()) => Ok(DeleteOutcome::Deleted),
            Err(e) => {
                warn!("Blob for file {} couldn't be deleted: {}", id, e);
                Ok(DeleteOutcome::Failed(format!("File couldn't be deleted: {e}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{LocalBlobStore, MAX_FILE_SIZE};
    use tempfile::TempDir;

    struct Fixture {
        db: Database,
        blobs: LocalBlobStore,
        _temp_dir: TempDir,
    }

    impl Fixture {
        fn service(&self) -> FileService<'_> {
            FileService::new(&self.db, &self.blobs)
        }

        fn blob_count(&self) -> usize {
            std::fs::read_dir(self.blobs.root()).unwrap().count()
        }
    }

    async fn setup() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let blobs = LocalBlobStore::new(temp_dir.path()).unwrap();
        let db = Database::open_in_memory().await.unwrap();
        Fixture {
            db,
            blobs,
            _temp_dir: temp_dir,
        }
    }

    async fn upload(fx: &Fixture, name: &str, content: &[u8]) -> FileRecord {
        match fx
            .service()
            .upload(&UploadRequest::new(name, content.to_vec()))
            .await
            .unwrap()
        {
            UploadOutcome::Stored(record) => record,
            other => panic!("expected a stored upload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_stores_record_and_blob() {
        let fx = setup().await;

        let record = upload(&fx, "photo.PNG", &[7u8; 1000]).await;

        assert_eq!(record.file_name, "photo.PNG");
        assert_eq!(record.file_extension, "png");
        assert_eq!(record.file_size, 1000);
        assert_eq!(
            record.file_path,
            fx.blobs.root().join("photo.PNG").to_string_lossy()
        );
        assert_eq!(std::fs::read(&record.file_path).unwrap(), vec![7u8; 1000]);
    }

    #[tokio::test]
    async fn test_upload_rejects_extension() {
        let fx = setup().await;
        let service = fx.service();

        let result = service.upload(&UploadRequest::new("a.exe", vec![0; 10])).await;

        assert!(matches!(result, Err(FileboxError::Extension(_))));
        assert!(service.list().await.unwrap().is_empty());
        assert_eq!(fx.blob_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_rejects_size() {
        let fx = setup().await;
        let service = fx.service();

        let content = vec![0; (MAX_FILE_SIZE + 1) as usize];
        let result = service.upload(&UploadRequest::new("big.pdf", content)).await;

        assert!(matches!(result, Err(FileboxError::Size(_))));
        assert!(service.list().await.unwrap().is_empty());
        assert_eq!(fx.blob_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_accepts_size_at_ceiling() {
        let fx = setup().await;

        let record = upload(&fx, "max.pdf", &vec![1; MAX_FILE_SIZE as usize]).await;
        assert_eq!(record.file_size, MAX_FILE_SIZE);
    }

    #[tokio::test]
    async fn test_upload_rejects_malformed_name() {
        let fx = setup().await;
        let service = fx.service();

        for name in ["README", "archive."] {
            let result = service.upload(&UploadRequest::new(name, vec![1])).await;
            assert!(matches!(result, Err(FileboxError::MalformedName(_))), "{name}");
        }
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_duplicate_is_skipped() {
        let fx = setup().await;
        let service = fx.service();

        let first = upload(&fx, "a.png", &[1; 1000]).await;
        let second = service
            .upload(&UploadRequest::new("a.png", vec![2; 1000]))
            .await
            .unwrap();

        assert_eq!(second, UploadOutcome::DuplicateSkipped(first.clone()));
        assert_eq!(second.message(), "File uploaded successfully");
        assert_eq!(service.list().await.unwrap().len(), 1);
        // Blob was not overwritten
        assert_eq!(service.get_content(first.id).await.unwrap(), vec![1; 1000]);
    }

    #[tokio::test]
    async fn test_upload_same_name_different_size_is_new() {
        let fx = setup().await;
        let service = fx.service();

        upload(&fx, "a.png", &[1; 10]).await;
        let second = upload(&fx, "a.png", &[2; 20]).await;

        assert_eq!(service.list().await.unwrap().len(), 2);
        // Flat namespace: the newer blob replaced the older one
        assert_eq!(service.get_content(second.id).await.unwrap(), vec![2; 20]);
    }

    #[tokio::test]
    async fn test_duplicate_check_precedes_validation() {
        let fx = setup().await;
        let service = fx.service();

        // A stored row that would fail validation still short-circuits
        let stale = NewFileRecord::new("notes.txt", "txt", 3).with_path("/nowhere/notes.txt");
        FileRecordRepository::new(fx.db.pool())
            .create(&stale)
            .await
            .unwrap();

        let outcome = service
            .upload(&UploadRequest::new("notes.txt", b"abc".to_vec()))
            .await
            .unwrap();
        assert!(matches!(outcome, UploadOutcome::DuplicateSkipped(_)));
    }

    #[tokio::test]
    async fn test_list_in_id_order() {
        let fx = setup().await;

        let b = upload(&fx, "b.pdf", b"b").await;
        let a = upload(&fx, "a.pdf", b"a").await;

        let ids: Vec<_> = fx.service().list().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn test_get_single() {
        let fx = setup().await;
        let service = fx.service();

        let record = upload(&fx, "a.jpg", b"jpg").await;

        assert_eq!(service.get_single(record.id).await.unwrap(), Some(record));
        assert!(service.get_single(12345).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_content() {
        let fx = setup().await;
        let service = fx.service();

        let record = upload(&fx, "a.docx", b"document bytes").await;

        assert_eq!(service.get_content(record.id).await.unwrap(), b"document bytes");
        assert!(service.get_content(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_content_missing_blob_is_empty() {
        let fx = setup().await;
        let service = fx.service();

        let record = upload(&fx, "a.xlsx", b"sheet").await;
        std::fs::remove_file(&record.file_path).unwrap();

        assert!(service.get_content(record.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_record_and_blob() {
        let fx = setup().await;
        let service = fx.service();

        let record = upload(&fx, "old.png", b"old").await;
        let request = UpdateRequest::new("new.pdf", b"new content".to_vec(), "renamed", "PDF");

        let outcome = service.update(record.id, &request).await;
        assert_eq!(outcome.message(), "File updated successfully");

        let UpdateOutcome::Updated(updated) = outcome else {
            panic!("expected update to succeed");
        };
        assert_eq!(updated.id, record.id);
        assert_eq!(updated.file_name, "renamed");
        // Extension is stored exactly as given
        assert_eq!(updated.file_extension, "PDF");
        assert_eq!(updated.file_size, 11);
        assert_eq!(
            updated.file_path,
            fx.blobs.root().join("new.pdf").to_string_lossy()
        );

        assert!(!std::path::Path::new(&record.file_path).exists());
        assert_eq!(service.get_content(record.id).await.unwrap(), b"new content");
        assert_eq!(service.get_single(record.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let fx = setup().await;

        let request = UpdateRequest::new("a.png", b"x".to_vec(), "a.png", "png");
        let outcome = fx.service().update(77, &request).await;

        assert!(matches!(outcome, UpdateOutcome::NotFound));
        assert_eq!(outcome.message(), "File not found!");
        assert_eq!(fx.blob_count(), 0);
    }

    #[tokio::test]
    async fn test_update_validates_stored_record() {
        let fx = setup().await;
        let service = fx.service();

        let stale = NewFileRecord::new("notes.txt", "txt", 3).with_path("/nowhere/notes.txt");
        let stored = FileRecordRepository::new(fx.db.pool())
            .create(&stale)
            .await
            .unwrap();

        let request = UpdateRequest::new("notes.pdf", b"pdf".to_vec(), "notes.pdf", "pdf");
        let outcome = service.update(stored.id, &request).await;

        assert!(matches!(outcome, UpdateOutcome::Failed(FileboxError::Extension(_))));
        assert_eq!(
            outcome.message(),
            "File extension should one of 'png', 'jpeg', 'jpg', 'docx', 'pdf', 'xlsx'"
        );
        assert_eq!(service.get_single(stored.id).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn test_update_does_not_validate_new_content() {
        let fx = setup().await;
        let service = fx.service();

        let record = upload(&fx, "a.png", b"png").await;
        let request = UpdateRequest::new("a.exe", b"exe".to_vec(), "a.exe", "exe");

        let outcome = service.update(record.id, &request).await;
        let UpdateOutcome::Updated(updated) = outcome else {
            panic!("expected update to succeed");
        };
        assert_eq!(updated.file_extension, "exe");
    }

    #[tokio::test]
    async fn test_update_missing_old_blob_fails() {
        let fx = setup().await;
        let service = fx.service();

        let record = upload(&fx, "a.png", b"png").await;
        std::fs::remove_file(&record.file_path).unwrap();

        let request = UpdateRequest::new("b.png", b"new".to_vec(), "b.png", "png");
        let outcome = service.update(record.id, &request).await;

        assert!(matches!(outcome, UpdateOutcome::Failed(FileboxError::BlobIo(_))));
        assert_eq!(service.get_single(record.id).await.unwrap(), Some(record));
        assert_eq!(fx.blob_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_blob() {
        let fx = setup().await;
        let service = fx.service();

        let record = upload(&fx, "a.png", &[1; 1000]).await;

        let outcome = service.delete(record.id).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(outcome.message(), "File deleted successfully");

        assert!(service.get_single(record.id).await.unwrap().is_none());
        assert!(service.get_content(record.id).await.unwrap().is_empty());
        assert_eq!(fx.blob_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_missing_record_reports_failure() {
        let fx = setup().await;

        let outcome = fx.service().delete(42).await.unwrap();

        let DeleteOutcome::Failed(message) = outcome else {
            panic!("expected a failure message");
        };
        assert!(message.starts_with("File couldn't be deleted"));
    }

    #[tokio::test]
    async fn test_delete_missing_blob_still_removes_record() {
        let fx = setup().await;
        let service = fx.service();

        let record = upload(&fx, "a.png", b"png").await;
        std::fs::remove_file(&record.file_path).unwrap();

        let outcome = service.delete(record.id).await.unwrap();

        assert!(matches!(outcome, DeleteOutcome::Failed(_)));
        assert!(service.get_single(record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let fx = setup().await;
        fx.db.close().await;
        let service = fx.service();

        let upload = service.upload(&UploadRequest::new("a.png", vec![1])).await;
        assert!(matches!(upload, Err(FileboxError::Database(_))));

        assert!(matches!(service.list().await, Err(FileboxError::Database(_))));
        assert!(matches!(service.delete(1).await, Err(FileboxError::Database(_))));

        let request = UpdateRequest::new("a.png", vec![1], "a.png", "png");
        assert!(matches!(
            service.update(1, &request).await,
            UpdateOutcome::Failed(FileboxError::Database(_))
        ));
        assert_eq!(fx.blob_count(), 0);
    }
}
