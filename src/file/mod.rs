//! File management module for Filebox.
//!
//! This module provides the upload workflow and its collaborators:
//! - File metadata records and the repository persisting them
//! - Blob storage on the local filesystem
//! - The workflow service coordinating validation, blob and metadata writes

mod record;
mod repository;
mod service;
mod storage;

pub use record::{derive_extension, is_allowed_extension, is_allowed_size, FileRecord, NewFileRecord};
pub use repository::FileRecordRepository;
pub use service::{
    DeleteOutcome, FileService, UpdateOutcome, UpdateRequest, UploadOutcome, UploadRequest,
};
pub use storage::{BlobStore, LocalBlobStore};

/// File extensions accepted for upload (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpeg", "jpg", "docx", "pdf", "xlsx"];

/// Maximum file size (5MB).
pub const MAX_FILE_SIZE: i64 = 5 * 1024 * 1024;
