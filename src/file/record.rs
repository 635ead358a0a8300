//! File metadata record and the validation rules applied to it.

use serde::Serialize;

use super::{ALLOWED_EXTENSIONS, MAX_FILE_SIZE};
use crate::{FileboxError, Result};

/// Metadata for a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Unique file ID, assigned on insert.
    pub id: i64,
    /// Original client-supplied filename.
    pub file_name: String,
    /// Absolute location of the blob.
    pub file_path: String,
    /// Extension token.
    pub file_extension: String,
    /// Content length in bytes.
    pub file_size: i64,
}

impl FileRecord {
    /// Fail with the first violated rule, extension before size.
    pub fn validate(&self) -> Result<()> {
        validate_parts(&self.file_extension, self.file_size)
    }
}

/// Data for creating a new file record.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    /// Original filename.
    pub file_name: String,
    /// Extension token.
    pub file_extension: String,
    /// Content length in bytes.
    pub file_size: i64,
    /// Blob location; empty until the blob has been written.
    pub file_path: String,
}

impl NewFileRecord {
    /// Create a candidate record; the path is filled in after the blob write.
    pub fn new(file_name: impl Into<String>, file_extension: impl Into<String>, file_size: i64) -> Self {
        Self {
            file_name: file_name.into(),
            file_extension: file_extension.into(),
            file_size,
            file_path: String::new(),
        }
    }

    /// Set the blob path.
    pub fn with_path(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = file_path.into();
        self
    }

    /// Fail with the first violated rule, extension before size.
    pub fn validate(&self) -> Result<()> {
        validate_parts(&self.file_extension, self.file_size)
    }
}

fn validate_parts(extension: &str, size: i64) -> Result<()> {
    if !is_allowed_extension(extension) {
        return Err(FileboxError::Extension(extension.to_string()));
    }
    if !is_allowed_size(size) {
        return Err(FileboxError::Size(size));
    }
    Ok(())
}

/// Derive the extension from the final `.`-delimited segment of a filename.
///
/// Case is preserved. A name without a `.` or with an empty final segment
/// is rejected as malformed; a trailing dot (`"a.png."`) is not stripped.
pub fn derive_extension(file_name: &str) -> Result<&str> {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Ok(ext),
        _ => Err(FileboxError::MalformedName(file_name.to_string())),
    }
}

/// Whether the extension is in the allow-set (case-insensitive).
pub fn is_allowed_extension(extension: &str) -> bool {
    ALLOWED_EXTENSIONS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(extension))
}

/// Whether the size is within the ceiling.
pub fn is_allowed_size(size: i64) -> bool {
    size <= MAX_FILE_SIZE
}
