//! Error types for Filebox.

use thiserror::Error;

/// Common error type for Filebox.
#[derive(Error, Debug)]
pub enum FileboxError {
    /// The file name has no extension segment to derive an extension from.
    #[error("file name has no extension: {0}")]
    MalformedName(String),

    /// The file extension is not in the allow-set.
    #[error("File extension should one of 'png', 'jpeg', 'jpg', 'docx', 'pdf', 'xlsx'")]
    Extension(String),

    /// The file is larger than the size ceiling.
    #[error("File size cannot exceed 5MB")]
    Size(i64),

    /// Blob store I/O error (read, write or delete).
    #[error("blob I/O error: {0}")]
    BlobIo(#[from] std::io::Error),

    /// Metadata store error.
    ///
    /// Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for FileboxError {
    fn from(e: sqlx::Error) -> Self {
        FileboxError::Database(e.to_string())
    }
}

/// Result type alias for Filebox operations.
pub type Result<T> = std::result::Result<T, FileboxError>;
