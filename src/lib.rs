//! Filebox - file management HTTP API
//!
//! Uploads are validated, written to a blob directory and recorded in a
//! SQLite metadata store.

pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{FileboxError, Result};
pub use file::{
    BlobStore, DeleteOutcome, FileRecord, FileService, LocalBlobStore, UpdateOutcome,
    UploadOutcome,
};
pub use web::WebServer;
