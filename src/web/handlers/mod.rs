//! API handlers for Web API.

pub mod file;

pub use file::*;

use std::sync::Arc;

use crate::file::BlobStore;
use crate::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Metadata store.
    pub db: Arc<Database>,
    /// Blob store.
    pub blob_store: Arc<dyn BlobStore>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Arc<Database>, blob_store: Arc<dyn BlobStore>) -> Self {
        Self { db, blob_store }
    }
}
