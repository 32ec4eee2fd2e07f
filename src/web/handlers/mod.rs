//! API handlers for the Web API.

pub mod favorites;
pub mod files;

pub use favorites::*;
pub use files::*;

use std::sync::Arc;

use crate::storage::BlobStore;
use crate::Database;

/// Shared database handle.
pub type SharedDatabase = Arc<Database>;

/// Application state shared across handlers.
pub struct AppState {
    /// Database handle.
    pub db: SharedDatabase,
    /// Blob store boundary for URL resolution.
    pub blob_store: Arc<dyn BlobStore>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: SharedDatabase, blob_store: Arc<dyn BlobStore>) -> Self {
        Self { db, blob_store }
    }
}
