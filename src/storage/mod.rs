//! Blob store boundary for Filedock.
//!
//! The registry never stores or serves file bytes; uploads go straight to
//! the external blob store and the registry only keeps the opaque storage
//! reference. The one thing the registry needs from the store is a
//! retrievable URL for display.

use crate::{FiledockError, Result};

/// Boundary to the external blob store.
pub trait BlobStore: Send + Sync {
    /// Resolve a storage reference to a retrievable URL.
    ///
    /// An error here means the store is unavailable for this reference;
    /// callers degrade to listing the file without a URL rather than
    /// failing the query.
    fn resolve_url(&self, storage_ref: &str) -> Result<String>;
}

/// Blob store that resolves references against a public base URL.
///
/// This matches stores that expose uploaded objects under a stable public
/// prefix (CDN or bucket website endpoint).
pub struct PublicUrlBlobStore {
    base_url: String,
}

impl PublicUrlBlobStore {
    /// Create a resolver for the given base URL.
    ///
    /// A trailing slash on the base URL is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl BlobStore for PublicUrlBlobStore {
    fn resolve_url(&self, storage_ref: &str) -> Result<String> {
        if self.base_url.is_empty() {
            return Err(FiledockError::Upstream(
                "no blob store base URL configured".to_string(),
            ));
        }

        Ok(format!(
            "{}/{}",
            self.base_url,
            urlencoding::encode(storage_ref)
        ))
    }
}
