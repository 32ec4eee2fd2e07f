//! The read path of the registry.
//!
//! Composes the file store, the favorite store, the text filter and the
//! blob store boundary into the single listing the presentation layer
//! consumes: files annotated with favorite status and a resolved URL.

use sqlx::SqlitePool;
use tracing::warn;

use crate::identity::Scope;
use crate::storage::BlobStore;
use crate::Result;

use super::favorite::FavoriteRepository;
use super::file::{FileRecord, FileRepository};

/// Filters applied on top of the caller's scope.
///
/// All filters are conjunctive: scope AND substring AND (favorites_only ⇒
/// favorited).
#[derive(Debug, Clone, Default)]
pub struct FileQuery {
    /// Case-insensitive substring to match against file names.
    pub text: Option<String>,
    /// Retain only files the caller has favorited.
    pub favorites_only: bool,
}

impl FileQuery {
    /// Create an unfiltered query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text filter.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Retain only favorited files.
    pub fn favorites_only(mut self) -> Self {
        self.favorites_only = true;
        self
    }
}

/// A file annotated for presentation.
#[derive(Debug, Clone)]
pub struct FileListing {
    /// The file record.
    pub file: FileRecord,
    /// Whether the requesting caller has favorited this file.
    pub is_favorited: bool,
    /// Resolved display URL, or None if the blob store could not resolve
    /// the reference.
    pub url: Option<String>,
}

/// Query engine over the file and favorite stores.
pub struct QueryEngine<'a> {
    pool: &'a SqlitePool,
    blob_store: &'a dyn BlobStore,
}

impl<'a> QueryEngine<'a> {
    /// Create a new QueryEngine.
    pub fn new(pool: &'a SqlitePool, blob_store: &'a dyn BlobStore) -> Self {
        Self { pool, blob_store }
    }

    /// List the active files visible to a caller.
    ///
    /// Never returns a file outside the resolved scope and never returns a
    /// soft-deleted file, regardless of the filter combination. A blob
    /// store failure degrades that file's URL to None instead of failing
    /// the query.
    pub async fn get_files(
        &self,
        scope: &Scope,
        caller_user_id: &str,
        query: &FileQuery,
    ) -> Result<Vec<FileListing>> {
        let mut files = FileRepository::new(self.pool)
            .list_by_scope(&scope.id, false)
            .await?;

        if let Some(needle) = query.text.as_deref().map(str::trim) {
            if !needle.is_empty() {
                let needle = needle.to_lowercase();
                files.retain(|f| f.name.to_lowercase().contains(&needle));
            }
        }

        let mut listings = self.annotate(files, caller_user_id).await?;

        if query.favorites_only {
            listings.retain(|l| l.is_favorited);
        }

        Ok(listings)
    }

    /// List the soft-deleted files of a scope (the trash view).
    ///
    /// This is the explicit trash path; `get_files` never surfaces these.
    pub async fn list_trash(
        &self,
        scope: &Scope,
        caller_user_id: &str,
    ) -> Result<Vec<FileListing>> {
        let files = FileRepository::new(self.pool)
            .list_deleted(&scope.id)
            .await?;

        self.annotate(files, caller_user_id).await
    }

    /// Annotate records with favorite status and a resolved URL.
    async fn annotate(
        &self,
        files: Vec<FileRecord>,
        caller_user_id: &str,
    ) -> Result<Vec<FileListing>> {
        let favorites = FavoriteRepository::new(self.pool)
            .list_by_caller(caller_user_id)
            .await?;

        let listings = files
            .into_iter()
            .map(|file| {
                let url = match self.blob_store.resolve_url(&file.storage_ref) {
                    Ok(url) => Some(url),
                    Err(e) => {
                        warn!(file_id = file.id, error = %e, "URL resolution failed");
                        None
                    }
                };
                let is_favorited = favorites.contains(&file.id);

                FileListing {
                    file,
                    is_favorited,
                    url,
                }
            })
            .collect();

        Ok(listings)
    }
}
