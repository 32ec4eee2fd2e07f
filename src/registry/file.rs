//! File metadata types and repository for the Filedock registry.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::fmt;
use std::str::FromStr;

use crate::datetime::parse_stored;
use crate::{FiledockError, Result};

use super::MAX_FILE_NAME_LENGTH;

/// Kind of a registered file.
///
/// The closed set determines the rendering affordance only; storage
/// mechanics are identical for every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Image, rendered inline.
    Image,
    /// PDF document.
    Pdf,
    /// CSV table.
    Csv,
}

impl FileKind {
    /// Convert kind to its database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Pdf => "pdf",
            FileKind::Csv => "csv",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(FileKind::Image),
            "pdf" => Ok(FileKind::Pdf),
            "csv" => Ok(FileKind::Csv),
            _ => Err(format!("unknown file kind: {s}")),
        }
    }
}

impl TryFrom<String> for FileKind {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// A file in the registry.
///
/// Only metadata lives here; the bytes are in the external blob store
/// behind `storage_ref`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileRecord {
    /// Unique file ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// File kind.
    #[sqlx(try_from = "String")]
    pub kind: FileKind,
    /// Opaque reference into the blob store.
    pub storage_ref: String,
    /// Scope the file is visible in (org id, or user id for personal scope).
    pub scope_id: String,
    /// User who created the file.
    pub owner_user_id: String,
    /// Whether the file is soft-deleted.
    pub should_delete: bool,
    /// When the file was registered.
    pub created_at: String,
}

impl FileRecord {
    /// Get the created_at as DateTime<Utc>.
    pub fn created_at_datetime(&self) -> DateTime<Utc> {
        parse_stored(&self.created_at)
    }
}

/// Data for registering a new file.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// Display name.
    pub name: String,
    /// File kind.
    pub kind: FileKind,
    /// Opaque reference into the blob store.
    pub storage_ref: String,
    /// Scope the file belongs to.
    pub scope_id: String,
    /// User who created the file.
    pub owner_user_id: String,
}

impl NewFile {
    /// Create a new NewFile.
    pub fn new(
        name: impl Into<String>,
        kind: FileKind,
        storage_ref: impl Into<String>,
        scope_id: impl Into<String>,
        owner_user_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            storage_ref: storage_ref.into(),
            scope_id: scope_id.into(),
            owner_user_id: owner_user_id.into(),
        }
    }
}

/// Repository for file metadata operations.
pub struct FileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new file.
    ///
    /// Returns the created record. Fails with `InvalidArgument` on an
    /// empty or over-long name, or an empty storage reference.
    pub async fn create(&self, file: &NewFile) -> Result<FileRecord> {
        let name = file.name.trim();
        if name.is_empty() {
            return Err(FiledockError::InvalidArgument(
                "file name must not be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_FILE_NAME_LENGTH {
            return Err(FiledockError::InvalidArgument(format!(
                "file name must be at most {MAX_FILE_NAME_LENGTH} characters"
            )));
        }
        if file.storage_ref.is_empty() {
            return Err(FiledockError::InvalidArgument(
                "storage reference must not be empty".to_string(),
            ));
        }

        let result = sqlx::query(
            "INSERT INTO files (name, kind, storage_ref, scope_id, owner_user_id)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(file.kind.as_str())
        .bind(&file.storage_ref)
        .bind(&file.scope_id)
        .bind(&file.owner_user_id)
        .execute(self.pool)
        .await
        .map_err(|e| FiledockError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| FiledockError::NotFound("file".to_string()))
    }

    /// Get a file by ID, regardless of scope or deletion state.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<FileRecord>> {
        let file = sqlx::query_as::<_, FileRecord>(
            "SELECT id, name, kind, storage_ref, scope_id, owner_user_id, should_delete, created_at
             FROM files WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| FiledockError::Database(e.to_string()))?;

        Ok(file)
    }

    /// List files in a scope, newest first (id as tiebreak).
    ///
    /// When `include_deleted` is false (the caller-facing default),
    /// soft-deleted files are excluded.
    pub async fn list_by_scope(
        &self,
        scope_id: &str,
        include_deleted: bool,
    ) -> Result<Vec<FileRecord>> {
        let query = if include_deleted {
            "SELECT id, name, kind, storage_ref, scope_id, owner_user_id, should_delete, created_at
             FROM files WHERE scope_id = ?
             ORDER BY created_at DESC, id DESC"
        } else {
            "SELECT id, name, kind, storage_ref, scope_id, owner_user_id, should_delete, created_at
             FROM files WHERE scope_id = ? AND should_delete = 0
             ORDER BY created_at DESC, id DESC"
        };

        let files = sqlx::query_as::<_, FileRecord>(query)
            .bind(scope_id)
            .fetch_all(self.pool)
            .await
            .map_err(|e| FiledockError::Database(e.to_string()))?;

        Ok(files)
    }

    /// List the soft-deleted files of a scope, newest first.
    pub async fn list_deleted(&self, scope_id: &str) -> Result<Vec<FileRecord>> {
        let files = sqlx::query_as::<_, FileRecord>(
            "SELECT id, name, kind, storage_ref, scope_id, owner_user_id, should_delete, created_at
             FROM files WHERE scope_id = ? AND should_delete = 1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(scope_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| FiledockError::Database(e.to_string()))?;

        Ok(files)
    }

    /// Set the soft-delete flag on a file.
    ///
    /// Returns false if the file does not exist. Setting the flag to its
    /// current value is a no-op that still counts as success.
    pub async fn set_should_delete(&self, id: i64, should_delete: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE files SET should_delete = ? WHERE id = ?")
            .bind(should_delete)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| FiledockError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Permanently remove a file.
    ///
    /// Favorites referencing the file are cascade-removed. Returns true if
    /// a file was deleted, false if not found.
    pub async fn purge(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| FiledockError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Permanently remove every soft-deleted file, across all scopes.
    ///
    /// Returns the number of files purged.
    pub async fn purge_marked(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM files WHERE should_delete = 1")
            .execute(self.pool)
            .await
            .map_err(|e| FiledockError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Count active (not soft-deleted) files in a scope.
    pub async fn count_active_by_scope(&self, scope_id: &str) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM files WHERE scope_id = ? AND should_delete = 0",
        )
        .bind(scope_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| FiledockError::Database(e.to_string()))?;

        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    fn sample_file(scope: &str, name: &str) -> NewFile {
        NewFile::new(name, FileKind::Image, format!("blob-{name}"), scope, "user_1")
    }

    #[tokio::test]
    async fn test_create_file() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let file = repo
            .create(&NewFile::new(
                "holiday.png",
                FileKind::Image,
                "blob-1",
                "org_1",
                "user_1",
            ))
            .await
            .unwrap();

        assert_eq!(file.name, "holiday.png");
        assert_eq!(file.kind, FileKind::Image);
        assert_eq!(file.storage_ref, "blob-1");
        assert_eq!(file.scope_id, "org_1");
        assert_eq!(file.owner_user_id, "user_1");
        assert!(!file.should_delete);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let result = repo
            .create(&NewFile::new("  ", FileKind::Pdf, "blob-1", "org_1", "user_1"))
            .await;

        assert!(matches!(result, Err(FiledockError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_long_name() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let long_name = "x".repeat(MAX_FILE_NAME_LENGTH + 1);
        let result = repo
            .create(&NewFile::new(long_name, FileKind::Pdf, "blob-1", "org_1", "user_1"))
            .await;

        assert!(matches!(result, Err(FiledockError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_storage_ref() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let result = repo
            .create(&NewFile::new("report.pdf", FileKind::Pdf, "", "org_1", "user_1"))
            .await;

        assert!(matches!(result, Err(FiledockError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let created = repo.create(&sample_file("org_1", "a.png")).await.unwrap();

        let found = repo.get_by_id(created.id).await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().name, "a.png");

        let not_found = repo.get_by_id(9999).await.unwrap();
        assert!(not_found.is_none());
    }

    #[tokio::test]
    async fn test_list_by_scope_filters_scope() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        repo.create(&sample_file("org_1", "a.png")).await.unwrap();
        repo.create(&sample_file("org_1", "b.png")).await.unwrap();
        repo.create(&sample_file("org_2", "c.png")).await.unwrap();

        let files = repo.list_by_scope("org_1", false).await.unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.scope_id == "org_1"));
    }

    #[tokio::test]
    async fn test_list_by_scope_newest_first() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        repo.create(&sample_file("org_1", "first.png")).await.unwrap();
        repo.create(&sample_file("org_1", "second.png")).await.unwrap();

        // Same created_at second is possible; id is the tiebreak
        let files = repo.list_by_scope("org_1", false).await.unwrap();
        assert_eq!(files[0].name, "second.png");
        assert_eq!(files[1].name, "first.png");
    }

    #[tokio::test]
    async fn test_list_by_scope_excludes_deleted_by_default() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let kept = repo.create(&sample_file("org_1", "kept.png")).await.unwrap();
        let trashed = repo.create(&sample_file("org_1", "trashed.png")).await.unwrap();
        repo.set_should_delete(trashed.id, true).await.unwrap();

        let files = repo.list_by_scope("org_1", false).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].id, kept.id);

        let all = repo.list_by_scope("org_1", true).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_list_deleted() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        repo.create(&sample_file("org_1", "kept.png")).await.unwrap();
        let trashed = repo.create(&sample_file("org_1", "trashed.png")).await.unwrap();
        repo.set_should_delete(trashed.id, true).await.unwrap();

        let deleted = repo.list_deleted("org_1").await.unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].id, trashed.id);
        assert!(deleted[0].should_delete);
    }

    #[tokio::test]
    async fn test_set_should_delete_missing_file() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let updated = repo.set_should_delete(9999, true).await.unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_purge() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let file = repo.create(&sample_file("org_1", "a.png")).await.unwrap();

        let purged = repo.purge(file.id).await.unwrap();
        assert!(purged);
        assert!(repo.get_by_id(file.id).await.unwrap().is_none());

        let purged_again = repo.purge(file.id).await.unwrap();
        assert!(!purged_again);
    }

    #[tokio::test]
    async fn test_purge_marked() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let a = repo.create(&sample_file("org_1", "a.png")).await.unwrap();
        let b = repo.create(&sample_file("org_2", "b.png")).await.unwrap();
        repo.create(&sample_file("org_1", "c.png")).await.unwrap();

        repo.set_should_delete(a.id, true).await.unwrap();
        repo.set_should_delete(b.id, true).await.unwrap();

        let purged = repo.purge_marked().await.unwrap();
        assert_eq!(purged, 2);
        assert_eq!(repo.list_by_scope("org_1", true).await.unwrap().len(), 1);
        assert_eq!(repo.list_by_scope("org_2", true).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_count_active_by_scope() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        assert_eq!(repo.count_active_by_scope("org_1").await.unwrap(), 0);

        repo.create(&sample_file("org_1", "a.png")).await.unwrap();
        let b = repo.create(&sample_file("org_1", "b.png")).await.unwrap();
        repo.set_should_delete(b.id, true).await.unwrap();

        assert_eq!(repo.count_active_by_scope("org_1").await.unwrap(), 1);
    }

    #[test]
    fn test_file_kind_round_trip() {
        assert_eq!("image".parse::<FileKind>().unwrap(), FileKind::Image);
        assert_eq!("PDF".parse::<FileKind>().unwrap(), FileKind::Pdf);
        assert_eq!("csv".parse::<FileKind>().unwrap(), FileKind::Csv);
        assert!("docx".parse::<FileKind>().is_err());
        assert_eq!(FileKind::Csv.to_string(), "csv");
    }
}
