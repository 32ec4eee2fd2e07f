//! Favorite join records for the Filedock registry.

use std::collections::HashSet;

use sqlx::SqlitePool;

use crate::{FiledockError, Result};

/// A favorite: one caller marking one file.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Favorite {
    /// Unique favorite ID.
    pub id: i64,
    /// The favorited file.
    pub file_id: i64,
    /// The caller who favorited it.
    pub favorited_by: String,
    /// When the favorite was created.
    pub created_at: String,
}

/// Repository for favorite operations.
pub struct FavoriteRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FavoriteRepository<'a> {
    /// Create a new FavoriteRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Toggle a favorite for a caller on a file in their scope.
    ///
    /// Removes an existing favorite (returns false) or creates one
    /// (returns true). The existence check and flip run in one transaction
    /// over the unique `(file_id, favorited_by)` index, so concurrent
    /// toggles by the same caller serialize without lost updates.
    ///
    /// Fails with `NotFound` if the file does not exist in the caller's
    /// scope; whether it exists elsewhere is not revealed. Soft-deleted
    /// files stay favoritable so favorite state survives a delete/restore
    /// cycle.
    pub async fn toggle(
        &self,
        file_id: i64,
        caller_user_id: &str,
        scope_id: &str,
    ) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| FiledockError::Database(e.to_string()))?;

        let visible: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM files WHERE id = ? AND scope_id = ?")
                .bind(file_id)
                .bind(scope_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| FiledockError::Database(e.to_string()))?;

        if visible.is_none() {
            return Err(FiledockError::NotFound("file".to_string()));
        }

        let removed = sqlx::query("DELETE FROM favorites WHERE file_id = ? AND favorited_by = ?")
            .bind(file_id)
            .bind(caller_user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| FiledockError::Database(e.to_string()))?;

        let favorited = if removed.rows_affected() > 0 {
            false
        } else {
            sqlx::query("INSERT INTO favorites (file_id, favorited_by) VALUES (?, ?)")
                .bind(file_id)
                .bind(caller_user_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| FiledockError::Database(e.to_string()))?;
            true
        };

        tx.commit()
            .await
            .map_err(|e| FiledockError::Database(e.to_string()))?;

        Ok(favorited)
    }

    /// Get the set of file ids a caller has favorited.
    ///
    /// Returned as a set so favorited-status checks during annotation are
    /// O(1) per file.
    pub async fn list_by_caller(&self, caller_user_id: &str) -> Result<HashSet<i64>> {
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT file_id FROM favorites WHERE favorited_by = ?")
                .bind(caller_user_id)
                .fetch_all(self.pool)
                .await
                .map_err(|e| FiledockError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Check whether a caller has favorited a file.
    pub async fn is_favorited(&self, file_id: i64, caller_user_id: &str) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE file_id = ? AND favorited_by = ?)",
        )
        .bind(file_id)
        .bind(caller_user_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| FiledockError::Database(e.to_string()))?;

        Ok(exists.0)
    }
}
