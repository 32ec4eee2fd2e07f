//! User profiles synced from the identity provider.
//!
//! The registry reads profiles for display annotation only. Rows are
//! written by the identity provider sync, never by request handlers.

use sqlx::SqlitePool;

use crate::{FiledockError, Result};

/// Display profile for a user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserProfile {
    /// User id, as issued by the identity provider.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Avatar image URL.
    pub image: Option<String>,
    /// When this row was last synced.
    pub updated_at: String,
}

/// Repository for user profile lookups.
pub struct UserProfileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserProfileRepository<'a> {
    /// Create a new UserProfileRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a profile by user id.
    pub async fn get_by_user_id(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT user_id, name, image, updated_at FROM user_profiles WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| FiledockError::Database(e.to_string()))?;

        Ok(profile)
    }

    /// Insert or update a profile.
    ///
    /// This is the identity provider's sync entry point.
    pub async fn upsert(&self, user_id: &str, name: &str, image: Option<&str>) -> Result<()> {
        sqlx::query(
            "INSERT INTO user_profiles (user_id, name, image)
             VALUES (?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                 name = excluded.name,
                 image = excluded.image,
                 updated_at = datetime('now')",
        )
        .bind(user_id)
        .bind(name)
        .bind(image)
        .execute(self.pool)
        .await
        .map_err(|e| FiledockError::Database(e.to_string()))?;

        Ok(())
    }
}
