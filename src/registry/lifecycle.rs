//! File lifecycle state machine and authority.
//!
//! Every deletion is two-phase: files move to a soft-deleted state first
//! and only leave it by an admin restore or the purge sweep. The authority
//! here is the single owner of the `should_delete` flag and of the
//! role/scope checks around it; nothing in the presentation layer decides
//! who may delete or restore.

use sqlx::SqlitePool;
use tracing::info;

use crate::identity::Scope;
use crate::{FiledockError, Result};

use super::file::{FileRecord, FileRepository};

/// Lifecycle state of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Visible in default listings.
    Active,
    /// Marked for deletion; restorable until purged.
    SoftDeleted,
    /// Permanently removed. Terminal.
    Purged,
}

impl FileState {
    /// The state a stored record is in.
    pub fn of(record: &FileRecord) -> Self {
        if record.should_delete {
            FileState::SoftDeleted
        } else {
            FileState::Active
        }
    }

    /// Whether a transition between two states is allowed.
    ///
    /// Active files can only be soft-deleted; soft-deleted files can be
    /// restored or purged; nothing leaves Purged. There is no direct
    /// Active → Purged path: every deletion passes through the grace
    /// period.
    pub fn can_transition(self, to: FileState) -> bool {
        matches!(
            (self, to),
            (FileState::Active, FileState::SoftDeleted)
                | (FileState::SoftDeleted, FileState::Active)
                | (FileState::SoftDeleted, FileState::Purged)
        )
    }
}

/// Authority over file lifecycle transitions.
pub struct LifecycleAuthority<'a> {
    pool: &'a SqlitePool,
}

impl<'a> LifecycleAuthority<'a> {
    /// Create a new LifecycleAuthority with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch a file, conflating "missing" and "outside the requester's
    /// scope" into one NotFound.
    async fn get_in_scope(&self, file_id: i64, scope: &Scope) -> Result<FileRecord> {
        let file = FileRepository::new(self.pool).get_by_id(file_id).await?;

        match file {
            Some(f) if f.scope_id == scope.id => Ok(f),
            _ => Err(FiledockError::NotFound("file".to_string())),
        }
    }

    /// Soft-delete a file (Active → SoftDeleted).
    ///
    /// Any member of the file's scope may do this. Idempotent: marking an
    /// already-marked file succeeds without effect.
    pub async fn mark_for_deletion(&self, file_id: i64, scope: &Scope) -> Result<()> {
        let file = self.get_in_scope(file_id, scope).await?;

        if file.should_delete {
            return Ok(());
        }

        FileRepository::new(self.pool)
            .set_should_delete(file_id, true)
            .await?;

        info!(file_id, scope_id = %scope.id, "File marked for deletion");
        Ok(())
    }

    /// Restore a soft-deleted file (SoftDeleted → Active).
    ///
    /// Admin-only within the file's scope. The scope check runs first, so
    /// an admin of another scope sees NotFound, not PermissionDenied.
    /// Idempotent on an already-active file.
    pub async fn restore(&self, file_id: i64, scope: &Scope) -> Result<()> {
        let file = self.get_in_scope(file_id, scope).await?;

        if !scope.is_admin() {
            return Err(FiledockError::PermissionDenied(
                "restoring a file requires the admin role".to_string(),
            ));
        }

        if !file.should_delete {
            return Ok(());
        }

        FileRepository::new(self.pool)
            .set_should_delete(file_id, false)
            .await?;

        info!(file_id, scope_id = %scope.id, "File restored");
        Ok(())
    }

    /// Permanently remove a soft-deleted file (SoftDeleted → Purged).
    ///
    /// Invoked by the sweep policy, never by end-user requests. Purging an
    /// active file is a contract violation and is rejected. Returns false
    /// if the file is already gone.
    pub async fn purge(&self, file_id: i64) -> Result<bool> {
        let repo = FileRepository::new(self.pool);

        let file = match repo.get_by_id(file_id).await? {
            Some(f) => f,
            None => return Ok(false),
        };

        if !FileState::of(&file).can_transition(FileState::Purged) {
            return Err(FiledockError::InvalidArgument(
                "only files marked for deletion can be purged".to_string(),
            ));
        }

        let purged = repo.purge(file_id).await?;
        if purged {
            info!(file_id, "File purged");
        }
        Ok(purged)
    }

    /// Purge every soft-deleted file. Returns the number purged.
    pub async fn sweep(&self) -> Result<u64> {
        let purged = FileRepository::new(self.pool).purge_marked().await?;
        if purged > 0 {
            info!(purged, "Purge sweep removed soft-deleted files");
        }
        Ok(purged)
    }
}
