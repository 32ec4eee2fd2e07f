//! Database schema and migrations for Filedock.
//!
//! This module contains all database migrations that will be applied
//! sequentially when the database is first opened or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - files table
    r#"
-- File metadata registry. The bytes live in an external blob store; a row
-- only carries the opaque storage reference.
CREATE TABLE files (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    name           TEXT NOT NULL,
    kind           TEXT NOT NULL,               -- 'image', 'pdf', 'csv'
    storage_ref    TEXT NOT NULL,               -- opaque blob store reference
    scope_id       TEXT NOT NULL,               -- org id, or user id for personal scope
    owner_user_id  TEXT NOT NULL,
    should_delete  INTEGER NOT NULL DEFAULT 0,  -- 1 = soft-deleted
    created_at     TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_files_scope_id ON files(scope_id);
CREATE INDEX idx_files_scope_active ON files(scope_id, should_delete);
"#,
    // v2: Favorites join table
    r#"
-- Per-caller favorites. One row per (file, caller); toggling flips row
-- existence, and purging a file cascades here.
CREATE TABLE favorites (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id       INTEGER NOT NULL REFERENCES files(id) ON DELETE CASCADE,
    favorited_by  TEXT NOT NULL,
    created_at    TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(file_id, favorited_by)
);

CREATE INDEX idx_favorites_favorited_by ON favorites(favorited_by);
"#,
    // v3: User profiles synced from the identity provider
    r#"
-- Display profiles, read-only to the registry. Rows are written by the
-- identity provider sync, never by request handlers.
CREATE TABLE user_profiles (
    user_id     TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    image       TEXT,
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
];
