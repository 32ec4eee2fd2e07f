//! File registry module for Filedock.
//!
//! This module is the core of the system:
//! - File metadata store with scope-exact listing
//! - Per-caller favorites with atomic toggle
//! - Two-phase delete lifecycle (soft-delete → restore | purge)
//! - The annotated read path the presentation layer consumes

mod favorite;
mod file;
mod lifecycle;
mod query;

pub use favorite::{Favorite, FavoriteRepository};
pub use file::{FileKind, FileRecord, FileRepository, NewFile};
pub use lifecycle::{FileState, LifecycleAuthority};
pub use query::{FileListing, FileQuery, QueryEngine};

/// Maximum length for a file name (in characters).
pub const MAX_FILE_NAME_LENGTH: usize = 100;
