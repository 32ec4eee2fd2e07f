//! Filedock - Multi-tenant file registry
//!
//! Tracks metadata for uploaded files (the bytes live in an external blob
//! store), scopes visibility to an organization or an individual user,
//! supports substring search and per-caller favorites, and implements a
//! two-phase delete (soft-delete, then restore or purge) gated by role.

pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod identity;
pub mod logging;
pub mod registry;
pub mod storage;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{FiledockError, Result};
pub use identity::{Caller, Scope, ScopeRole};
pub use registry::{
    FileKind, FileListing, FileQuery, FileRecord, FileRepository, FavoriteRepository,
    LifecycleAuthority, NewFile, QueryEngine,
};
pub use storage::{BlobStore, PublicUrlBlobStore};
pub use web::WebServer;
