//! Error types for Filedock.

use thiserror::Error;

/// Common error type for Filedock.
#[derive(Error, Debug)]
pub enum FiledockError {
    /// Database error.
    ///
    /// Wraps errors from any database backend. Errors from sqlx are
    /// converted automatically.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input from a caller.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Resource absent or outside the caller's visibility.
    ///
    /// The two cases share one variant: a caller must not be able to tell
    /// "does not exist" apart from "exists in a foreign scope".
    #[error("{0} not found")]
    NotFound(String),

    /// Role-gated operation attempted without the required role.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// An external collaborator (blob store, identity provider) is
    /// unreachable or misbehaving.
    #[error("upstream unavailable: {0}")]
    Upstream(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for FiledockError {
    fn from(e: sqlx::Error) -> Self {
        FiledockError::Database(e.to_string())
    }
}

/// Result type alias for Filedock operations.
pub type Result<T> = std::result::Result<T, FiledockError>;
