//! Request DTOs for the Web API.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// File registration request.
///
/// The bytes are already in the blob store by the time this arrives; the
/// request only registers the metadata.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFileRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    /// File kind: "image", "pdf" or "csv".
    pub kind: String,
    /// Opaque blob store reference returned by the upload.
    #[validate(length(min = 1, message = "storage_ref must not be empty"))]
    pub storage_ref: String,
}

/// Query parameters for file listing.
#[derive(Debug, Default, Deserialize)]
pub struct FileListQuery {
    /// Case-insensitive substring to match against file names.
    #[serde(default)]
    pub query: Option<String>,
    /// Retain only files the caller has favorited.
    #[serde(default)]
    pub favorites: Option<bool>,
}
