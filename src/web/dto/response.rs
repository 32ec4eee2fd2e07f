//! Response DTOs for the Web API.

use serde::Serialize;
use utoipa::ToSchema;

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ============================================================================
// File DTOs
// ============================================================================

/// Owner information in file responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct OwnerInfo {
    /// Owner user id.
    pub user_id: String,
    /// Display name from the synced profile, or the bare user id when no
    /// profile exists.
    pub name: String,
    /// Avatar image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// File response.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileResponse {
    /// File ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// File kind (image, pdf, csv).
    pub kind: String,
    /// Whether the requesting caller has favorited this file.
    pub is_favorited: bool,
    /// Resolved display URL; null when the blob store could not resolve
    /// the reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Owner info.
    pub owner: OwnerInfo,
    /// Registration timestamp (RFC3339).
    pub created_at: String,
}

/// Favorite toggle response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleFavoriteResponse {
    /// Whether the file is favorited after the toggle.
    pub favorited: bool,
}
