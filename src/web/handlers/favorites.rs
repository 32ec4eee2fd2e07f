//! Favorite handlers for the Web API.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use utoipa;

use crate::registry::FavoriteRepository;
use crate::web::dto::{ApiResponse, ToggleFavoriteResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /api/files/:id/favorite - Toggle a favorite on a file.
#[utoipa::path(
    post,
    path = "/files/{id}/favorite",
    tag = "favorites",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "Favorite toggled", body = ToggleFavoriteResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not available")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Json<ApiResponse<ToggleFavoriteResponse>>, ApiError> {
    let caller = claims.caller();
    let scope = caller.resolve_scope();

    let favorited = FavoriteRepository::new(state.db.pool())
        .toggle(file_id, &caller.user_id, &scope.id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::new(ToggleFavoriteResponse { favorited })))
}
