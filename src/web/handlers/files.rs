//! File handlers for the Web API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use utoipa;
use validator::Validate;

use crate::datetime::to_rfc3339;
use crate::identity::UserProfileRepository;
use crate::registry::{
    FileKind, FileListing, FileQuery, FileRepository, LifecycleAuthority, NewFile, QueryEngine,
};
use crate::web::dto::{
    ApiResponse, CreateFileRequest, FileListQuery, FileResponse, OwnerInfo,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// Build a FileResponse from an annotated listing, joining in the owner's
/// display profile.
async fn to_file_response(state: &AppState, listing: FileListing) -> FileResponse {
    let profile_repo = UserProfileRepository::new(state.db.pool());

    let owner = profile_repo
        .get_by_user_id(&listing.file.owner_user_id)
        .await
        .ok()
        .flatten()
        .map(|p| OwnerInfo {
            user_id: p.user_id,
            name: p.name,
            image: p.image,
        })
        // A missing profile annotates with the bare user id; it never
        // fails the listing
        .unwrap_or_else(|| OwnerInfo {
            user_id: listing.file.owner_user_id.clone(),
            name: listing.file.owner_user_id.clone(),
            image: None,
        });

    FileResponse {
        id: listing.file.id,
        name: listing.file.name,
        kind: listing.file.kind.to_string(),
        is_favorited: listing.is_favorited,
        url: listing.url,
        owner,
        created_at: to_rfc3339(&listing.file.created_at),
    }
}

async fn to_file_responses(state: &AppState, listings: Vec<FileListing>) -> Vec<FileResponse> {
    let mut responses = Vec::with_capacity(listings.len());
    for listing in listings {
        responses.push(to_file_response(state, listing).await);
    }
    responses
}

/// GET /api/files - List the caller's visible files.
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    params(
        ("query" = Option<String>, Query, description = "Case-insensitive substring filter on file names"),
        ("favorites" = Option<bool>, Query, description = "Retain only favorited files")
    ),
    responses(
        (status = 200, description = "Files visible in the caller's scope", body = Vec<FileResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(params): Query<FileListQuery>,
) -> Result<Json<ApiResponse<Vec<FileResponse>>>, ApiError> {
    let caller = claims.caller();
    let scope = caller.resolve_scope();

    let mut query = FileQuery::new();
    if let Some(text) = params.query {
        query = query.with_text(text);
    }
    if params.favorites.unwrap_or(false) {
        query = query.favorites_only();
    }

    let engine = QueryEngine::new(state.db.pool(), state.blob_store.as_ref());
    let listings = engine
        .get_files(&scope, &caller.user_id, &query)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list files: {}", e);
            ApiError::from(e)
        })?;

    let responses = to_file_responses(&state, listings).await;

    Ok(Json(ApiResponse::new(responses)))
}

/// GET /api/files/trash - List the scope's soft-deleted files.
#[utoipa::path(
    get,
    path = "/files/trash",
    tag = "files",
    responses(
        (status = 200, description = "Soft-deleted files of the caller's scope", body = Vec<FileResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_trash(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<Vec<FileResponse>>>, ApiError> {
    let caller = claims.caller();
    let scope = caller.resolve_scope();

    let engine = QueryEngine::new(state.db.pool(), state.blob_store.as_ref());
    let listings = engine
        .list_trash(&scope, &caller.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list trash: {}", e);
            ApiError::from(e)
        })?;

    let responses = to_file_responses(&state, listings).await;

    Ok(Json(ApiResponse::new(responses)))
}

/// POST /api/files - Register an uploaded file.
#[utoipa::path(
    post,
    path = "/files",
    tag = "files",
    request_body = CreateFileRequest,
    responses(
        (status = 200, description = "File registered", body = FileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid name, kind or storage reference")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<CreateFileRequest>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    payload
        .validate()
        .map_err(ApiError::from_validation_errors)?;

    let kind: FileKind = payload
        .kind
        .parse()
        .map_err(|e: String| ApiError::unprocessable(e))?;

    let caller = claims.caller();
    let scope = caller.resolve_scope();

    let new_file = NewFile::new(
        payload.name,
        kind,
        payload.storage_ref,
        &scope.id,
        &caller.user_id,
    );

    let file = FileRepository::new(state.db.pool())
        .create(&new_file)
        .await
        .map_err(|e| {
            tracing::error!("Failed to register file: {}", e);
            ApiError::from(e)
        })?;

    let url = match state.blob_store.resolve_url(&file.storage_ref) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!(file_id = file.id, error = %e, "URL resolution failed");
            None
        }
    };

    let response = to_file_response(
        &state,
        FileListing {
            file,
            is_favorited: false,
            url,
        },
    )
    .await;

    Ok(Json(ApiResponse::new(response)))
}

/// DELETE /api/files/:id - Move a file to the trash.
#[utoipa::path(
    delete,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File marked for deletion"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "File not available")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn trash_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let scope = claims.caller().resolve_scope();

    LifecycleAuthority::new(state.db.pool())
        .mark_for_deletion(file_id, &scope)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::new(())))
}

/// POST /api/files/:id/restore - Restore a file from the trash.
#[utoipa::path(
    post,
    path = "/files/{id}/restore",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File restored"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "File not available")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn restore_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let scope = claims.caller().resolve_scope();

    LifecycleAuthority::new(state.db.pool())
        .restore(file_id, &scope)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::new(())))
}
