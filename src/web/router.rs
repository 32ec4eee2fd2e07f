//! Router configuration for the Web API.

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::WebConfig;

use super::handlers::{
    create_file, list_files, list_trash, restore_file, toggle_favorite, trash_file, AppState,
};
use super::middleware::{
    api_rate_limit, create_cors_layer, jwt_auth, JwtState, RateLimitState,
};
use super::openapi::ApiDoc;

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    config: &WebConfig,
) -> Router {
    let file_routes = Router::new()
        .route("/files", get(list_files).post(create_file))
        .route("/files/trash", get(list_trash))
        .route("/files/:id", delete(trash_file))
        .route("/files/:id/restore", post(restore_file))
        .route("/files/:id/favorite", post(toggle_favorite));

    let api_routes = Router::new().merge(file_routes);

    let rate_limit_state = Arc::new(RateLimitState::new(config.api_rate_limit));
    let jwt_state_for_middleware = jwt_state.clone();

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&config.cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                }))
                .layer(middleware::from_fn(move |req, next| {
                    let state = rate_limit_state.clone();
                    api_rate_limit(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create the Swagger UI router.
pub fn create_swagger_router() -> Router {
    Router::new().merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_health_router() {
        let _router = create_health_router();
        // Should not panic
    }

    #[test]
    fn test_create_swagger_router() {
        let _router = create_swagger_router();
        // Should not panic
    }
}
