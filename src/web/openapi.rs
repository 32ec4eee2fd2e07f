//! OpenAPI documentation for the Web API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto::{CreateFileRequest, FileResponse, OwnerInfo, ToggleFavoriteResponse};
use super::handlers::{favorites, files};

/// OpenAPI document for the Filedock API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Filedock API",
        description = "Multi-tenant file registry: scoped listings, favorites and two-phase delete"
    ),
    paths(
        files::list_files,
        files::list_trash,
        files::create_file,
        files::trash_file,
        files::restore_file,
        favorites::toggle_favorite,
    ),
    components(schemas(
        CreateFileRequest,
        FileResponse,
        OwnerInfo,
        ToggleFavoriteResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "files", description = "File registration, listing and lifecycle"),
        (name = "favorites", description = "Per-caller favorites")
    )
)]
pub struct ApiDoc;

/// Registers the bearer token scheme the identity provider issues.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
