//! Test helpers for Web API integration tests.
//!
//! Provides a TestServer over an in-memory database plus token-minting
//! helpers standing in for the external identity provider.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use filedock::config::WebConfig;
use filedock::storage::{BlobStore, PublicUrlBlobStore};
use filedock::web::handlers::AppState;
use filedock::web::middleware::{JwtClaims, JwtState};
use filedock::web::router::create_router;
use filedock::Database;

/// Shared secret between the tests' "identity provider" and the server.
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only";

/// Base URL the test blob store resolves against.
pub const TEST_BLOB_BASE_URL: &str = "https://blobs.example.com";

/// Create a test configuration.
pub fn create_test_config() -> WebConfig {
    WebConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![],
        jwt_secret: TEST_JWT_SECRET.to_string(),
        api_rate_limit: 10_000,
    }
}

/// Create a test server with an in-memory database.
pub async fn create_test_server() -> (TestServer, Arc<Database>) {
    let config = create_test_config();

    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let shared_db = Arc::new(db);

    let blob_store: Arc<dyn BlobStore> = Arc::new(PublicUrlBlobStore::new(TEST_BLOB_BASE_URL));

    let app_state = Arc::new(AppState::new(shared_db.clone(), blob_store));
    let jwt_state = Arc::new(JwtState::new(&config.jwt_secret));

    let router = create_router(app_state, jwt_state, &config);

    let server = TestServer::new(router).expect("Failed to create test server");

    (server, shared_db)
}

fn mint_token(claims: &JwtClaims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to mint token")
}

/// Mint a token for a personal (non-organization) caller.
pub fn personal_token(user_id: &str) -> String {
    let now = chrono::Utc::now().timestamp() as u64;
    mint_token(&JwtClaims {
        sub: user_id.to_string(),
        org_id: None,
        role: None,
        iat: now,
        exp: now + 900,
    })
}

/// Mint a token for an organization member or admin.
pub fn org_token(user_id: &str, org_id: &str, role: &str) -> String {
    let now = chrono::Utc::now().timestamp() as u64;
    mint_token(&JwtClaims {
        sub: user_id.to_string(),
        org_id: Some(org_id.to_string()),
        role: Some(role.to_string()),
        iat: now,
        exp: now + 900,
    })
}

/// Bearer header value for a token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Register a file through the API and return its id.
pub async fn create_file(server: &TestServer, token: &str, name: &str, kind: &str) -> i64 {
    let response = server
        .post("/api/files")
        .add_header(
            axum::http::header::AUTHORIZATION,
            bearer(token),
        )
        .json(&json!({
            "name": name,
            "kind": kind,
            "storage_ref": format!("blob-{name}"),
        }))
        .await;

    response.assert_status_ok();
    response.json::<Value>()["data"]["id"].as_i64().unwrap()
}

/// List files through the API, optionally filtered.
pub async fn list_files(
    server: &TestServer,
    token: &str,
    query: Option<&str>,
    favorites: bool,
) -> Value {
    let mut request = server.get("/api/files").add_header(
        axum::http::header::AUTHORIZATION,
        bearer(token),
    );

    if let Some(q) = query {
        request = request.add_query_param("query", q);
    }
    if favorites {
        request = request.add_query_param("favorites", true);
    }

    let response = request.await;
    response.assert_status_ok();
    response.json::<Value>()["data"].clone()
}

/// Names of the files in a listing response, in order.
pub fn file_names(data: &Value) -> Vec<String> {
    data.as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect()
}
