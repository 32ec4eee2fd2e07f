//! JWT authentication middleware.
//!
//! Tokens are issued by the external identity provider and validated here
//! with a shared secret. A request without a valid token never reaches a
//! handler: scope resolution is required for every downstream filter.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::identity::{Caller, ScopeRole};
use crate::web::error::ApiError;

/// JWT claims structure, as issued by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID).
    pub sub: String,
    /// Organization the caller belongs to, if any.
    #[serde(default)]
    pub org_id: Option<String>,
    /// Role asserted for the organization ("member" or "admin").
    #[serde(default)]
    pub role: Option<String>,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
}

impl JwtClaims {
    /// Build the caller these claims assert.
    ///
    /// An unrecognized role claim degrades to member rather than failing
    /// the request.
    pub fn caller(&self) -> Caller {
        let role = self
            .role
            .as_deref()
            .and_then(|r| r.parse::<ScopeRole>().ok())
            .unwrap_or(ScopeRole::Member);

        Caller {
            user_id: self.sub.clone(),
            org_id: self.org_id.clone(),
            role,
        }
    }
}

/// Application state for JWT authentication.
#[derive(Clone)]
pub struct JwtState {
    /// Decoding key for JWT verification.
    pub decoding_key: DecodingKey,
    /// Validation settings.
    pub validation: Validation,
}

impl JwtState {
    /// Create a new JWT state from a secret key.
    pub fn new(secret: &str) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            decoding_key,
            validation,
        }
    }
}

/// Extractor for authenticated users.
///
/// Use this extractor to require authentication for a handler.
/// The handler will receive the JWT claims if the token is valid.
#[derive(Debug, Clone)]
pub struct AuthUser(pub JwtClaims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|header| header.strip_prefix("Bearer "))
                .ok_or_else(|| ApiError::unauthorized("Missing authorization"))?;

            // Get JWT state from extensions (set by middleware)
            let jwt_state = parts
                .extensions
                .get::<Arc<JwtState>>()
                .ok_or_else(|| ApiError::internal("JWT state not configured"))?;

            let token_data =
                decode::<JwtClaims>(token, &jwt_state.decoding_key, &jwt_state.validation)
                    .map_err(|e| {
                        tracing::debug!("JWT validation failed: {}", e);
                        ApiError::unauthorized("Invalid or expired token")
                    })?;

            Ok(AuthUser(token_data.claims))
        })
    }
}

/// Middleware function to inject JWT state into request extensions.
pub async fn jwt_auth(
    jwt_state: Arc<JwtState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(jwt_state);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn mint(secret: &str, claims: &JwtClaims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn sample_claims(org_id: Option<&str>, role: Option<&str>) -> JwtClaims {
        let now = chrono::Utc::now().timestamp() as u64;
        JwtClaims {
            sub: "user_1".to_string(),
            org_id: org_id.map(|s| s.to_string()),
            role: role.map(|s| s.to_string()),
            iat: now,
            exp: now + 900,
        }
    }

    #[test]
    fn test_decode_round_trip() {
        let state = JwtState::new("secret");
        let claims = sample_claims(Some("org_1"), Some("admin"));
        let token = mint("secret", &claims);

        let decoded =
            decode::<JwtClaims>(&token, &state.decoding_key, &state.validation).unwrap();
        assert_eq!(decoded.claims.sub, "user_1");
        assert_eq!(decoded.claims.org_id, Some("org_1".to_string()));
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let state = JwtState::new("secret");
        let token = mint("other-secret", &sample_claims(None, None));

        let result = decode::<JwtClaims>(&token, &state.decoding_key, &state.validation);
        assert!(result.is_err());
    }

    #[test]
    fn test_caller_resolves_org_role() {
        let caller = sample_claims(Some("org_1"), Some("admin")).caller();
        assert_eq!(caller.user_id, "user_1");
        assert_eq!(caller.org_id, Some("org_1".to_string()));
        assert_eq!(caller.role, ScopeRole::Admin);
    }

    #[test]
    fn test_caller_unknown_role_degrades_to_member() {
        let caller = sample_claims(Some("org_1"), Some("superuser")).caller();
        assert_eq!(caller.role, ScopeRole::Member);
    }

    #[test]
    fn test_caller_missing_role_is_member() {
        let caller = sample_claims(None, None).caller();
        assert_eq!(caller.role, ScopeRole::Member);
        assert!(caller.org_id.is_none());
    }
}
