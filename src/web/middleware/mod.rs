//! Middleware for the Web API.

mod auth;
mod cors;
mod rate_limit;

pub use auth::{jwt_auth, AuthUser, JwtClaims, JwtState};
pub use cors::create_cors_layer;
pub use rate_limit::{api_rate_limit, RateLimitState};
