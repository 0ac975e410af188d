use crate::{AppState, errors::ApiError, models::Post};
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, Uri, header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use uuid::Uuid;

/// Where anonymous visitors of protected pages are sent
pub const LOGIN_URL: &str = "/auth/login";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (author ID)
    pub email: String,
    pub exp: usize,
}

pub fn create_token(author_id: &Uuid, email: &str, secret: &str) -> Result<String, ApiError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| ApiError::InternalError("Failed to calculate expiration".into()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: author_id.to_string(),
        email: email.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::InternalError(format!("Token Creation failed: {}", e)))
}

pub fn validate_token(headers: &HeaderMap, secret: &str) -> Result<Claims, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    // Check for "Bearer " prefix
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthorized)
}

/// Author id carried by a valid bearer token
pub fn token_author_id(headers: &HeaderMap, secret: &str) -> Result<Uuid, ApiError> {
    let claims = validate_token(headers, secret)?;
    Uuid::parse_str(&claims.sub).map_err(|_| ApiError::Unauthorized)
}

/// Login URL carrying the page to come back to
pub fn login_redirect(next: &str) -> String {
    format!("{}?next={}", LOGIN_URL, urlencoding::encode(next))
}

/// Path and query exactly as requested
pub fn original_url(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

/// The author behind the request, if any.
///
/// Never rejects: a missing, expired or foreign token, or a token for an
/// author the store does not know, all yield an anonymous actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Actor(pub Option<Uuid>);

impl Actor {
    pub fn id(&self) -> Option<Uuid> {
        self.0
    }

    /// Author id, or a redirect to the login page returning to `uri`
    pub fn require(&self, uri: &Uri) -> Result<Uuid, ApiError> {
        self.0.ok_or_else(|| ApiError::LoginRequired {
            next: original_url(uri),
        })
    }
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let author_id = token_author_id(&parts.headers, &state.config.jwt_secret)
            .ok()
            .filter(|id| state.store.author(id).is_some());

        Ok(Actor(author_id))
    }
}

pub fn can_edit(actor: Uuid, post: &Post) -> bool {
    post.author_id == actor
}
