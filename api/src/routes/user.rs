use crate::{
    AppState,
    auth::{create_token, token_author_id},
    dto::{AuthResponse, LoginQuery, LoginRequest, SignupRequest, UserResponse},
    errors::ApiError,
};
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
};
use bcrypt::{hash, verify};
use tracing::{info, warn};
use validator::Validate;

/// POST /auth/signup
/// Body: { "email": "...", "username": "...", "password": "..." }
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.validate()?;

    if state.store.author_by_email(&payload.email).is_some()
        || state.store.author_by_username(&payload.username).is_some()
    {
        return Err(ApiError::UserAlreadyExists);
    }

    let hashed_password = hash(&payload.password, state.config.bcrypt_cost)
        .map_err(|e| ApiError::InternalError(format!("Password hashing failed: {}", e)))?;

    let author = state
        .store
        .create_author(payload.email, payload.username, hashed_password)?;

    let token = create_token(&author.id, &author.email, &state.config.jwt_secret)?;

    info!("New author registered: {}", author.username);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: author.into(),
            next: None,
        }),
    ))
}

/// GET /auth/login?next=/create
///
/// Entry point anonymous visitors of protected pages are redirected to.
pub async fn login_page(Query(query): Query<LoginQuery>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
      "login": "POST email and password to this URL",
      "next": query.next
    }))
}

/// POST /auth/login?next=/create
/// Body: { "email": "...", "password": "..." }
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.validate()?;

    if state.login_limiter.check_key(&payload.email).is_err() {
        warn!("Login rate limit hit for {}", payload.email);
        return Err(ApiError::TooManyRequests);
    }

    let author = state
        .store
        .author_by_email(&payload.email)
        .ok_or(ApiError::InvalidCredentials)?;

    // Verify password
    let valid = verify(&payload.password, &author.hashed_password)
        .map_err(|e| ApiError::InternalError(format!("Password verification failed: {}", e)))?;

    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    let token = create_token(&author.id, &author.email, &state.config.jwt_secret)?;

    info!("Author logged in: {}", author.username);

    Ok(Json(AuthResponse {
        token,
        user: author.into(),
        next: query.next,
    }))
}

/// GET /users/me
/// Headers: Authorization: Bearer <token>
pub async fn get_current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, ApiError> {
    let author_id = token_author_id(&headers, &state.config.jwt_secret)?;

    let author = state.store.author(&author_id).ok_or(ApiError::NotFound)?;

    Ok(Json(author.into()))
}
