// ============================================================================
// BLOG PUBLISHING API
// ============================================================================

// - Author signup/login with password hashing and JWT
// - Posts in optional groups, comments, follow relationships
// - Reverse-chronological feeds with clamped pagination
// - Short-lived whole-response cache on the index feed
// - Input validation with field-level errors
// - Structured logging

pub mod auth;
pub mod cache;
pub mod config;
pub mod dto;
pub mod errors;
pub mod feed;
pub mod follow;
pub mod models;
pub mod routes;
pub mod states;
pub mod store;

pub use states::AppState;

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use routes::{
    feeds::{follow_index, group_posts, index, profile},
    follow::{profile_follow, profile_unfollow},
    group::{create_group, list_groups},
    health::health_check,
    post::{add_comment, post_create, post_create_form, post_detail, post_edit, post_edit_form},
    user::{get_current_user, login, login_page, signup},
};
use tower::{ServiceBuilder, timeout::TimeoutLayer};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the full router with state and middleware attached
pub fn app(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Only the index feed is cached
    let cached_index =
        get(index).route_layer(middleware::from_fn_with_state(state.clone(), cache::cache_page));

    let request_timeout = state.config.request_timeout;

    Router::new()
        // Public routes (no auth required)
        .route("/health", get(health_check))
        .route("/auth/signup", post(signup))
        .route("/auth/login", get(login_page).post(login))
        .route("/", cached_index)
        .route("/group/{slug}", get(group_posts))
        .route("/profile/{username}", get(profile))
        .route("/posts/{post_id}", get(post_detail))
        .route("/groups", get(list_groups).post(create_group))
        // Protected routes (auth required)
        .route("/users/me", get(get_current_user))
        .route("/create", get(post_create_form).post(post_create))
        .route("/posts/{post_id}/edit", get(post_edit_form).post(post_edit))
        .route("/posts/{post_id}/comment", post(add_comment))
        .route("/follow", get(follow_index))
        .route("/profile/{username}/follow", post(profile_follow))
        .route("/profile/{username}/unfollow", post(profile_unfollow))
        // Add state and middleware
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(handle_timeout))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(cors)
}

async fn handle_timeout(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled error: {}", err),
        )
    }
}
