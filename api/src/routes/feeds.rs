use crate::{
    AppState,
    auth::Actor,
    dto::{GroupFeedResponse, PaginatedResponse, PaginationParams, PostView, ProfileResponse},
    errors::ApiError,
    feed::{Scope, compose},
    follow::following_status,
};
use axum::{
    Json,
    extract::{Path, State},
    http::Uri,
};

/// GET /?page=1
///
/// Wrapped by the page cache, see `cache::cache_page`.
pub async fn index(
    State(state): State<AppState>,
    params: PaginationParams,
) -> Json<PaginatedResponse<PostView>> {
    Json(compose(
        &state.store,
        Scope::All,
        params.page.as_deref(),
        state.config.quantity_posts,
    ))
}

/// GET /group/{slug}?page=1
pub async fn group_posts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    params: PaginationParams,
) -> Result<Json<GroupFeedResponse>, ApiError> {
    let group = state.store.group_by_slug(&slug).ok_or(ApiError::NotFound)?;

    let posts = compose(
        &state.store,
        Scope::Group(group.id),
        params.page.as_deref(),
        state.config.quantity_posts,
    );

    Ok(Json(GroupFeedResponse { group, posts }))
}

/// GET /profile/{username}?page=1
pub async fn profile(
    State(state): State<AppState>,
    actor: Actor,
    Path(username): Path<String>,
    params: PaginationParams,
) -> Result<Json<ProfileResponse>, ApiError> {
    let author = state
        .store
        .author_by_username(&username)
        .ok_or(ApiError::NotFound)?;

    let posts = compose(
        &state.store,
        Scope::Author(author.id),
        params.page.as_deref(),
        state.config.quantity_posts,
    );

    Ok(Json(ProfileResponse {
        posts_count: posts.total,
        followers_count: state.store.follower_count(author.id),
        following: following_status(&state.store, actor.id(), author.id),
        author: author.into(),
        posts,
    }))
}

/// GET /follow?page=1
/// Headers: Authorization: Bearer <token>
pub async fn follow_index(
    State(state): State<AppState>,
    actor: Actor,
    uri: Uri,
    params: PaginationParams,
) -> Result<Json<PaginatedResponse<PostView>>, ApiError> {
    let viewer = actor.require(&uri)?;

    Ok(Json(compose(
        &state.store,
        Scope::Followed(viewer),
        params.page.as_deref(),
        state.config.quantity_posts,
    )))
}
