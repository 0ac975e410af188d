use crate::{AppState, auth::Actor, errors::ApiError, follow, routes::profile_url};
use axum::{
    extract::{Path, State},
    http::Uri,
    response::Redirect,
};

/// POST /profile/{username}/follow
/// Headers: Authorization: Bearer <token>
pub async fn profile_follow(
    State(state): State<AppState>,
    actor: Actor,
    uri: Uri,
    Path(username): Path<String>,
) -> Result<Redirect, ApiError> {
    let follower = actor.require(&uri)?;
    let author = state
        .store
        .author_by_username(&username)
        .ok_or(ApiError::NotFound)?;

    follow::follow(&state.store, follower, author.id);

    Ok(Redirect::to(&profile_url(&author.username)))
}

/// POST /profile/{username}/unfollow
/// Headers: Authorization: Bearer <token>
pub async fn profile_unfollow(
    State(state): State<AppState>,
    actor: Actor,
    uri: Uri,
    Path(username): Path<String>,
) -> Result<Redirect, ApiError> {
    let follower = actor.require(&uri)?;
    let author = state
        .store
        .author_by_username(&username)
        .ok_or(ApiError::NotFound)?;

    follow::unfollow(&state.store, follower, author.id)?;

    Ok(Redirect::to(&profile_url(&author.username)))
}
