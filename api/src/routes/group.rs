use crate::{
    AppState, auth::Actor, dto::CreateGroupRequest, errors::ApiError, models::Group,
    routes::malformed_body,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, Uri},
};
use validator::Validate;

/// GET /groups
pub async fn list_groups(State(state): State<AppState>) -> Json<Vec<Group>> {
    Json(state.store.groups())
}

/// POST /groups
/// Headers: Authorization: Bearer <token>
/// Body: { "title": "...", "slug": "...", "description": "..." }
pub async fn create_group(
    State(state): State<AppState>,
    actor: Actor,
    uri: Uri,
    payload: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    actor.require(&uri)?;
    let Json(payload) = payload.map_err(malformed_body)?;
    payload.validate()?;

    let group = state
        .store
        .create_group(payload.title, payload.slug, payload.description)?;

    Ok((StatusCode::CREATED, Json(group)))
}
