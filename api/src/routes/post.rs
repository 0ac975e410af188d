use crate::{
    AppState,
    auth::{Actor, can_edit},
    dto::{
        CommentForm, CommentView, GroupSummary, PostDetailResponse, PostForm, PostFormContext,
        PostView,
    },
    errors::{ApiError, FormErrors},
    models::{Post, PostId},
    routes::{malformed_body, post_url, profile_url},
    store::{PostUpdate, Store},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::Uri,
    response::Redirect,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Form values after validation
struct CleanedPost {
    group_id: Option<Uuid>,
    /// Blank submissions mean no image
    image: Option<String>,
}

/// Validates a post form, resolving the optional group id.
fn clean_post_form(store: &Store, form: &PostForm) -> Result<CleanedPost, ApiError> {
    let mut errors = FormErrors::new(serde_json::to_value(form).unwrap_or_default());
    if let Err(e) = form.validate() {
        errors.extend(&e);
    }

    let group_id = match form.group.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            let group = Uuid::parse_str(raw).ok().and_then(|id| store.group(&id));
            if group.is_none() {
                errors.add("group", INVALID_CHOICE);
            }
            group.map(|g| g.id)
        }
    };

    errors.into_result()?;

    let image = form
        .image
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(CleanedPost { group_id, image })
}

fn group_choices(store: &Store) -> Vec<GroupSummary> {
    store.groups().into_iter().map(GroupSummary::from).collect()
}

/// Non-owners are sent back to the post instead of seeing an error
fn ensure_owner(actor: Uuid, post: &Post) -> Result<(), ApiError> {
    if can_edit(actor, post) {
        Ok(())
    } else {
        Err(ApiError::Forbidden {
            redirect_to: post_url(post.id),
        })
    }
}

/// GET /posts/{post_id}
pub async fn post_detail(
    State(state): State<AppState>,
    Path(post_id): Path<PostId>,
) -> Result<Json<PostDetailResponse>, ApiError> {
    let post = state.store.post(post_id).ok_or(ApiError::NotFound)?;

    let comments = state
        .store
        .comments_for_post(post_id)
        .into_iter()
        .map(|c| CommentView::build(&state.store, c))
        .collect();

    Ok(Json(PostDetailResponse {
        author_posts_count: state.store.count_posts_by_author(post.author_id),
        post: PostView::build(&state.store, post),
        comments,
        form: CommentForm::default(),
    }))
}

/// GET /create
/// Headers: Authorization: Bearer <token>
pub async fn post_create_form(
    State(state): State<AppState>,
    actor: Actor,
    uri: Uri,
) -> Result<Json<PostFormContext>, ApiError> {
    actor.require(&uri)?;

    Ok(Json(PostFormContext {
        is_edit: false,
        post_id: None,
        form: PostForm::default(),
        groups: group_choices(&state.store),
    }))
}

/// POST /create
/// Headers: Authorization: Bearer <token>
/// Body: { "text": "...", "group": "<group id>", "image": "..." }
pub async fn post_create(
    State(state): State<AppState>,
    actor: Actor,
    uri: Uri,
    payload: Result<Json<PostForm>, JsonRejection>,
) -> Result<Redirect, ApiError> {
    let author_id = actor.require(&uri)?;
    let Json(form) = payload.map_err(malformed_body)?;
    let cleaned = clean_post_form(&state.store, &form)?;

    let post = state
        .store
        .create_post(author_id, form.text, cleaned.group_id, cleaned.image);

    info!("Post created: {} by author {}", post.id, author_id);

    let author = state.store.author(&author_id).ok_or(ApiError::NotFound)?;
    Ok(Redirect::to(&profile_url(&author.username)))
}

/// GET /posts/{post_id}/edit
/// Headers: Authorization: Bearer <token>
pub async fn post_edit_form(
    State(state): State<AppState>,
    actor: Actor,
    uri: Uri,
    Path(post_id): Path<PostId>,
) -> Result<Json<PostFormContext>, ApiError> {
    let actor_id = actor.require(&uri)?;
    let post = state.store.post(post_id).ok_or(ApiError::NotFound)?;
    ensure_owner(actor_id, &post)?;

    Ok(Json(PostFormContext {
        is_edit: true,
        post_id: Some(post.id),
        form: PostForm {
            text: post.text,
            group: post.group_id.map(|id| id.to_string()),
            image: post.image,
        },
        groups: group_choices(&state.store),
    }))
}

/// POST /posts/{post_id}/edit
/// Headers: Authorization: Bearer <token>
/// Body: { "text": "...", "group": "<group id>", "image": "..." }
pub async fn post_edit(
    State(state): State<AppState>,
    actor: Actor,
    uri: Uri,
    Path(post_id): Path<PostId>,
    payload: Result<Json<PostForm>, JsonRejection>,
) -> Result<Redirect, ApiError> {
    let actor_id = actor.require(&uri)?;
    let post = state.store.post(post_id).ok_or(ApiError::NotFound)?;
    ensure_owner(actor_id, &post)?;

    let Json(form) = payload.map_err(malformed_body)?;
    let cleaned = clean_post_form(&state.store, &form)?;

    state.store.update_post(
        post.id,
        PostUpdate {
            text: form.text,
            group_id: cleaned.group_id,
            image: cleaned.image,
        },
    )?;

    info!("Post edited: {} by author {}", post.id, actor_id);

    Ok(Redirect::to(&post_url(post.id)))
}

/// POST /posts/{post_id}/comment
/// Headers: Authorization: Bearer <token>
/// Body: { "text": "..." }
pub async fn add_comment(
    State(state): State<AppState>,
    actor: Actor,
    uri: Uri,
    Path(post_id): Path<PostId>,
    payload: Result<Json<CommentForm>, JsonRejection>,
) -> Result<Redirect, ApiError> {
    let author_id = actor.require(&uri)?;
    if state.store.post(post_id).is_none() {
        return Err(ApiError::NotFound);
    }

    let Json(form) = payload.map_err(malformed_body)?;
    if let Err(e) = form.validate() {
        let mut errors = FormErrors::new(serde_json::to_value(&form).unwrap_or_default());
        errors.extend(&e);
        return Err(ApiError::ValidationFailed(errors));
    }

    let comment = state.store.create_comment(post_id, author_id, form.text)?;

    info!("Comment {} added to post {} by {}", comment.id, post_id, author_id);

    Ok(Redirect::to(&post_url(post_id)))
}
