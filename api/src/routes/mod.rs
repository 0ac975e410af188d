pub mod feeds;
pub mod follow;
pub mod group;
pub mod health;
pub mod post;
pub mod user;

use crate::{
    errors::{ApiError, FormErrors},
    models::PostId,
};
use axum::extract::rejection::JsonRejection;

pub fn profile_url(username: &str) -> String {
    format!("/profile/{}", urlencoding::encode(username))
}

pub fn post_url(post_id: PostId) -> String {
    format!("/posts/{}", post_id)
}

/// A body that is not valid JSON for the form is reported like any other
/// form error
pub(crate) fn malformed_body(rejection: JsonRejection) -> ApiError {
    let mut form = FormErrors::default();
    form.add("body", rejection.body_text());
    ApiError::ValidationFailed(form)
}
