use crate::auth::login_redirect;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

pub const REQUIRED_FIELD: &str = "This field is required.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user already exists")]
    UserAlreadyExists,
    /// Token-only endpoints answer 401 instead of redirecting
    #[error("unauthorized")]
    Unauthorized,
    #[error("login required for {next}")]
    LoginRequired { next: String },
    #[error("not allowed, redirecting to {redirect_to}")]
    Forbidden { redirect_to: String },
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation failed")]
    ValidationFailed(FormErrors),
    #[error("too many requests")]
    TooManyRequests,
    #[error("internal error: {0}")]
    InternalError(String),
}

/// Field-level messages plus the submitted input, so a client can redisplay
/// the form exactly as it was sent.
#[derive(Debug, Default, Serialize)]
pub struct FormErrors {
    pub errors: BTreeMap<String, Vec<String>>,
    pub form: serde_json::Value,
}

impl FormErrors {
    pub fn new(form: serde_json::Value) -> Self {
        Self {
            errors: BTreeMap::new(),
            form,
        }
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn extend(&mut self, errors: &ValidationErrors) {
        for (field, errs) in errors.field_errors() {
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                self.add(&field.to_string(), message);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` when no field failed, otherwise the matching `ApiError`
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::ValidationFailed(self))
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut form = FormErrors::default();
        form.extend(&errors);
        ApiError::ValidationFailed(form)
    }
}

/// Convert our custom errors to HTTP responses
///
/// Redirect-style variants mirror what a browser flow expects: anonymous
/// writers are sent to the login page, non-owners back to the detail view.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            ApiError::UserAlreadyExists => (StatusCode::CONFLICT, "User already exists"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            ApiError::TooManyRequests => (StatusCode::TOO_MANY_REQUESTS, "Too many requests"),
            ApiError::LoginRequired { next } => {
                return Redirect::to(&login_redirect(&next)).into_response();
            }
            ApiError::Forbidden { redirect_to } => {
                return Redirect::to(&redirect_to).into_response();
            }
            ApiError::Conflict(msg) => {
                return (
                    StatusCode::CONFLICT,
                    Json(serde_json::json!({
                      "error": msg
                    })),
                )
                    .into_response();
            }
            ApiError::ValidationFailed(form) => {
                return (StatusCode::BAD_REQUEST, Json(form)).into_response();
            }
            ApiError::InternalError(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (
            status,
            Json(serde_json::json!({
              "error": message
            })),
        )
            .into_response()
    }
}
