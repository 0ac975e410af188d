use crate::errors::REQUIRED_FIELD;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

#[derive(Debug, Validate, Deserialize)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(
        length(min = 3, max = 20, message = "Username must be 3-20 characters"),
        custom(function = "username_chars")
    )]
    pub username: String,
    #[validate(length(min = 8, max = 100, message = "Password must be 8-100 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// `?next=` carried through the login entry point
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// Post create/edit form. `group` stays a raw string so a bad value becomes
/// a field error instead of a rejected body.
#[derive(Debug, Clone, Default, PartialEq, Validate, Serialize, Deserialize)]
pub struct PostForm {
    #[serde(default)]
    #[validate(custom(function = "non_blank"))]
    pub text: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Validate, Serialize, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(custom(function = "non_blank"))]
    pub text: String,
}

#[derive(Debug, Validate, Deserialize)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(
        length(min = 1, max = 50),
        custom(function = "slug_chars")
    )]
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some(Cow::Borrowed(REQUIRED_FIELD));
        return Err(err);
    }
    Ok(())
}

fn slug_chars(value: &str) -> Result<(), ValidationError> {
    let valid = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid {
        let mut err = ValidationError::new("slug");
        err.message = Some(Cow::Borrowed(
            "Use only lowercase letters, numbers, underscores or hyphens",
        ));
        return Err(err);
    }
    Ok(())
}

// Usernames end up in URL paths
fn username_chars(value: &str) -> Result<(), ValidationError> {
    let valid = value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '@' | '+'));
    if !valid {
        let mut err = ValidationError::new("username");
        err.message = Some(Cow::Borrowed(
            "Username may contain only letters, numbers and @/./+/-/_",
        ));
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_required() {
        let form = PostForm {
            text: "   ".into(),
            ..PostForm::default()
        };
        let errors = form.validate().unwrap_err();
        let text_errors = errors.field_errors();

        assert_eq!(
            text_errors["text"][0].message.as_deref(),
            Some(REQUIRED_FIELD)
        );
        assert!(
            CommentForm {
                text: "Comment".into()
            }
            .validate()
            .is_ok()
        );
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let form: PostForm = serde_json::from_str("{}").unwrap();

        assert_eq!(form, PostForm::default());
        assert!(form.validate().is_err());
    }

    #[test]
    fn slugs_are_restricted() {
        let ok = CreateGroupRequest {
            title: "Test".into(),
            slug: "test-slug_1".into(),
            description: String::new(),
        };
        assert!(ok.validate().is_ok());

        let bad = CreateGroupRequest {
            slug: "Test Slug".into(),
            ..ok
        };

        assert!(bad.validate().is_err());
    }

    #[test]
    fn username_allows_hyphen_but_not_slash() {
        let signup = |username: &str| SignupRequest {
            email: "t@example.com".into(),
            username: username.into(),
            password: "password123".into(),
        };

        assert!(signup("Test-User").validate().is_ok());
        assert!(signup("a/b/c").validate().is_err());
    }
}
