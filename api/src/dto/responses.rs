use crate::{
    dto::{CommentForm, PostForm},
    models::{Author, Comment, Group, Post, PostId},
    store::Store,
};
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: i64,
}

impl From<Author> for UserResponse {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            email: author.email,
            username: author.username,
            created_at: author.created_at,
        }
    }
}

/// Public view of an author, no email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub username: String,
}

impl From<Author> for AuthorResponse {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            username: author.username,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
}

impl From<Group> for GroupSummary {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            title: group.title,
            slug: group.slug,
        }
    }
}

/// A post with its author and group resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: PostId,
    pub text: String,
    pub image: Option<String>,
    pub created_at: i64,
    pub author: AuthorResponse,
    pub group: Option<GroupSummary>,
}

impl PostView {
    pub fn build(store: &Store, post: Post) -> Self {
        let author = store
            .author(&post.author_id)
            .map(AuthorResponse::from)
            .unwrap_or(AuthorResponse {
                id: post.author_id,
                username: String::new(),
            });
        let group = post
            .group_id
            .and_then(|id| store.group(&id))
            .map(GroupSummary::from);

        Self {
            id: post.id,
            text: post.text,
            image: post.image,
            created_at: post.created_at,
            author,
            group,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: u64,
    pub text: String,
    pub created_at: i64,
    pub author: AuthorResponse,
}

impl CommentView {
    pub fn build(store: &Store, comment: Comment) -> Self {
        let author = store
            .author(&comment.author_id)
            .map(AuthorResponse::from)
            .unwrap_or(AuthorResponse {
                id: comment.author_id,
                username: String::new(),
            });

        Self {
            id: comment.id,
            text: comment.text,
            created_at: comment.created_at,
            author,
        }
    }
}

/// Pagination query parameters
///
/// `page` is kept raw; the feed clamps anything unusable. A repeated
/// `page` takes its last value.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: Option<String>,
}

impl PaginationParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            page: pairs
                .into_iter()
                .filter(|(key, _)| key == "page")
                .map(|(_, value)| value)
                .last(),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for PaginationParams {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();

        Ok(Self::from_pairs(pairs))
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> PaginatedResponse<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GroupFeedResponse {
    pub group: Group,
    pub posts: PaginatedResponse<PostView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub author: AuthorResponse,
    pub posts_count: usize,
    pub followers_count: usize,
    pub following: bool,
    pub posts: PaginatedResponse<PostView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostView,
    pub author_posts_count: usize,
    pub comments: Vec<CommentView>,
    pub form: CommentForm,
}

/// What a client needs to draw the create/edit form
#[derive(Debug, Serialize, Deserialize)]
pub struct PostFormContext {
    pub is_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,
    pub form: PostForm,
    pub groups: Vec<GroupSummary>,
}
