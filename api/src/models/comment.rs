use super::PostId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CommentId = u64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: i64,
}
