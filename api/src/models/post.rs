use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PostId = u64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub text: String,
    /// Reference to a stored media file
    pub image: Option<String>,
    pub created_at: i64,
}
