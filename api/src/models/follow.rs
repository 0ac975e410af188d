use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directed edge: `follower_id` reads posts of `author_id` in their feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follow {
    pub follower_id: Uuid,
    pub author_id: Uuid,
    pub created_at: i64,
}
