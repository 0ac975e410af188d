use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub email: String,
    /// Public profile key, unique across authors
    pub username: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub created_at: i64,
}
