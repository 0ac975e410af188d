use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A community posts can be published into
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}
