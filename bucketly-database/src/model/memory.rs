use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Memory {
    pub id: i64,
    pub item_id: i64,
    pub user_id: i64,
    pub reflection: String,
    /// Object storage paths, not URLs.
    pub photo_paths: Vec<String>,
    pub created_at: i64,
}
