use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BucketList {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    /// Set on shadow lists: the list this copy was made from when following.
    pub origin_list_id: Option<i64>,
    pub created_at: i64,
}

impl BucketList {
    pub fn is_shadow(&self) -> bool {
        self.origin_list_id.is_some()
    }
}
