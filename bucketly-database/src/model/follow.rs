use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ListFollow {
    pub follower_id: i64,
    pub list_id: i64,
    pub shadow_list_id: i64,
    pub created_at: i64,
}
