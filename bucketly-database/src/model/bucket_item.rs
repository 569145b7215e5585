use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BucketItem {
    pub id: i64,
    pub list_id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub points: i32,
    pub difficulty: String,
    pub location: Option<String>,
    pub completed: bool,
    pub completed_at: Option<i64>,
    pub created_at: i64,
}
