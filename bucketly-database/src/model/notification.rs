use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use sqlx::types::Json;

pub const KIND_BADGE_EARNED: &str = "badge_earned";
pub const KIND_ITEM_COMPLETED: &str = "item_completed";
pub const KIND_LIST_FOLLOWED: &str = "list_followed";

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub payload: Json<Value>,
    pub read: bool,
    pub created_at: i64,
}
