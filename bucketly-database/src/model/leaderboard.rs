use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_path: Option<String>,
    pub total_points: i64,
    pub global_rank: Option<i64>,
}
