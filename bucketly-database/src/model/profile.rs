use bucketly_badges::ProfileCounters;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: i64,
    pub username: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_path: Option<String>,
    pub items_completed: i64,
    pub lists_created: i64,
    pub lists_following: i64,
    pub total_points: i64,
    pub global_rank: Option<i64>,
    pub created_at: i64,
}

impl Profile {
    pub fn counters(&self) -> ProfileCounters {
        ProfileCounters {
            items_completed: Some(self.items_completed),
            lists_created: Some(self.lists_created),
            lists_following: Some(self.lists_following),
            total_points: Some(self.total_points as f64),
            global_rank: self.global_rank,
        }
    }

    pub fn display_label(&self) -> &str {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Counter columns only; every column is nullable so partially migrated rows still load.
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct ProfileCountersRow {
    pub items_completed: Option<i64>,
    pub lists_created: Option<i64>,
    pub lists_following: Option<i64>,
    pub total_points: Option<i64>,
    pub global_rank: Option<i64>,
}

impl From<ProfileCountersRow> for ProfileCounters {
    fn from(row: ProfileCountersRow) -> Self {
        Self {
            items_completed: row.items_completed,
            lists_created: row.lists_created,
            lists_following: row.lists_following,
            total_points: row.total_points.map(|points| points as f64),
            global_rank: row.global_rank,
        }
    }
}
