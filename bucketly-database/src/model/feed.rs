use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of `user_feed_view`: a completion on a list the viewer follows.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FeedEntry {
    pub viewer_id: i64,
    pub actor_id: i64,
    pub actor_username: String,
    pub list_id: i64,
    pub list_title: String,
    pub item_id: i64,
    pub item_title: String,
    pub points: i32,
    pub completed_at: i64,
}

/// Keyset position in the feed. Several completions can share a second, so
/// `item_id` breaks ties in the same order the feed is sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCursor {
    pub completed_at: i64,
    pub item_id: i64,
}

impl FeedEntry {
    pub fn cursor(&self) -> FeedCursor {
        FeedCursor {
            completed_at: self.completed_at,
            item_id: self.item_id,
        }
    }
}
