use bucketly_core::Data;
use bucketly_database::impls::leaderboard::top_leaderboard;
use bucketly_database::impls::profiles::get_profile;
use bucketly_database::model::leaderboard::LeaderboardEntry;
use bucketly_utils::formatting::{format_points, format_rank};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeaderboardRow {
    pub user_id: i64,
    pub name: String,
    pub avatar_path: Option<String>,
    pub rank: String,
    pub points: String,
}

impl From<LeaderboardEntry> for LeaderboardRow {
    fn from(entry: LeaderboardEntry) -> Self {
        let name = entry
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(entry.username);

        Self {
            user_id: entry.user_id,
            name,
            avatar_path: entry.avatar_path,
            rank: format_rank(entry.global_rank),
            points: format_points(entry.total_points),
        }
    }
}

/// Top of the global leaderboard, sized by configuration.
pub async fn leaderboard(data: &Data) -> anyhow::Result<Vec<LeaderboardRow>> {
    let entries = top_leaderboard(&data.db, data.config.leaderboard_size).await?;
    Ok(entries.into_iter().map(LeaderboardRow::from).collect())
}

/// The caller's own standing, e.g. "#1,204".
pub async fn my_rank(data: &Data, user_id: i64) -> anyhow::Result<String> {
    let rank = get_profile(&data.db, user_id)
        .await?
        .and_then(|profile| profile.global_rank);
    Ok(format_rank(rank))
}
