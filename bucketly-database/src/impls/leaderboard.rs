use anyhow::Context as _;

use crate::cache::{LEADERBOARD_CACHE_SIZE, LEADERBOARD_CACHE_TTL, leaderboard_key};
use crate::database::Database;
use crate::model::leaderboard::LeaderboardEntry;

/// Run the backend's `recalculate_global_ranks` procedure and drop the cached board.
pub async fn recalculate_global_ranks(db: &Database) -> anyhow::Result<()> {
    sqlx::query("SELECT recalculate_global_ranks()")
        .execute(db.pool())
        .await
        .context("recalculate_global_ranks failed")?;

    db.cache().invalidate(&[leaderboard_key(db.cache())]).await;
    Ok(())
}

/// Top `limit` ranked profiles, served from a cached snapshot of the top rows.
pub async fn top_leaderboard(db: &Database, limit: u32) -> anyhow::Result<Vec<LeaderboardEntry>> {
    let cache_key = leaderboard_key(db.cache());
    let mut entries: Vec<LeaderboardEntry> = db
        .cache()
        .get_or_load_json(&cache_key, LEADERBOARD_CACHE_TTL, || async {
            let rows = sqlx::query_as::<_, LeaderboardEntry>(
                "SELECT user_id, username, display_name, avatar_path, total_points, global_rank
                 FROM profiles
                 WHERE global_rank IS NOT NULL
                 ORDER BY global_rank ASC, user_id ASC
                 LIMIT $1",
            )
            .bind(i64::from(LEADERBOARD_CACHE_SIZE))
            .fetch_all(db.pool())
            .await
            .context("failed to load leaderboard")?;

            Ok(rows)
        })
        .await?;

    entries.truncate(limit.min(LEADERBOARD_CACHE_SIZE) as usize);
    Ok(entries)
}
