use crate::database::Database;
use crate::model::feed::{FeedCursor, FeedEntry};

/// A page of the viewer's feed, newest first. Pass the cursor of the last
/// entry seen as `before` to continue.
pub async fn user_feed(
    db: &Database,
    viewer_id: i64,
    before: Option<FeedCursor>,
    limit: u32,
) -> anyhow::Result<Vec<FeedEntry>> {
    let entries = sqlx::query_as::<_, FeedEntry>(
        "SELECT viewer_id, actor_id, actor_username, list_id, list_title, item_id, item_title,
                points, completed_at
         FROM user_feed_view
         WHERE viewer_id = $1
           AND ($2::BIGINT IS NULL OR (completed_at, item_id) < ($2, $3::BIGINT))
         ORDER BY completed_at DESC, item_id DESC
         LIMIT $4",
    )
    .bind(viewer_id)
    .bind(before.map(|cursor| cursor.completed_at))
    .bind(before.map(|cursor| cursor.item_id))
    .bind(i64::from(limit.clamp(1, 100)))
    .fetch_all(db.pool())
    .await?;

    Ok(entries)
}
