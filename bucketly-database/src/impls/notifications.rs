use anyhow::Context as _;
use bucketly_utils::time::now_unix_secs_i64;
use serde_json::Value;
use sqlx::types::Json;

use crate::database::Database;
use crate::model::notification::Notification;

const NOTIFICATION_COLUMNS: &str = "id, user_id, kind, title, body, payload, read, created_at";

pub struct NewNotification<'a> {
    pub user_id: i64,
    pub kind: &'a str,
    pub title: &'a str,
    pub body: &'a str,
    pub payload: &'a Value,
}

pub async fn insert_notification(db: &Database, notification: NewNotification<'_>) -> anyhow::Result<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO notifications (user_id, kind, title, body, payload, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(notification.user_id)
    .bind(notification.kind)
    .bind(notification.title)
    .bind(notification.body)
    .bind(Json(notification.payload))
    .bind(now_unix_secs_i64())
    .fetch_one(db.pool())
    .await
    .with_context(|| format!("failed to insert {} notification", notification.kind))?;

    Ok(id)
}

/// Insert the same notification for many recipients in one statement.
///
/// With a `dedup_key`, recipients that already hold a notification with that
/// key are skipped, so replaying a fan-out is a no-op. Returns rows inserted.
pub async fn insert_notifications_for(
    db: &Database,
    user_ids: &[i64],
    kind: &str,
    title: &str,
    body: &str,
    payload: &Value,
    dedup_key: Option<&str>,
) -> anyhow::Result<u64> {
    if user_ids.is_empty() {
        return Ok(0);
    }

    let inserted = sqlx::query(
        "INSERT INTO notifications (user_id, kind, title, body, payload, dedup_key, created_at)
         SELECT DISTINCT recipient, $2, $3, $4, $5::JSONB, $6, $7 FROM UNNEST($1::BIGINT[]) AS recipient
         ON CONFLICT DO NOTHING",
    )
    .bind(user_ids)
    .bind(kind)
    .bind(title)
    .bind(body)
    .bind(Json(payload))
    .bind(dedup_key)
    .bind(now_unix_secs_i64())
    .execute(db.pool())
    .await
    .with_context(|| format!("failed to fan out {kind} notifications"))?
    .rows_affected();

    Ok(inserted)
}

pub async fn notifications_for_user(
    db: &Database,
    user_id: i64,
    unread_only: bool,
    limit: u32,
) -> anyhow::Result<Vec<Notification>> {
    let notifications = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {NOTIFICATION_COLUMNS} FROM notifications
         WHERE user_id = $1 AND (NOT $2 OR NOT read)
         ORDER BY created_at DESC, id DESC
         LIMIT $3"
    ))
    .bind(user_id)
    .bind(unread_only)
    .bind(i64::from(limit.clamp(1, 200)))
    .fetch_all(db.pool())
    .await?;

    Ok(notifications)
}

pub async fn mark_notification_read(db: &Database, notification_id: i64, user_id: i64) -> anyhow::Result<bool> {
    let updated = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2")
        .bind(notification_id)
        .bind(user_id)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(updated > 0)
}

pub async fn unread_count(db: &Database, user_id: i64) -> anyhow::Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT read")
            .bind(user_id)
            .fetch_one(db.pool())
            .await?;

    Ok(count)
}
