use anyhow::Context as _;
use bucketly_utils::time::now_unix_secs_i64;

use crate::database::Database;
use crate::impls::lists::LIST_COLUMNS;
use crate::model::bucket_list::BucketList;
use crate::model::follow::ListFollow;

/// Follow `list` by copying it into a private shadow list owned by `follower_id`.
///
/// Runs in one transaction. Following the same list twice fails with the
/// `list_follows` unique violation and leaves no partial copy behind.
pub async fn follow_list(
    db: &Database,
    follower_id: i64,
    list: &BucketList,
) -> anyhow::Result<(ListFollow, BucketList)> {
    let now = now_unix_secs_i64();
    let mut tx = db.pool().begin().await?;

    let shadow = sqlx::query_as::<_, BucketList>(&format!(
        "INSERT INTO bucket_lists (owner_id, title, description, is_public, origin_list_id, created_at)
         VALUES ($1, $2, $3, FALSE, $4, $5)
         RETURNING {LIST_COLUMNS}"
    ))
    .bind(follower_id)
    .bind(&list.title)
    .bind(list.description.as_deref())
    .bind(list.id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .context("failed to create shadow list")?;

    sqlx::query(
        "INSERT INTO bucket_items (list_id, owner_id, title, description, points, difficulty, location, created_at)
         SELECT $1, $2, title, description, points, difficulty, location, $3
         FROM bucket_items WHERE list_id = $4
         ORDER BY id",
    )
    .bind(shadow.id)
    .bind(follower_id)
    .bind(now)
    .bind(list.id)
    .execute(&mut *tx)
    .await
    .context("failed to copy items into shadow list")?;

    let follow = sqlx::query_as::<_, ListFollow>(
        "INSERT INTO list_follows (follower_id, list_id, shadow_list_id, created_at)
         VALUES ($1, $2, $3, $4)
         RETURNING follower_id, list_id, shadow_list_id, created_at",
    )
    .bind(follower_id)
    .bind(list.id)
    .bind(shadow.id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((follow, shadow))
}

/// Stop following `list_id` and delete the shadow copy with its items.
pub async fn unfollow_list(db: &Database, follower_id: i64, list_id: i64) -> anyhow::Result<bool> {
    let mut tx = db.pool().begin().await?;

    let shadow_list_id: Option<i64> = sqlx::query_scalar(
        "DELETE FROM list_follows WHERE follower_id = $1 AND list_id = $2
         RETURNING shadow_list_id",
    )
    .bind(follower_id)
    .bind(list_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(shadow_list_id) = shadow_list_id else {
        return Ok(false);
    };

    sqlx::query("DELETE FROM bucket_lists WHERE id = $1 AND owner_id = $2")
        .bind(shadow_list_id)
        .bind(follower_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}

pub async fn is_following(db: &Database, follower_id: i64, list_id: i64) -> anyhow::Result<bool> {
    let following: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM list_follows WHERE follower_id = $1 AND list_id = $2)",
    )
    .bind(follower_id)
    .bind(list_id)
    .fetch_one(db.pool())
    .await?;

    Ok(following)
}

pub async fn followers_of_list(db: &Database, list_id: i64) -> anyhow::Result<Vec<i64>> {
    let followers: Vec<i64> = sqlx::query_scalar(
        "SELECT follower_id FROM list_follows WHERE list_id = $1 ORDER BY created_at ASC",
    )
    .bind(list_id)
    .fetch_all(db.pool())
    .await?;

    Ok(followers)
}
