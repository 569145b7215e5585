use anyhow::Context as _;
use bucketly_utils::time::now_unix_secs_i64;

use crate::database::Database;
use crate::model::bucket_item::BucketItem;

const ITEM_COLUMNS: &str = "id, list_id, owner_id, title, description, points, difficulty, \
     location, completed, completed_at, created_at";

pub struct NewItem<'a> {
    pub list_id: i64,
    pub owner_id: i64,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub points: i32,
    pub difficulty: &'a str,
    pub location: Option<&'a str>,
}

pub async fn add_item(db: &Database, item: NewItem<'_>) -> anyhow::Result<BucketItem> {
    let created = sqlx::query_as::<_, BucketItem>(&format!(
        "INSERT INTO bucket_items (list_id, owner_id, title, description, points, difficulty, location, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {ITEM_COLUMNS}"
    ))
    .bind(item.list_id)
    .bind(item.owner_id)
    .bind(item.title)
    .bind(item.description)
    .bind(item.points)
    .bind(item.difficulty)
    .bind(item.location)
    .bind(now_unix_secs_i64())
    .fetch_one(db.pool())
    .await
    .context("failed to insert bucket item")?;

    Ok(created)
}

pub async fn get_item(db: &Database, item_id: i64) -> anyhow::Result<Option<BucketItem>> {
    let item = sqlx::query_as::<_, BucketItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM bucket_items WHERE id = $1"
    ))
    .bind(item_id)
    .fetch_optional(db.pool())
    .await?;

    Ok(item)
}

pub async fn items_for_list(db: &Database, list_id: i64) -> anyhow::Result<Vec<BucketItem>> {
    let items = sqlx::query_as::<_, BucketItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM bucket_items
         WHERE list_id = $1
         ORDER BY completed ASC, created_at ASC, id ASC"
    ))
    .bind(list_id)
    .fetch_all(db.pool())
    .await?;

    Ok(items)
}

/// Mark an owned item complete or incomplete and return the updated row.
///
/// `completed_at` is stamped on completion and cleared on un-completion. The
/// profile counter triggers react to the change of `completed`.
pub async fn set_item_completed(
    db: &Database,
    item_id: i64,
    owner_id: i64,
    completed: bool,
) -> anyhow::Result<Option<BucketItem>> {
    let completed_at = completed.then(now_unix_secs_i64);

    let updated = sqlx::query_as::<_, BucketItem>(&format!(
        "UPDATE bucket_items SET completed = $3, completed_at = $4
         WHERE id = $1 AND owner_id = $2
         RETURNING {ITEM_COLUMNS}"
    ))
    .bind(item_id)
    .bind(owner_id)
    .bind(completed)
    .bind(completed_at)
    .fetch_optional(db.pool())
    .await
    .with_context(|| format!("failed to update completion of item {item_id}"))?;

    Ok(updated)
}

pub async fn delete_item(db: &Database, item_id: i64, owner_id: i64) -> anyhow::Result<bool> {
    let deleted = sqlx::query("DELETE FROM bucket_items WHERE id = $1 AND owner_id = $2")
        .bind(item_id)
        .bind(owner_id)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted > 0)
}
