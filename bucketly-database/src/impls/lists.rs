use anyhow::Context as _;
use bucketly_utils::time::now_unix_secs_i64;

use crate::database::Database;
use crate::model::bucket_list::BucketList;

pub(crate) const LIST_COLUMNS: &str =
    "id, owner_id, title, description, is_public, origin_list_id, created_at";

pub struct NewList<'a> {
    pub owner_id: i64,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub is_public: bool,
}

pub async fn create_list(db: &Database, list: NewList<'_>) -> anyhow::Result<BucketList> {
    let created = sqlx::query_as::<_, BucketList>(&format!(
        "INSERT INTO bucket_lists (owner_id, title, description, is_public, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {LIST_COLUMNS}"
    ))
    .bind(list.owner_id)
    .bind(list.title)
    .bind(list.description)
    .bind(list.is_public)
    .bind(now_unix_secs_i64())
    .fetch_one(db.pool())
    .await
    .context("failed to insert bucket list")?;

    Ok(created)
}

pub async fn get_list(db: &Database, list_id: i64) -> anyhow::Result<Option<BucketList>> {
    let list = sqlx::query_as::<_, BucketList>(&format!(
        "SELECT {LIST_COLUMNS} FROM bucket_lists WHERE id = $1"
    ))
    .bind(list_id)
    .fetch_optional(db.pool())
    .await?;

    Ok(list)
}

pub async fn lists_for_owner(db: &Database, owner_id: i64) -> anyhow::Result<Vec<BucketList>> {
    let lists = sqlx::query_as::<_, BucketList>(&format!(
        "SELECT {LIST_COLUMNS} FROM bucket_lists
         WHERE owner_id = $1
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(owner_id)
    .fetch_all(db.pool())
    .await?;

    Ok(lists)
}

/// Public, original lists whose title matches `pattern` (an escaped `ILIKE` fragment).
pub async fn search_public_lists(
    db: &Database,
    pattern: &str,
    limit: u32,
) -> anyhow::Result<Vec<BucketList>> {
    let lists = sqlx::query_as::<_, BucketList>(&format!(
        "SELECT {LIST_COLUMNS} FROM bucket_lists
         WHERE is_public AND origin_list_id IS NULL AND title ILIKE '%' || $1 || '%'
         ORDER BY created_at DESC
         LIMIT $2"
    ))
    .bind(pattern)
    .bind(i64::from(limit.clamp(1, 100)))
    .fetch_all(db.pool())
    .await?;

    Ok(lists)
}

/// Update an owned list. `None` when the list does not exist or belongs to someone else.
pub async fn update_list(
    db: &Database,
    list_id: i64,
    owner_id: i64,
    title: &str,
    description: Option<&str>,
    is_public: bool,
) -> anyhow::Result<Option<BucketList>> {
    let updated = sqlx::query_as::<_, BucketList>(&format!(
        "UPDATE bucket_lists SET title = $3, description = $4, is_public = $5
         WHERE id = $1 AND owner_id = $2
         RETURNING {LIST_COLUMNS}"
    ))
    .bind(list_id)
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .bind(is_public)
    .fetch_optional(db.pool())
    .await?;

    Ok(updated)
}

pub async fn delete_list(db: &Database, list_id: i64, owner_id: i64) -> anyhow::Result<bool> {
    let deleted = sqlx::query("DELETE FROM bucket_lists WHERE id = $1 AND owner_id = $2")
        .bind(list_id)
        .bind(owner_id)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted > 0)
}
