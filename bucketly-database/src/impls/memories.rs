use anyhow::Context as _;
use bucketly_utils::time::now_unix_secs_i64;

use crate::database::Database;
use crate::model::memory::Memory;

pub struct NewMemory<'a> {
    pub item_id: i64,
    pub user_id: i64,
    pub reflection: &'a str,
    pub photo_paths: &'a [String],
}

pub async fn add_memory(db: &Database, memory: NewMemory<'_>) -> anyhow::Result<Memory> {
    let created = sqlx::query_as::<_, Memory>(
        "INSERT INTO memories (item_id, user_id, reflection, photo_paths, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, item_id, user_id, reflection, photo_paths, created_at",
    )
    .bind(memory.item_id)
    .bind(memory.user_id)
    .bind(memory.reflection)
    .bind(memory.photo_paths)
    .bind(now_unix_secs_i64())
    .fetch_one(db.pool())
    .await
    .context("failed to insert memory")?;

    Ok(created)
}

pub async fn memories_for_item(db: &Database, item_id: i64) -> anyhow::Result<Vec<Memory>> {
    let memories = sqlx::query_as::<_, Memory>(
        "SELECT id, item_id, user_id, reflection, photo_paths, created_at
         FROM memories WHERE item_id = $1
         ORDER BY created_at DESC, id DESC",
    )
    .bind(item_id)
    .fetch_all(db.pool())
    .await?;

    Ok(memories)
}

pub async fn delete_memory(db: &Database, memory_id: i64, user_id: i64) -> anyhow::Result<bool> {
    let deleted = sqlx::query("DELETE FROM memories WHERE id = $1 AND user_id = $2")
        .bind(memory_id)
        .bind(user_id)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted > 0)
}
