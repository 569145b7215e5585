use anyhow::Context as _;
use bucketly_badges::ProfileCounters;

use crate::database::Database;
use crate::model::profile::{Profile, ProfileCountersRow};

const PROFILE_COLUMNS: &str = "user_id, username, email, display_name, bio, avatar_path, \
     items_completed, lists_created, lists_following, total_points, global_rank, created_at";

pub async fn get_profile(db: &Database, user_id: i64) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(db.pool())
    .await
    .with_context(|| format!("failed to load profile {user_id}"))?;

    Ok(profile)
}

pub async fn get_profile_by_username(
    db: &Database,
    username: &str,
) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE lower(username) = lower($1)"
    ))
    .bind(username)
    .fetch_optional(db.pool())
    .await?;

    Ok(profile)
}

/// Counter snapshot for badge progress. A user without a profile row has all-zero counters.
pub async fn get_profile_counters(db: &Database, user_id: i64) -> anyhow::Result<ProfileCounters> {
    let row = sqlx::query_as::<_, ProfileCountersRow>(
        "SELECT items_completed, lists_created, lists_following, total_points, global_rank
         FROM profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(db.pool())
    .await
    .with_context(|| format!("failed to load counters for user {user_id}"))?;

    Ok(row.unwrap_or_default().into())
}

pub async fn is_username_taken(db: &Database, username: &str) -> anyhow::Result<bool> {
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM profiles WHERE lower(username) = lower($1))",
    )
    .bind(username)
    .fetch_one(db.pool())
    .await?;

    Ok(taken)
}

/// Returns `false` when no profile exists for `user_id`.
pub async fn update_profile_details(
    db: &Database,
    user_id: i64,
    display_name: Option<&str>,
    bio: Option<&str>,
) -> anyhow::Result<bool> {
    let updated = sqlx::query("UPDATE profiles SET display_name = $2, bio = $3 WHERE user_id = $1")
        .bind(user_id)
        .bind(display_name)
        .bind(bio)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(updated > 0)
}

pub async fn set_avatar_path(db: &Database, user_id: i64, path: &str) -> anyhow::Result<bool> {
    let updated = sqlx::query("UPDATE profiles SET avatar_path = $2 WHERE user_id = $1")
        .bind(user_id)
        .bind(path)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(updated > 0)
}
