use std::collections::HashSet;

use anyhow::Context as _;
use bucketly_badges::{AwardLedger, Badge, ProfileCounters};
use bucketly_utils::time::now_unix_secs_i64;
use serde_json::{Value, json};
use sqlx::types::Json;

use crate::cache::{BADGE_CATALOG_CACHE_TTL, badge_catalog_key};
use crate::database::Database;
use crate::error::is_unique_violation;
use crate::impls::profiles::get_profile_counters;
use crate::model::badge::{BadgeRow, EarnedBadge};
use crate::model::notification::KIND_BADGE_EARNED;

pub struct NewBadge<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub icon_path: Option<&'a str>,
    pub criteria: &'a Value,
}

/// Full badge catalog, cached.
pub async fn list_badges(db: &Database) -> anyhow::Result<Vec<Badge>> {
    let cache_key = badge_catalog_key(db.cache());
    db.cache()
        .get_or_load_json(&cache_key, BADGE_CATALOG_CACHE_TTL, || async {
            let rows = sqlx::query_as::<_, BadgeRow>(
                "SELECT id, name, description, icon_path, criteria FROM badges ORDER BY id ASC",
            )
            .fetch_all(db.pool())
            .await
            .context("failed to load badge catalog")?;

            Ok(rows.into_iter().map(Badge::from).collect())
        })
        .await
}

pub async fn create_badge(db: &Database, badge: NewBadge<'_>) -> anyhow::Result<Badge> {
    let row = sqlx::query_as::<_, BadgeRow>(
        "INSERT INTO badges (name, description, icon_path, criteria)
         VALUES ($1, $2, $3, $4)
         RETURNING id, name, description, icon_path, criteria",
    )
    .bind(badge.name)
    .bind(badge.description)
    .bind(badge.icon_path)
    .bind(Json(badge.criteria))
    .fetch_one(db.pool())
    .await
    .context("failed to insert badge")?;

    db.cache().invalidate(&[badge_catalog_key(db.cache())]).await;

    Ok(row.into())
}

pub async fn earned_badge_ids(db: &Database, user_id: i64) -> anyhow::Result<HashSet<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar("SELECT badge_id FROM user_badges WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(db.pool())
        .await?;

    Ok(ids.into_iter().collect())
}

pub async fn earned_badges(db: &Database, user_id: i64) -> anyhow::Result<Vec<EarnedBadge>> {
    let earned = sqlx::query_as::<_, EarnedBadge>(
        "SELECT ub.badge_id, b.name, b.icon_path, ub.earned_at
         FROM user_badges ub
         JOIN badges b ON b.id = ub.badge_id
         WHERE ub.user_id = $1
         ORDER BY ub.earned_at DESC, ub.badge_id ASC",
    )
    .bind(user_id)
    .fetch_all(db.pool())
    .await?;

    Ok(earned)
}

/// Record an earned badge and its notification in one transaction.
///
/// Returns `false` if the pair already existed; the `(user_id, badge_id)`
/// unique constraint is what makes awarding idempotent. Nothing is kept when
/// either insert fails, so the next sweep awards and notifies again.
pub async fn award_badge(db: &Database, user_id: i64, badge: &Badge) -> anyhow::Result<bool> {
    let now = now_unix_secs_i64();
    let mut tx = db.pool().begin().await?;

    let inserted = sqlx::query("INSERT INTO user_badges (user_id, badge_id, earned_at) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(badge.id)
        .bind(now)
        .execute(&mut *tx)
        .await;

    match inserted {
        Ok(_) => {}
        Err(err) if is_unique_violation(&err) => return Ok(false),
        Err(err) => return Err(err).context("failed to record earned badge"),
    }

    let payload = json!({ "badge_id": badge.id, "icon_path": badge.icon_path });
    sqlx::query(
        "INSERT INTO notifications (user_id, kind, title, body, payload, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(user_id)
    .bind(KIND_BADGE_EARNED)
    .bind("Badge earned!")
    .bind(format!("You earned the \"{}\" badge.", badge.name))
    .bind(Json(&payload))
    .bind(now)
    .execute(&mut *tx)
    .await
    .context("failed to insert badge notification")?;

    tx.commit().await?;
    Ok(true)
}

impl AwardLedger for Database {
    async fn profile_counters(&self, user_id: i64) -> anyhow::Result<ProfileCounters> {
        get_profile_counters(self, user_id).await
    }

    async fn badge_catalog(&self) -> anyhow::Result<Vec<Badge>> {
        list_badges(self).await
    }

    async fn earned_badge_ids(&self, user_id: i64) -> anyhow::Result<HashSet<i64>> {
        earned_badge_ids(self, user_id).await
    }

    async fn record_award(&self, user_id: i64, badge: &Badge) -> anyhow::Result<bool> {
        award_badge(self, user_id, badge).await
    }
}
