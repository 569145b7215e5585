use std::cmp::Ordering;
use std::collections::HashMap;

use bucketly_badges::{Badge, Progress, ProfileCounters, SweepReport, run_award_sweep};
use bucketly_core::Data;
use bucketly_database::impls::badges::{earned_badges, list_badges};
use bucketly_database::impls::profiles::get_profile_counters;
use bucketly_database::model::badge::EarnedBadge;
use bucketly_utils::formatting::format_percentage;
use serde::Serialize;

/// One badge as a user sees it on their profile.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BadgeStatus {
    pub badge: Badge,
    pub progress: Progress,
    /// Set once the award is recorded, even if the counters later drop.
    pub earned_at: Option<i64>,
    pub percentage_label: String,
}

impl BadgeStatus {
    pub fn is_earned(&self) -> bool {
        self.earned_at.is_some()
    }
}

/// Progress for every badge: recorded awards first (newest first), then the
/// rest by percentage, closest to done first. Ties fall back to the name.
pub fn badge_statuses(
    catalog: Vec<Badge>,
    counters: &ProfileCounters,
    earned: &[EarnedBadge],
) -> Vec<BadgeStatus> {
    let earned_at: HashMap<i64, i64> = earned
        .iter()
        .map(|earned| (earned.badge_id, earned.earned_at))
        .collect();

    let mut statuses: Vec<BadgeStatus> = catalog
        .into_iter()
        .map(|badge| {
            let progress = badge.progress_for(counters).progress;
            BadgeStatus {
                earned_at: earned_at.get(&badge.id).copied(),
                percentage_label: format_percentage(progress.percentage),
                badge,
                progress,
            }
        })
        .collect();

    statuses.sort_by(|a, b| {
        b.is_earned()
            .cmp(&a.is_earned())
            .then_with(|| b.earned_at.cmp(&a.earned_at))
            .then_with(|| {
                b.progress
                    .percentage
                    .partial_cmp(&a.progress.percentage)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.badge.name.cmp(&b.badge.name))
    });
    statuses
}

pub async fn badge_overview(data: &Data, user_id: i64) -> anyhow::Result<Vec<BadgeStatus>> {
    let catalog = list_badges(&data.db).await?;
    let counters = get_profile_counters(&data.db, user_id).await?;
    let earned = earned_badges(&data.db, user_id).await?;

    Ok(badge_statuses(catalog, &counters, &earned))
}

/// Run the award sweep for one user on demand.
pub async fn award_badges(data: &Data, user_id: i64) -> anyhow::Result<SweepReport> {
    run_award_sweep(&data.db, user_id).await
}
