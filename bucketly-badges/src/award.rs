use std::collections::HashSet;
use std::future::Future;

use anyhow::Context as _;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::progress::{Badge, ProfileCounters};

/// Storage the award sweep reads from and writes to.
pub trait AwardLedger {
    fn profile_counters(
        &self,
        user_id: i64,
    ) -> impl Future<Output = anyhow::Result<ProfileCounters>> + Send;

    fn badge_catalog(&self) -> impl Future<Output = anyhow::Result<Vec<Badge>>> + Send;

    fn earned_badge_ids(
        &self,
        user_id: i64,
    ) -> impl Future<Output = anyhow::Result<HashSet<i64>>> + Send;

    /// Record that `user_id` earned `badge` together with its notification.
    /// Both land or neither does. Returns `false` when the pair was already
    /// recorded (the backend reported a uniqueness violation).
    fn record_award(
        &self,
        user_id: i64,
        badge: &Badge,
    ) -> impl Future<Output = anyhow::Result<bool>> + Send;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SweepReport {
    pub evaluated: usize,
    pub already_earned: usize,
    pub duplicates_ignored: usize,
    pub failed: usize,
    pub newly_awarded: Vec<i64>,
}

/// Recompute every badge for `user_id` and record the ones that just reached 100%.
///
/// Safe to run repeatedly and concurrently: a badge recorded between reading
/// the earned set and inserting surfaces as a duplicate and is skipped without
/// a notification. A badge whose award fails is logged and left unearned, so
/// the next sweep awards and notifies it again.
pub async fn run_award_sweep<L>(ledger: &L, user_id: i64) -> anyhow::Result<SweepReport>
where
    L: AwardLedger + Sync,
{
    let profile = ledger
        .profile_counters(user_id)
        .await
        .context("failed to load profile counters for award sweep")?;
    let badges = ledger
        .badge_catalog()
        .await
        .context("failed to load badge catalog for award sweep")?;
    let earned = ledger
        .earned_badge_ids(user_id)
        .await
        .context("failed to load earned badges for award sweep")?;

    let mut report = SweepReport::default();
    for badge in &badges {
        report.evaluated += 1;

        if earned.contains(&badge.id) {
            report.already_earned += 1;
            continue;
        }

        if !badge.progress_for(&profile).progress.is_earned {
            continue;
        }

        match ledger.record_award(user_id, badge).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(user_id, badge_id = badge.id, "badge already recorded; skipping");
                report.duplicates_ignored += 1;
                continue;
            }
            Err(err) => {
                warn!(?err, user_id, badge_id = badge.id, "failed to record badge award");
                report.failed += 1;
                continue;
            }
        }

        info!(user_id, badge_id = badge.id, badge = %badge.name, "badge awarded");
        report.newly_awarded.push(badge.id);
    }

    Ok(report)
}
