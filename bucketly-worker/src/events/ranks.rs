use std::time::Instant;

use bucketly_core::Data;
use bucketly_database::impls::leaderboard::recalculate_global_ranks;
use tracing::{error, info};

/// Recompute global ranks. The cached leaderboard is dropped by the recalculation.
pub async fn refresh_ranks(data: &Data) {
    let started = Instant::now();
    match recalculate_global_ranks(&data.db).await {
        Ok(()) => info!(elapsed_ms = started.elapsed().as_millis() as u64, "global ranks refreshed"),
        Err(err) => error!(?err, "global rank refresh failed"),
    }
}
