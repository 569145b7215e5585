use bucketly_badges::run_award_sweep;
use bucketly_core::Data;
use bucketly_database::realtime::ChangeEvent;
use tracing::{error, warn};

/// Following a list moves the follower's `lists_following` counter, so sweep them.
pub async fn handle_new_follow(data: &Data, event: &ChangeEvent) {
    let Some(follower_id) = event.field_i64("follower_id") else {
        warn!("follow event without follower_id");
        return;
    };

    if let Err(err) = run_award_sweep(&data.db, follower_id).await {
        error!(?err, follower_id, "award sweep after follow failed");
    }
}
