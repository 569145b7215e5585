use bucketly_actions::notify::notify_followers_of_completion;
use bucketly_badges::run_award_sweep;
use bucketly_core::Data;
use bucketly_database::model::bucket_item::BucketItem;
use bucketly_database::realtime::ChangeEvent;
use tracing::{error, info, warn};

/// Award badges to the completer and tell their list's followers.
///
/// The inline action may already have done both; the sweep and the fan-out
/// are idempotent, so repeating them here only fills gaps.
pub async fn handle_item_completed(data: &Data, event: &ChangeEvent) {
    let Some(record) = event.record.clone() else {
        return;
    };
    let item: BucketItem = match serde_json::from_value(record) {
        Ok(item) => item,
        Err(err) => {
            warn!(?err, "completion event did not carry a bucket item");
            return;
        }
    };

    match run_award_sweep(&data.db, item.owner_id).await {
        Ok(report) if !report.newly_awarded.is_empty() => {
            info!(user_id = item.owner_id, awarded = ?report.newly_awarded, "badges awarded from completion event");
        }
        Ok(_) => {}
        Err(err) => error!(?err, user_id = item.owner_id, item_id = item.id, "award sweep failed"),
    }

    if let Err(err) = notify_followers_of_completion(data, &item).await {
        error!(?err, item_id = item.id, "follower fan-out failed");
    }
}
