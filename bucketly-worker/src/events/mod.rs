pub mod completion;
pub mod follows;
pub mod ranks;

use bucketly_core::Data;
use bucketly_database::realtime::ChangeEvent;
use tracing::debug;

/// Route one change event to its handler. Handlers log their own failures.
pub async fn handle_change(data: &Data, event: &ChangeEvent) {
    if event.is_item_completion() {
        completion::handle_item_completed(data, event).await;
    } else if event.is_new_follow() {
        follows::handle_new_follow(data, event).await;
    } else {
        debug!(table = %event.table, kind = ?event.kind, "ignoring change event");
    }
}
