use bucketly_core::{ActionError, Data};
use bucketly_database::impls::notifications::{
    mark_notification_read, notifications_for_user, unread_count,
};
use bucketly_database::model::notification::Notification;

pub const INBOX_PAGE_SIZE: u32 = 50;

pub async fn notifications(
    data: &Data,
    user_id: i64,
    unread_only: bool,
) -> anyhow::Result<Vec<Notification>> {
    notifications_for_user(&data.db, user_id, unread_only, INBOX_PAGE_SIZE).await
}

pub async fn mark_read(data: &Data, user_id: i64, notification_id: i64) -> anyhow::Result<()> {
    if !mark_notification_read(&data.db, notification_id, user_id).await? {
        return Err(ActionError::NotFound("notification").into());
    }
    Ok(())
}

pub async fn unread(data: &Data, user_id: i64) -> anyhow::Result<i64> {
    unread_count(&data.db, user_id).await
}
