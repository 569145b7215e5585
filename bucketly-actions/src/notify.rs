//! Notification fan-out for list activity.

use bucketly_core::Data;
use bucketly_database::impls::follows::followers_of_list;
use bucketly_database::impls::lists::get_list;
use bucketly_database::impls::notifications::{
    NewNotification, insert_notification, insert_notifications_for,
};
use bucketly_database::impls::profiles::get_profile;
use bucketly_database::model::bucket_item::BucketItem;
use bucketly_database::model::bucket_list::BucketList;
use bucketly_database::model::notification::{KIND_ITEM_COMPLETED, KIND_LIST_FOLLOWED};
use serde_json::json;
use tracing::debug;

const FALLBACK_ACTOR_NAME: &str = "Someone";

/// Completions are broadcast only from a public list the actor owns outright.
/// Private lists and shadow copies of someone else's list stay quiet.
pub fn notifies_followers(list: &BucketList) -> bool {
    list.is_public && !list.is_shadow()
}

/// Followers to notify, without the actor and without repeats, in follow order.
pub fn completion_recipients(followers: &[i64], actor_id: i64) -> Vec<i64> {
    let mut recipients: Vec<i64> = Vec::with_capacity(followers.len());
    for follower in followers {
        if *follower != actor_id && !recipients.contains(follower) {
            recipients.push(*follower);
        }
    }
    recipients
}

/// Key that makes one completion produce at most one notification per follower.
pub fn completion_dedup_key(item: &BucketItem) -> String {
    format!(
        "{KIND_ITEM_COMPLETED}:{}:{}",
        item.id,
        item.completed_at.unwrap_or_default()
    )
}

async fn actor_name(data: &Data, user_id: i64) -> anyhow::Result<String> {
    Ok(get_profile(&data.db, user_id)
        .await?
        .map(|profile| profile.display_label().to_owned())
        .unwrap_or_else(|| FALLBACK_ACTOR_NAME.to_owned()))
}

/// Tell the followers of the item's list that it was completed.
///
/// Safe to call more than once for the same completion. Returns the number of
/// notifications actually inserted.
pub async fn notify_followers_of_completion(data: &Data, item: &BucketItem) -> anyhow::Result<u64> {
    if !item.completed {
        return Ok(0);
    }

    let Some(list) = get_list(&data.db, item.list_id).await? else {
        return Ok(0);
    };
    if !notifies_followers(&list) {
        debug!(list_id = list.id, "list does not broadcast completions");
        return Ok(0);
    }

    let followers = followers_of_list(&data.db, list.id).await?;
    let recipients = completion_recipients(&followers, item.owner_id);
    if recipients.is_empty() {
        return Ok(0);
    }

    let actor = actor_name(data, item.owner_id).await?;
    let body = format!("{actor} completed \"{}\" on {}", item.title, list.title);
    let payload = json!({
        "item_id": item.id,
        "list_id": list.id,
        "actor_id": item.owner_id,
        "points": item.points,
    });

    let inserted = insert_notifications_for(
        &data.db,
        &recipients,
        KIND_ITEM_COMPLETED,
        "A list you follow has progress",
        &body,
        &payload,
        Some(&completion_dedup_key(item)),
    )
    .await?;

    debug!(item_id = item.id, inserted, "completion fan-out done");
    Ok(inserted)
}

/// Tell a list owner someone started following their list.
pub async fn notify_list_followed(
    data: &Data,
    list: &BucketList,
    follower_id: i64,
) -> anyhow::Result<()> {
    let follower = actor_name(data, follower_id).await?;
    let body = format!("{follower} is now following {}", list.title);
    let payload = json!({ "list_id": list.id, "follower_id": follower_id });

    insert_notification(
        &data.db,
        NewNotification {
            user_id: list.owner_id,
            kind: KIND_LIST_FOLLOWED,
            title: "New follower",
            body: &body,
            payload: &payload,
        },
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use bucketly_database::model::bucket_item::BucketItem;
    use bucketly_database::model::bucket_list::BucketList;

    use super::{completion_dedup_key, completion_recipients, notifies_followers};

    fn list(is_public: bool, origin_list_id: Option<i64>) -> BucketList {
        BucketList {
            id: 4,
            owner_id: 1,
            title: "Europe".to_owned(),
            description: None,
            is_public,
            origin_list_id,
            created_at: 0,
        }
    }

    #[test]
    fn only_original_public_lists_broadcast() {
        assert!(notifies_followers(&list(true, None)));
        assert!(!notifies_followers(&list(false, None)));
        assert!(!notifies_followers(&list(true, Some(2))));
        assert!(!notifies_followers(&list(false, Some(2))));
    }

    #[test]
    fn recipients_skip_actor_and_repeats() {
        assert_eq!(completion_recipients(&[5, 1, 6, 5, 7], 1), vec![5, 6, 7]);
        assert!(completion_recipients(&[1], 1).is_empty());
        assert!(completion_recipients(&[], 1).is_empty());
    }

    #[test]
    fn dedup_key_tracks_each_completion() {
        let mut item = BucketItem {
            id: 12,
            list_id: 4,
            owner_id: 1,
            title: "Hike the Dolomites".to_owned(),
            description: None,
            points: 40,
            difficulty: "hard".to_owned(),
            location: None,
            completed: true,
            completed_at: Some(1_700_000_000),
            created_at: 0,
        };
        let first = completion_dedup_key(&item);
        assert_eq!(first, "item_completed:12:1700000000");

        // un-completing and completing again is a new event
        item.completed_at = Some(1_700_000_500);
        assert_ne!(completion_dedup_key(&item), first);
    }
}
