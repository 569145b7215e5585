use bucketly_core::feedback::is_benign_duplicate;
use bucketly_core::{ActionError, Data};
use bucketly_database::impls::follows;
use bucketly_database::impls::lists::get_list;
use bucketly_database::model::bucket_list::BucketList;
use tracing::{debug, info, warn};

use crate::notify::notify_list_followed;

#[derive(Clone, Debug)]
pub enum FollowOutcome {
    /// A shadow copy was created for the follower.
    Followed { shadow: BucketList },
    AlreadyFollowing,
}

fn check_followable(list: &BucketList, follower_id: i64) -> Result<(), ActionError> {
    if list.owner_id == follower_id {
        return Err(ActionError::Forbidden("you cannot follow your own list"));
    }

    if !list.is_public || list.is_shadow() {
        return Err(ActionError::Forbidden("only public lists can be followed"));
    }

    Ok(())
}

/// Follow a public list. Following twice is not an error.
pub async fn follow_list(data: &Data, follower_id: i64, list_id: i64) -> anyhow::Result<FollowOutcome> {
    let list = get_list(&data.db, list_id)
        .await?
        .ok_or(ActionError::NotFound("list"))?;
    check_followable(&list, follower_id)?;

    let shadow = match follows::follow_list(&data.db, follower_id, &list).await {
        Ok((_, shadow)) => shadow,
        Err(err) if is_benign_duplicate(&err) => {
            debug!(follower_id, list_id, "already following list");
            return Ok(FollowOutcome::AlreadyFollowing);
        }
        Err(err) => return Err(err),
    };

    if let Err(err) = notify_list_followed(data, &list, follower_id).await {
        warn!(?err, follower_id, list_id, "failed to notify list owner of follow");
    }

    info!(follower_id, list_id, shadow_list_id = shadow.id, "list followed");
    Ok(FollowOutcome::Followed { shadow })
}

/// Stop following a list. The shadow copy and its items are removed.
pub async fn unfollow_list(data: &Data, follower_id: i64, list_id: i64) -> anyhow::Result<()> {
    if !follows::unfollow_list(&data.db, follower_id, list_id).await? {
        return Err(ActionError::NotFound("follow").into());
    }

    info!(follower_id, list_id, "list unfollowed");
    Ok(())
}

pub async fn is_following(data: &Data, follower_id: i64, list_id: i64) -> anyhow::Result<bool> {
    follows::is_following(&data.db, follower_id, list_id).await
}

#[cfg(test)]
mod tests {
    use bucketly_database::BackendErrorKind;
    use bucketly_database::model::bucket_list::BucketList;

    use super::check_followable;

    fn list(owner_id: i64, is_public: bool, origin_list_id: Option<i64>) -> BucketList {
        BucketList {
            id: 3,
            owner_id,
            title: "Food tour".to_owned(),
            description: None,
            is_public,
            origin_list_id,
            created_at: 0,
        }
    }

    #[test]
    fn public_lists_of_others_are_followable() {
        assert!(check_followable(&list(1, true, None), 2).is_ok());
    }

    #[test]
    fn rejects_own_private_and_shadow_lists() {
        for (candidate, follower) in [
            (list(2, true, None), 2),
            (list(1, false, None), 2),
            (list(1, true, Some(9)), 2),
        ] {
            let err = check_followable(&candidate, follower).unwrap_err();
            assert_eq!(err.kind(), BackendErrorKind::Forbidden);
        }
    }
}
