use std::future::Future;

use bucketly_badges::run_award_sweep;
use bucketly_core::optimistic::Optimistic;
use bucketly_core::{ActionError, Data};
use bucketly_database::impls::items::{self, NewItem};
use bucketly_database::model::bucket_item::BucketItem;
use bucketly_utils::sanitize::{sanitize_multiline, sanitize_single_line, strip_html_tags};
use bucketly_utils::time::now_unix_secs_i64;
use bucketly_utils::validation::{
    DESCRIPTION_MAX_CHARS, Difficulty, ITEM_TITLE_MAX_CHARS, LOCATION_MAX_CHARS, validate_description,
    validate_item_title, validate_location, validate_points,
};
use tracing::{info, warn};

use crate::lists::owned_list;
use crate::notify::notify_followers_of_completion;

#[derive(Clone, Debug)]
pub struct ItemInput {
    pub title: String,
    pub description: Option<String>,
    pub points: i64,
    pub difficulty: String,
    pub location: Option<String>,
}

#[derive(Debug, PartialEq)]
struct CleanItem {
    title: String,
    description: Option<String>,
    points: i32,
    difficulty: Difficulty,
    location: Option<String>,
}

fn clean_item_input(input: &ItemInput) -> Result<CleanItem, ActionError> {
    let title = validate_item_title(&sanitize_single_line(&input.title, ITEM_TITLE_MAX_CHARS + 1))?;
    let description = validate_description(
        input
            .description
            .as_deref()
            .map(|raw| sanitize_multiline(&strip_html_tags(raw), DESCRIPTION_MAX_CHARS + 1))
            .as_deref(),
    )?;
    let location = validate_location(
        input
            .location
            .as_deref()
            .map(|raw| sanitize_single_line(raw, LOCATION_MAX_CHARS + 1))
            .as_deref(),
    )?;
    let points = validate_points(input.points)?;
    let difficulty = input.difficulty.parse::<Difficulty>()?;

    Ok(CleanItem {
        title,
        description,
        // validate_points caps the value well inside i32
        points: points as i32,
        difficulty,
        location,
    })
}

pub async fn add_item(
    data: &Data,
    owner_id: i64,
    list_id: i64,
    input: &ItemInput,
) -> anyhow::Result<BucketItem> {
    let clean = clean_item_input(input)?;
    owned_list(data, owner_id, list_id).await?;

    let item = items::add_item(
        &data.db,
        NewItem {
            list_id,
            owner_id,
            title: &clean.title,
            description: clean.description.as_deref(),
            points: clean.points,
            difficulty: clean.difficulty.as_str(),
            location: clean.location.as_deref(),
        },
    )
    .await?;

    info!(owner_id, list_id, item_id = item.id, "bucket item added");
    Ok(item)
}

pub async fn list_items(data: &Data, list_id: i64) -> anyhow::Result<Vec<BucketItem>> {
    items::items_for_list(&data.db, list_id).await
}

pub async fn delete_item(data: &Data, owner_id: i64, item_id: i64) -> anyhow::Result<()> {
    if !items::delete_item(&data.db, item_id, owner_id).await? {
        return Err(ActionError::NotFound("item").into());
    }

    info!(owner_id, item_id, "bucket item deleted");
    Ok(())
}

/// Result of completing or un-completing an item.
#[derive(Clone, Debug)]
pub struct CompletionOutcome {
    pub item: BucketItem,
    /// Badges the inline sweep awarded. Empty when the sweep is disabled or failed.
    pub newly_awarded: Vec<i64>,
}

/// Mark an owned item complete or incomplete.
///
/// Completing an item runs the award sweep and the follower fan-out inline
/// when enabled, so the client can celebrate new badges right away. Their
/// failures are logged, never surfaced: the completion already committed and
/// the worker repeats both when the change event arrives.
pub async fn set_completed(
    data: &Data,
    owner_id: i64,
    item_id: i64,
    completed: bool,
) -> anyhow::Result<CompletionOutcome> {
    let item = items::set_item_completed(&data.db, item_id, owner_id, completed)
        .await?
        .ok_or(ActionError::NotFound("item"))?;

    let mut newly_awarded = Vec::new();
    if completed && data.config.sweep_on_completion {
        match run_award_sweep(&data.db, owner_id).await {
            Ok(report) => newly_awarded = report.newly_awarded,
            Err(err) => warn!(?err, owner_id, item_id, "inline award sweep failed"),
        }

        if let Err(err) = notify_followers_of_completion(data, &item).await {
            warn!(?err, owner_id, item_id, "inline follower fan-out failed");
        }
    }

    info!(owner_id, item_id, completed, "item completion changed");
    Ok(CompletionOutcome {
        item,
        newly_awarded,
    })
}

/// Local view of one list's items with optimistic completion toggles.
#[derive(Debug, Default)]
pub struct ItemBoard {
    items: Vec<Optimistic<BucketItem>>,
}

impl ItemBoard {
    pub fn new(items: Vec<BucketItem>) -> Self {
        Self {
            items: items.into_iter().map(Optimistic::new).collect(),
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &BucketItem> {
        self.items.iter().map(Optimistic::get)
    }

    pub fn get(&self, item_id: i64) -> Option<&BucketItem> {
        self.items().find(|item| item.id == item_id)
    }

    pub fn completed_count(&self) -> usize {
        self.items().filter(|item| item.completed).count()
    }

    pub fn completed_points(&self) -> i64 {
        self.items()
            .filter(|item| item.completed)
            .map(|item| i64::from(item.points))
            .sum()
    }

    /// Flip an item's completion locally, then run `remote`. On failure the
    /// item goes back to how it was; on success it takes the server's row.
    pub async fn toggle_with<F, Fut>(
        &mut self,
        item_id: i64,
        remote: F,
    ) -> anyhow::Result<CompletionOutcome>
    where
        F: FnOnce(bool) -> Fut,
        Fut: Future<Output = anyhow::Result<CompletionOutcome>>,
    {
        let slot = self
            .items
            .iter_mut()
            .find(|slot| slot.get().id == item_id)
            .ok_or(ActionError::NotFound("item"))?;

        let mut next = slot.get().clone();
        next.completed = !next.completed;
        next.completed_at = next.completed.then(now_unix_secs_i64);
        let completed = next.completed;

        let change = slot.apply(next);
        match remote(completed).await {
            Ok(outcome) => {
                slot.confirm_with(change, outcome.item.clone());
                Ok(outcome)
            }
            Err(err) => {
                warn!(?err, item_id, "completion toggle failed; restoring item");
                slot.rollback(change);
                Err(err)
            }
        }
    }

    pub async fn toggle(
        &mut self,
        data: &Data,
        owner_id: i64,
        item_id: i64,
    ) -> anyhow::Result<CompletionOutcome> {
        self.toggle_with(item_id, |completed| set_completed(data, owner_id, item_id, completed))
            .await
    }
}

#[cfg(test)]
mod tests {
    use bucketly_database::model::bucket_item::BucketItem;
    use bucketly_utils::validation::Difficulty;

    use super::{CompletionOutcome, ItemBoard, ItemInput, clean_item_input};

    fn item(id: i64, points: i32, completed: bool) -> BucketItem {
        BucketItem {
            id,
            list_id: 1,
            owner_id: 7,
            title: format!("item {id}"),
            description: None,
            points,
            difficulty: "easy".to_owned(),
            location: None,
            completed,
            completed_at: completed.then_some(1_700_000_000),
            created_at: 1_690_000_000,
        }
    }

    fn input() -> ItemInput {
        ItemInput {
            title: "  See the northern   lights ".to_owned(),
            description: None,
            points: 50,
            difficulty: " Hard".to_owned(),
            location: Some("Tromsø\n".to_owned()),
        }
    }

    #[test]
    fn cleans_item_input() {
        let clean = clean_item_input(&input()).unwrap();
        assert_eq!(clean.title, "See the northern lights");
        assert_eq!(clean.difficulty, Difficulty::Hard);
        assert_eq!(clean.points, 50);
        assert_eq!(clean.location.as_deref(), Some("Tromsø"));
    }

    #[test]
    fn strips_markup_from_description() {
        let mut marked_up = input();
        marked_up.description = Some("<b>Clear</b> skies <i>only</i>, aurora index > 5".to_owned());
        let clean = clean_item_input(&marked_up).unwrap();
        assert_eq!(clean.description.as_deref(), Some("Clear skies only, aurora index > 5"));
    }

    #[test]
    fn rejects_bad_points_and_difficulty() {
        let mut negative = input();
        negative.points = -1;
        assert!(clean_item_input(&negative).is_err());

        let mut unknown = input();
        unknown.difficulty = "legendary".to_owned();
        let err = clean_item_input(&unknown).unwrap_err();
        assert_eq!(err.to_string(), "difficulty: Difficulty must be easy, medium or hard.");
    }

    #[tokio::test]
    async fn toggle_adopts_server_row() {
        let mut board = ItemBoard::new(vec![item(1, 10, false), item(2, 20, true)]);

        let outcome = board
            .toggle_with(1, |completed| async move {
                assert!(completed);
                let mut server = item(1, 10, true);
                server.completed_at = Some(42);
                Ok(CompletionOutcome {
                    item: server,
                    newly_awarded: vec![3],
                })
            })
            .await
            .unwrap();

        assert_eq!(outcome.newly_awarded, vec![3]);
        assert_eq!(board.get(1).unwrap().completed_at, Some(42));
        assert_eq!(board.completed_count(), 2);
        assert_eq!(board.completed_points(), 30);
    }

    #[tokio::test]
    async fn failed_toggle_rolls_back() {
        let mut board = ItemBoard::new(vec![item(1, 10, true)]);

        let result = board
            .toggle_with(1, |completed| async move {
                assert!(!completed);
                anyhow::bail!("connection reset")
            })
            .await;

        assert!(result.is_err());
        let restored = board.get(1).unwrap();
        assert!(restored.completed);
        assert_eq!(restored.completed_at, Some(1_700_000_000));
    }

    #[tokio::test]
    async fn toggling_unknown_item_is_not_found() {
        let mut board = ItemBoard::new(vec![item(1, 10, false)]);
        let err = board
            .toggle_with(9, |_| async { anyhow::bail!("remote must not run") })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "item not found");
        assert!(!board.get(1).unwrap().completed);
    }
}
