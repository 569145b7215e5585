use bucketly_core::Data;
use bucketly_database::impls::feed::user_feed;
use bucketly_database::model::feed::{FeedCursor, FeedEntry};
use bucketly_utils::formatting::{format_points, format_relative_age};
use bucketly_utils::time::now_unix_secs;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct FeedLine {
    #[serde(flatten)]
    pub entry: FeedEntry,
    pub age: String,
    pub points_label: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct FeedPage {
    pub lines: Vec<FeedLine>,
    /// Pass back as `before` for the next page. `None` on the last page.
    pub next_cursor: Option<FeedCursor>,
}

fn build_page(entries: Vec<FeedEntry>, page_size: u32, now: u64) -> FeedPage {
    let full_page = entries.len() >= page_size as usize;
    let next_cursor = if full_page {
        entries.last().map(FeedEntry::cursor)
    } else {
        None
    };

    let lines = entries
        .into_iter()
        .map(|entry| FeedLine {
            age: format_relative_age(u64::try_from(entry.completed_at).unwrap_or_default(), now),
            points_label: format_points(i64::from(entry.points)),
            entry,
        })
        .collect();

    FeedPage { lines, next_cursor }
}

/// Recent completions on lists the viewer follows, newest first.
pub async fn feed_page(
    data: &Data,
    viewer_id: i64,
    before: Option<FeedCursor>,
) -> anyhow::Result<FeedPage> {
    let page_size = data.config.feed_page_size;
    let entries = user_feed(&data.db, viewer_id, before, page_size).await?;
    Ok(build_page(entries, page_size, now_unix_secs()))
}

#[cfg(test)]
mod tests {
    use bucketly_database::model::feed::{FeedCursor, FeedEntry};

    use super::build_page;

    fn entry(item_id: i64, completed_at: i64) -> FeedEntry {
        FeedEntry {
            viewer_id: 1,
            actor_id: 2,
            actor_username: "sam".to_owned(),
            list_id: 3,
            list_title: "Japan".to_owned(),
            item_id,
            item_title: "Climb Fuji".to_owned(),
            points: 1,
            completed_at,
        }
    }

    #[test]
    fn full_page_has_cursor() {
        let page = build_page(vec![entry(1, 1_000), entry(2, 900)], 2, 4_600);
        assert_eq!(
            page.next_cursor,
            Some(FeedCursor {
                completed_at: 900,
                item_id: 2
            })
        );
        assert_eq!(page.lines[0].age, "1h ago");
        assert_eq!(page.lines[0].points_label, "1 pt");
    }

    #[test]
    fn short_page_is_last() {
        let page = build_page(vec![entry(1, 1_000)], 20, 1_010);
        assert_eq!(page.next_cursor, None);
        assert_eq!(page.lines[0].age, "just now");
    }

    #[test]
    fn tied_timestamps_page_without_gaps() {
        // Newest first, as the view orders them; four completions share a second.
        let all = vec![
            entry(9, 1_000),
            entry(7, 1_000),
            entry(5, 1_000),
            entry(4, 1_000),
            entry(2, 800),
        ];

        let first = build_page(all[..2].to_vec(), 2, 1_000);
        let cursor = first.next_cursor.unwrap();
        assert_eq!(
            cursor,
            FeedCursor {
                completed_at: 1_000,
                item_id: 7
            }
        );

        let rest: Vec<FeedEntry> = all
            .iter()
            .filter(|entry| (entry.completed_at, entry.item_id) < (cursor.completed_at, cursor.item_id))
            .take(2)
            .cloned()
            .collect();
        let second = build_page(rest, 2, 1_000);
        let ids: Vec<i64> = second.lines.iter().map(|line| line.entry.item_id).collect();
        assert_eq!(ids, vec![5, 4]);
        assert_eq!(second.next_cursor.map(|cursor| cursor.item_id), Some(4));
    }
}
