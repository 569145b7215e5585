use bucketly_core::{ActionError, Data};
use bucketly_database::impls::lists::{self, NewList};
use bucketly_database::model::bucket_list::BucketList;
use bucketly_utils::sanitize::{
    escape_like_pattern, sanitize_multiline, sanitize_single_line, strip_html_tags,
};
use bucketly_utils::validation::{
    DESCRIPTION_MAX_CHARS, LIST_TITLE_MAX_CHARS, validate_description, validate_list_title,
};
use tracing::info;

pub const SEARCH_QUERY_MAX_CHARS: usize = 80;
pub const SEARCH_RESULT_LIMIT: u32 = 30;

#[derive(Clone, Debug, Default)]
pub struct ListInput {
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
}

#[derive(Debug)]
struct CleanList {
    title: String,
    description: Option<String>,
}

fn clean_list_input(input: &ListInput) -> Result<CleanList, ActionError> {
    let title = validate_list_title(&sanitize_single_line(&input.title, LIST_TITLE_MAX_CHARS + 1))?;
    let description = validate_description(
        input
            .description
            .as_deref()
            .map(|raw| sanitize_multiline(&strip_html_tags(raw), DESCRIPTION_MAX_CHARS + 1))
            .as_deref(),
    )?;

    Ok(CleanList { title, description })
}

pub async fn create_list(data: &Data, owner_id: i64, input: &ListInput) -> anyhow::Result<BucketList> {
    let clean = clean_list_input(input)?;
    let list = lists::create_list(
        &data.db,
        NewList {
            owner_id,
            title: &clean.title,
            description: clean.description.as_deref(),
            is_public: input.is_public,
        },
    )
    .await?;

    info!(owner_id, list_id = list.id, "bucket list created");
    Ok(list)
}

/// Load a list the caller owns, distinguishing missing from someone else's.
pub async fn owned_list(data: &Data, owner_id: i64, list_id: i64) -> anyhow::Result<BucketList> {
    let list = lists::get_list(&data.db, list_id)
        .await?
        .ok_or(ActionError::NotFound("list"))?;

    if list.owner_id != owner_id {
        return Err(ActionError::Forbidden("only the owner can change this list").into());
    }

    Ok(list)
}

pub async fn update_list(
    data: &Data,
    owner_id: i64,
    list_id: i64,
    input: &ListInput,
) -> anyhow::Result<BucketList> {
    let clean = clean_list_input(input)?;
    let current = owned_list(data, owner_id, list_id).await?;
    // Shadow lists mirror someone else's list and always stay private.
    let is_public = input.is_public && !current.is_shadow();

    lists::update_list(
        &data.db,
        list_id,
        owner_id,
        &clean.title,
        clean.description.as_deref(),
        is_public,
    )
    .await?
    .ok_or_else(|| ActionError::NotFound("list").into())
}

pub async fn delete_list(data: &Data, owner_id: i64, list_id: i64) -> anyhow::Result<()> {
    owned_list(data, owner_id, list_id).await?;
    if !lists::delete_list(&data.db, list_id, owner_id).await? {
        return Err(ActionError::NotFound("list").into());
    }

    info!(owner_id, list_id, "bucket list deleted");
    Ok(())
}

pub async fn my_lists(data: &Data, owner_id: i64) -> anyhow::Result<Vec<BucketList>> {
    lists::lists_for_owner(&data.db, owner_id).await
}

/// Search public lists by title. Blank queries return nothing.
pub async fn search_public_lists(data: &Data, query: &str) -> anyhow::Result<Vec<BucketList>> {
    let query = sanitize_single_line(query, SEARCH_QUERY_MAX_CHARS);
    if query.is_empty() {
        return Ok(Vec::new());
    }

    lists::search_public_lists(&data.db, &escape_like_pattern(&query), SEARCH_RESULT_LIMIT).await
}

#[cfg(test)]
mod tests {
    use super::{ListInput, clean_list_input};

    #[test]
    fn cleans_title_and_description() {
        let clean = clean_list_input(&ListInput {
            title: "  Before   I\tturn 30 ".to_owned(),
            description: Some("Line one\r\n\r\n\r\nLine two  ".to_owned()),
            is_public: true,
        })
        .unwrap();
        assert_eq!(clean.title, "Before I turn 30");
        assert_eq!(clean.description.as_deref(), Some("Line one\n\nLine two"));
    }

    #[test]
    fn rejects_blank_and_oversized_titles() {
        let blank = ListInput {
            title: " \n ".to_owned(),
            ..ListInput::default()
        };
        assert_eq!(clean_list_input(&blank).unwrap_err().to_string(), "title: List title is required.");

        let long = ListInput {
            title: "x".repeat(150),
            ..ListInput::default()
        };
        assert!(clean_list_input(&long).is_err());
    }

    #[test]
    fn blank_description_becomes_none() {
        let clean = clean_list_input(&ListInput {
            title: "Trips".to_owned(),
            description: Some("   ".to_owned()),
            is_public: false,
        })
        .unwrap();
        assert_eq!(clean.description, None);
    }
}
