use bucketly_core::{ActionError, Data};
use bucketly_database::impls::items::get_item;
use bucketly_database::impls::memories::{self, NewMemory};
use bucketly_database::model::memory::Memory;
use bucketly_utils::sanitize::{sanitize_multiline, sanitize_storage_file_name, strip_html_tags};
use bucketly_utils::time::now_unix_secs;
use bucketly_utils::validation::{
    REFLECTION_MAX_CHARS, ValidationError, validate_photo, validate_photo_count, validate_reflection,
};
use tracing::info;

/// Metadata of a photo the client is about to upload.
#[derive(Clone, Debug)]
pub struct PhotoUpload {
    pub file_name: String,
    pub size_bytes: u64,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryInput {
    pub reflection: String,
    pub photos: Vec<PhotoUpload>,
}

/// Object storage path for one memory photo.
///
/// Paths are namespaced by owner and item so storage policies can scope
/// access by prefix; the timestamp and index keep names unique per upload.
pub fn photo_storage_path(
    prefix: &str,
    user_id: i64,
    item_id: i64,
    uploaded_at: u64,
    index: usize,
    file_name: &str,
) -> String {
    format!(
        "{prefix}/{user_id}/{item_id}/{uploaded_at}-{index}-{}",
        sanitize_storage_file_name(file_name)
    )
}

fn clean_memory_input(input: &MemoryInput) -> Result<String, ActionError> {
    let reflection = validate_reflection(&sanitize_multiline(
        &strip_html_tags(&input.reflection),
        REFLECTION_MAX_CHARS + 1,
    ))?;
    validate_photo_count(input.photos.len())?;
    for photo in &input.photos {
        validate_photo(&photo.file_name, photo.size_bytes)?;
    }

    Ok(reflection)
}

/// Attach a memory to a completed item. Returns the saved memory; its
/// `photo_paths` are where the client uploads the photos, in input order.
pub async fn add_memory(
    data: &Data,
    user_id: i64,
    item_id: i64,
    input: &MemoryInput,
) -> anyhow::Result<Memory> {
    let reflection = clean_memory_input(input)?;

    let item = get_item(&data.db, item_id)
        .await?
        .ok_or(ActionError::NotFound("item"))?;
    if item.owner_id != user_id {
        return Err(ActionError::Forbidden("memories can only be added to your own items").into());
    }
    if !item.completed {
        return Err(ActionError::from(ValidationError::new(
            "item",
            "Complete this item before adding a memory.",
        ))
        .into());
    }

    let uploaded_at = now_unix_secs();
    let photo_paths: Vec<String> = input
        .photos
        .iter()
        .enumerate()
        .map(|(index, photo)| {
            photo_storage_path(
                &data.config.photo_prefix,
                user_id,
                item_id,
                uploaded_at,
                index,
                &photo.file_name,
            )
        })
        .collect();

    let memory = memories::add_memory(
        &data.db,
        NewMemory {
            item_id,
            user_id,
            reflection: &reflection,
            photo_paths: &photo_paths,
        },
    )
    .await?;

    info!(user_id, item_id, memory_id = memory.id, photos = photo_paths.len(), "memory added");
    Ok(memory)
}

pub async fn memories_for_item(data: &Data, item_id: i64) -> anyhow::Result<Vec<Memory>> {
    memories::memories_for_item(&data.db, item_id).await
}

pub async fn delete_memory(data: &Data, user_id: i64, memory_id: i64) -> anyhow::Result<()> {
    if !memories::delete_memory(&data.db, memory_id, user_id).await? {
        return Err(ActionError::NotFound("memory").into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{MemoryInput, PhotoUpload, clean_memory_input, photo_storage_path};

    fn photo(name: &str, size_bytes: u64) -> PhotoUpload {
        PhotoUpload {
            file_name: name.to_owned(),
            size_bytes,
        }
    }

    #[test]
    fn storage_paths_are_scoped_and_sanitized() {
        assert_eq!(
            photo_storage_path("memories", 7, 12, 1_700_000_000, 0, "../Summit View.JPG"),
            "memories/7/12/1700000000-0-Summit-View.jpg"
        );
    }

    #[test]
    fn validates_reflection_and_photos() {
        let ok = MemoryInput {
            reflection: "Worth every step.\r\n".to_owned(),
            photos: vec![photo("summit.png", 2_048)],
        };
        assert_eq!(clean_memory_input(&ok).unwrap(), "Worth every step.");

        let marked_up = MemoryInput {
            reflection: "<p>Worth <b>every</b> step.</p><script>alert(1)</script>".to_owned(),
            photos: Vec::new(),
        };
        assert_eq!(clean_memory_input(&marked_up).unwrap(), "Worth every step.alert(1)");

        let only_tags = MemoryInput {
            reflection: "<br/><br/>".to_owned(),
            photos: Vec::new(),
        };
        assert!(clean_memory_input(&only_tags).is_err());

        let blank = MemoryInput {
            reflection: "  \n ".to_owned(),
            photos: Vec::new(),
        };
        assert!(clean_memory_input(&blank).is_err());

        let wrong_type = MemoryInput {
            reflection: "Nice".to_owned(),
            photos: vec![photo("notes.pdf", 100)],
        };
        assert!(clean_memory_input(&wrong_type).is_err());

        let too_many = MemoryInput {
            reflection: "Nice".to_owned(),
            photos: (0..11).map(|i| photo(&format!("{i}.jpg"), 10)).collect(),
        };
        assert!(clean_memory_input(&too_many).is_err());
    }
}
