use bucketly_core::{ActionError, Data};
use bucketly_database::impls::profiles::{
    get_profile, get_profile_by_username, is_username_taken, set_avatar_path,
    update_profile_details,
};
use bucketly_database::model::profile::Profile;
use bucketly_utils::sanitize::{sanitize_multiline, sanitize_single_line, sanitize_storage_file_name};
use bucketly_utils::time::now_unix_secs;
use bucketly_utils::validation::{
    DESCRIPTION_MAX_CHARS, ValidationError, validate_description, validate_email,
    validate_password, validate_photo, validate_username,
};
use tracing::info;

pub const DISPLAY_NAME_MAX_CHARS: usize = 50;
const AVATAR_PREFIX: &str = "avatars";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UsernameCheck {
    Available(String),
    Taken,
}

/// Sign-up fields after validation. The password is checked, never stored here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignUpForm {
    pub username: String,
    pub email: String,
}

pub fn validate_sign_up(username: &str, email: &str, password: &str) -> Result<SignUpForm, ActionError> {
    let username = validate_username(username)?;
    let email = validate_email(email)?;
    validate_password(password)?;

    Ok(SignUpForm { username, email })
}

pub async fn check_username(data: &Data, raw: &str) -> anyhow::Result<UsernameCheck> {
    let username = validate_username(raw).map_err(ActionError::from)?;
    if is_username_taken(&data.db, &username).await? {
        return Ok(UsernameCheck::Taken);
    }
    Ok(UsernameCheck::Available(username))
}

pub async fn profile(data: &Data, user_id: i64) -> anyhow::Result<Profile> {
    get_profile(&data.db, user_id)
        .await?
        .ok_or_else(|| ActionError::NotFound("profile").into())
}

pub async fn profile_by_username(data: &Data, username: &str) -> anyhow::Result<Profile> {
    get_profile_by_username(&data.db, username.trim())
        .await?
        .ok_or_else(|| ActionError::NotFound("profile").into())
}

fn clean_display_name(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let name = sanitize_single_line(raw, DISPLAY_NAME_MAX_CHARS + 1);
    if name.chars().count() > DISPLAY_NAME_MAX_CHARS {
        return Err(ValidationError::new(
            "display_name",
            format!("Display name must be at most {DISPLAY_NAME_MAX_CHARS} characters."),
        ));
    }
    Ok(Some(name).filter(|name| !name.is_empty()))
}

pub async fn update_profile(
    data: &Data,
    user_id: i64,
    display_name: Option<&str>,
    bio: Option<&str>,
) -> anyhow::Result<()> {
    let display_name = clean_display_name(display_name).map_err(ActionError::from)?;
    let bio = validate_description(
        bio.map(|raw| sanitize_multiline(raw, DESCRIPTION_MAX_CHARS + 1))
            .as_deref(),
    )
    .map_err(ActionError::from)?;

    if !update_profile_details(&data.db, user_id, display_name.as_deref(), bio.as_deref()).await? {
        return Err(ActionError::NotFound("profile").into());
    }

    info!(user_id, "profile updated");
    Ok(())
}

/// Validate an avatar upload and record its storage path. Returns the path
/// the client uploads to.
pub async fn set_avatar(
    data: &Data,
    user_id: i64,
    file_name: &str,
    size_bytes: u64,
) -> anyhow::Result<String> {
    validate_photo(file_name, size_bytes).map_err(ActionError::from)?;
    let path = format!(
        "{AVATAR_PREFIX}/{user_id}/{}-{}",
        now_unix_secs(),
        sanitize_storage_file_name(file_name)
    );

    if !set_avatar_path(&data.db, user_id, &path).await? {
        return Err(ActionError::NotFound("profile").into());
    }
    Ok(path)
}
