use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 20;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 72;
pub const LIST_TITLE_MAX_CHARS: usize = 100;
pub const ITEM_TITLE_MAX_CHARS: usize = 120;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const LOCATION_MAX_CHARS: usize = 200;
pub const REFLECTION_MAX_CHARS: usize = 2_000;
pub const MAX_ITEM_POINTS: i64 = 1_000;
pub const MAX_PHOTOS_PER_MEMORY: usize = 10;
pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("valid regex"));

/// A rejected form field and the message shown next to it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ValidationError::new(
                "difficulty",
                "Difficulty must be easy, medium or hard.",
            )),
        }
    }
}

pub fn validate_username(raw: &str) -> ValidationResult<String> {
    let username = raw.trim();
    let len = username.chars().count();
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&len) {
        return Err(ValidationError::new(
            "username",
            format!(
                "Username must be between {USERNAME_MIN_CHARS} and {USERNAME_MAX_CHARS} characters."
            ),
        ));
    }

    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::new(
            "username",
            "Username must start with a letter and contain only letters, numbers and underscores.",
        ));
    }

    Ok(username.to_owned())
}

/// Validate an email address and return it lowercased.
pub fn validate_email(raw: &str) -> ValidationResult<String> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(ValidationError::new("email", "Email is required."));
    }

    if email.chars().count() > EMAIL_MAX_CHARS || !EMAIL_RE.is_match(email) {
        return Err(ValidationError::new(
            "email",
            "Please enter a valid email address.",
        ));
    }

    Ok(email.to_lowercase())
}

pub fn validate_password(raw: &str) -> ValidationResult<()> {
    let len = raw.chars().count();
    if len < PASSWORD_MIN_CHARS {
        return Err(ValidationError::new(
            "password",
            format!("Password must be at least {PASSWORD_MIN_CHARS} characters."),
        ));
    }

    if len > PASSWORD_MAX_CHARS {
        return Err(ValidationError::new(
            "password",
            format!("Password must be at most {PASSWORD_MAX_CHARS} characters."),
        ));
    }

    let has_letter = raw.chars().any(char::is_alphabetic);
    let has_digit = raw.chars().any(|ch| ch.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(ValidationError::new(
            "password",
            "Password must contain at least one letter and one number.",
        ));
    }

    Ok(())
}

fn required_text(
    field: &'static str,
    label: &str,
    raw: &str,
    max_chars: usize,
) -> ValidationResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::new(field, format!("{label} is required.")));
    }

    if value.chars().count() > max_chars {
        return Err(ValidationError::new(
            field,
            format!("{label} must be at most {max_chars} characters."),
        ));
    }

    Ok(value.to_owned())
}

fn optional_text(
    field: &'static str,
    label: &str,
    raw: Option<&str>,
    max_chars: usize,
) -> ValidationResult<Option<String>> {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    if value.chars().count() > max_chars {
        return Err(ValidationError::new(
            field,
            format!("{label} must be at most {max_chars} characters."),
        ));
    }

    Ok(Some(value.to_owned()))
}

pub fn validate_list_title(raw: &str) -> ValidationResult<String> {
    required_text("title", "List title", raw, LIST_TITLE_MAX_CHARS)
}

pub fn validate_item_title(raw: &str) -> ValidationResult<String> {
    required_text("title", "Item title", raw, ITEM_TITLE_MAX_CHARS)
}

/// Empty descriptions normalize to `None`.
pub fn validate_description(raw: Option<&str>) -> ValidationResult<Option<String>> {
    optional_text("description", "Description", raw, DESCRIPTION_MAX_CHARS)
}

pub fn validate_location(raw: Option<&str>) -> ValidationResult<Option<String>> {
    optional_text("location", "Location", raw, LOCATION_MAX_CHARS)
}

pub fn validate_reflection(raw: &str) -> ValidationResult<String> {
    required_text("reflection", "Reflection", raw, REFLECTION_MAX_CHARS)
}

pub fn validate_points(points: i64) -> ValidationResult<i64> {
    if !(0..=MAX_ITEM_POINTS).contains(&points) {
        return Err(ValidationError::new(
            "points",
            format!("Points must be between 0 and {MAX_ITEM_POINTS}."),
        ));
    }

    Ok(points)
}

pub fn validate_photo_count(count: usize) -> ValidationResult<()> {
    if count > MAX_PHOTOS_PER_MEMORY {
        return Err(ValidationError::new(
            "photos",
            format!("A memory can have at most {MAX_PHOTOS_PER_MEMORY} photos."),
        ));
    }

    Ok(())
}

/// Check an upload's extension and size before it is sent to storage.
pub fn validate_photo(file_name: &str, size_bytes: u64) -> ValidationResult<()> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !PHOTO_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ValidationError::new(
            "photos",
            "Photos must be JPG, PNG, WebP or GIF images.",
        ));
    }

    if size_bytes == 0 {
        return Err(ValidationError::new("photos", "Photo file is empty."));
    }

    if size_bytes > MAX_PHOTO_BYTES {
        return Err(ValidationError::new(
            "photos",
            "Photos must be 5 MB or smaller.",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        Difficulty, validate_description, validate_email, validate_item_title,
        validate_list_title, validate_password, validate_photo, validate_photo_count,
        validate_points, validate_reflection, validate_username,
    };

    #[test]
    fn usernames() {
        assert_eq!(validate_username("  wanderer_42 ").unwrap(), "wanderer_42");
        assert!(validate_username("ab").is_err());
        assert!(validate_username("a".repeat(21).as_str()).is_err());
        assert!(validate_username("9lives").is_err());
        assert!(validate_username("bad name").is_err());
        assert_eq!(validate_username("no-dash").unwrap_err().field, "username");
    }

    #[test]
    fn emails() {
        assert_eq!(
            validate_email(" Traveler@Example.COM ").unwrap(),
            "traveler@example.com"
        );
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("a@b.c").is_err());
        assert!(validate_email("two@@example.com").is_err());
    }

    #[test]
    fn passwords() {
        assert!(validate_password("hunter42!").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("onlyletters").is_err());
        assert!(validate_password("12345678").is_err());
        assert!(validate_password(&format!("a1{}", "x".repeat(71))).is_err());
    }

    #[test]
    fn titles_are_trimmed_and_bounded() {
        assert_eq!(validate_list_title("  Europe trip  ").unwrap(), "Europe trip");
        assert!(validate_list_title("   ").is_err());
        assert!(validate_list_title(&"x".repeat(101)).is_err());
        assert!(validate_item_title(&"é".repeat(120)).is_ok());
        assert!(validate_item_title(&"é".repeat(121)).is_err());
    }

    #[test]
    fn optional_text_normalizes_empty() {
        assert_eq!(validate_description(None).unwrap(), None);
        assert_eq!(validate_description(Some("   ")).unwrap(), None);
        assert_eq!(
            validate_description(Some(" see the aurora ")).unwrap(),
            Some("see the aurora".to_owned())
        );
        assert!(validate_description(Some(&"x".repeat(501))).is_err());
    }

    #[test]
    fn reflections_and_points() {
        assert!(validate_reflection("").is_err());
        assert!(validate_reflection("Unforgettable.").is_ok());
        assert_eq!(validate_points(0).unwrap(), 0);
        assert_eq!(validate_points(1_000).unwrap(), 1_000);
        assert!(validate_points(-1).is_err());
        assert!(validate_points(1_001).is_err());
    }

    #[test]
    fn difficulty_parsing() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" easy ".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!(Difficulty::Medium.to_string(), "medium");
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn photos() {
        assert!(validate_photo("summit.JPG", 1_024).is_ok());
        assert!(validate_photo("notes.pdf", 1_024).is_err());
        assert!(validate_photo("noextension", 1_024).is_err());
        assert!(validate_photo("big.png", 6 * 1024 * 1024).is_err());
        assert!(validate_photo("empty.png", 0).is_err());
        assert!(validate_photo_count(10).is_ok());
        assert!(validate_photo_count(11).is_err());
    }
}
