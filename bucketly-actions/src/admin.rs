//! Operations reserved for the configured admin allowlist.

use bucketly_badges::{Badge, BadgeCriteria};
use bucketly_core::{ActionError, AppConfig, Data};
use bucketly_database::impls::badges::{self, NewBadge};
use bucketly_database::impls::leaderboard::recalculate_global_ranks;
use bucketly_utils::sanitize::{sanitize_multiline, sanitize_single_line};
use bucketly_utils::validation::{DESCRIPTION_MAX_CHARS, ValidationError};
use serde_json::Value;
use tracing::info;

pub const BADGE_NAME_MAX_CHARS: usize = 60;

#[derive(Clone, Debug)]
pub struct BadgeInput {
    pub name: String,
    pub description: String,
    pub icon_path: Option<String>,
    pub criteria: Value,
}

pub fn require_admin(config: &AppConfig, email: &str) -> Result<(), ActionError> {
    if config.is_admin(email) {
        Ok(())
    } else {
        Err(ActionError::Forbidden("admin only"))
    }
}

/// Badges must use a criteria type the calculator understands and a positive target.
fn check_criteria(criteria: &Value) -> Result<BadgeCriteria, ValidationError> {
    let parsed = BadgeCriteria::from_value(criteria);
    if parsed == BadgeCriteria::Unrecognized {
        return Err(ValidationError::new(
            "criteria",
            "Criteria type must be items_completed, lists_created, lists_following, total_points or global_rank.",
        ));
    }

    let target = parsed.target();
    if !target.is_finite() || target <= 0.0 {
        return Err(ValidationError::new("criteria", "Criteria target must be greater than zero."));
    }

    Ok(parsed)
}

pub async fn create_badge(data: &Data, actor_email: &str, input: &BadgeInput) -> anyhow::Result<Badge> {
    require_admin(&data.config, actor_email)?;

    let name = sanitize_single_line(&input.name, BADGE_NAME_MAX_CHARS);
    if name.is_empty() {
        return Err(ActionError::from(ValidationError::new("name", "Badge name is required.")).into());
    }
    let description = sanitize_multiline(&input.description, DESCRIPTION_MAX_CHARS);
    let icon_path = input
        .icon_path
        .as_deref()
        .map(str::trim)
        .filter(|path| !path.is_empty());
    let criteria = check_criteria(&input.criteria).map_err(ActionError::from)?;

    let badge = badges::create_badge(
        &data.db,
        NewBadge {
            name: &name,
            description: &description,
            icon_path,
            criteria: &input.criteria,
        },
    )
    .await?;

    info!(badge_id = badge.id, kind = criteria.kind(), actor = actor_email, "badge created");
    Ok(badge)
}

pub async fn recalculate_ranks(data: &Data, actor_email: &str) -> anyhow::Result<()> {
    require_admin(&data.config, actor_email)?;
    recalculate_global_ranks(&data.db).await?;
    info!(actor = actor_email, "global ranks recalculated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use bucketly_badges::BadgeCriteria;
    use bucketly_core::AppConfig;
    use serde_json::json;

    use super::{check_criteria, require_admin};

    #[test]
    fn only_allowlisted_emails_pass() {
        let config = AppConfig::default().with_admins(["ops@bucketly.app"]);
        assert!(require_admin(&config, "OPS@bucketly.app").is_ok());
        assert!(require_admin(&config, "guest@bucketly.app").is_err());
        assert!(require_admin(&AppConfig::default(), "ops@bucketly.app").is_err());
    }

    #[test]
    fn accepts_known_criteria() {
        assert_eq!(
            check_criteria(&json!({ "type": "items_completed", "target": 10 })).unwrap(),
            BadgeCriteria::ItemsCompleted { target: 10.0 }
        );
        assert_eq!(
            check_criteria(&json!({ "type": "global_rank" })).unwrap(),
            BadgeCriteria::GlobalRank { threshold: None }
        );
    }

    #[test]
    fn rejects_unknown_or_empty_criteria() {
        assert!(check_criteria(&json!({ "type": "marathons_run", "target": 3 })).is_err());
        assert!(check_criteria(&json!("items_completed")).is_err());
        assert!(check_criteria(&json!({ "type": "total_points", "target": 0 })).is_err());
        assert!(check_criteria(&json!({ "type": "lists_created" })).is_err());
    }
}
