use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Target used by rank badges that do not declare a threshold.
pub const DEFAULT_RANK_THRESHOLD: f64 = 1.0;

/// Declarative badge criteria as stored in the `badges.criteria` JSON column.
///
/// The `type` tag names the profile counter; `target` is the value the counter
/// has to reach. Rank badges use `threshold` instead and are satisfied when the
/// profile rank is at or below it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BadgeCriteria {
    ItemsCompleted {
        #[serde(default, alias = "threshold")]
        target: f64,
    },
    ListsCreated {
        #[serde(default, alias = "threshold")]
        target: f64,
    },
    ListsFollowing {
        #[serde(default, alias = "threshold")]
        target: f64,
    },
    TotalPoints {
        #[serde(default, alias = "threshold")]
        target: f64,
    },
    GlobalRank {
        #[serde(default, alias = "target")]
        threshold: Option<f64>,
    },
    #[serde(other)]
    Unrecognized,
}

impl BadgeCriteria {
    /// Parse a criteria descriptor, falling back to [`BadgeCriteria::Unrecognized`]
    /// for anything malformed (missing tag, non-numeric target, not an object).
    pub fn from_value(value: &Value) -> Self {
        match Self::deserialize(value) {
            Ok(criteria) => criteria,
            Err(err) => {
                debug!(%err, "unparseable badge criteria; treating as unrecognized");
                Self::Unrecognized
            }
        }
    }

    /// The counter name this criteria reads, matching the JSON tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ItemsCompleted { .. } => "items_completed",
            Self::ListsCreated { .. } => "lists_created",
            Self::ListsFollowing { .. } => "lists_following",
            Self::TotalPoints { .. } => "total_points",
            Self::GlobalRank { .. } => "global_rank",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Resolved numeric target. Rank criteria default to [`DEFAULT_RANK_THRESHOLD`].
    pub fn target(&self) -> f64 {
        match *self {
            Self::ItemsCompleted { target }
            | Self::ListsCreated { target }
            | Self::ListsFollowing { target }
            | Self::TotalPoints { target } => target,
            Self::GlobalRank { threshold } => threshold.unwrap_or(DEFAULT_RANK_THRESHOLD),
            Self::Unrecognized => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::BadgeCriteria;

    #[test]
    fn parses_counter_criteria() {
        assert_eq!(
            BadgeCriteria::from_value(&json!({ "type": "items_completed", "target": 10 })),
            BadgeCriteria::ItemsCompleted { target: 10.0 }
        );
        assert_eq!(
            BadgeCriteria::from_value(&json!({ "type": "total_points", "threshold": 250.5 })),
            BadgeCriteria::TotalPoints { target: 250.5 }
        );
    }

    #[test]
    fn rank_threshold_defaults_to_first_place() {
        let criteria = BadgeCriteria::from_value(&json!({ "type": "global_rank" }));
        assert_eq!(criteria, BadgeCriteria::GlobalRank { threshold: None });
        assert_eq!(criteria.target(), 1.0);

        let criteria = BadgeCriteria::from_value(&json!({ "type": "global_rank", "target": 10 }));
        assert_eq!(criteria.target(), 10.0);
    }

    #[test]
    fn malformed_criteria_is_unrecognized() {
        assert_eq!(
            BadgeCriteria::from_value(&json!({ "type": "streak_days", "target": 7 })),
            BadgeCriteria::Unrecognized
        );
        assert_eq!(
            BadgeCriteria::from_value(&json!({ "target": 7 })),
            BadgeCriteria::Unrecognized
        );
        assert_eq!(BadgeCriteria::from_value(&json!(null)), BadgeCriteria::Unrecognized);
        assert_eq!(
            BadgeCriteria::from_value(&json!({ "type": "lists_created", "target": "ten" })),
            BadgeCriteria::Unrecognized
        );
    }

    #[test]
    fn missing_counter_target_is_zero() {
        let criteria = BadgeCriteria::from_value(&json!({ "type": "lists_following" }));
        assert_eq!(criteria, BadgeCriteria::ListsFollowing { target: 0.0 });
        assert_eq!(criteria.kind(), "lists_following");
    }
}
