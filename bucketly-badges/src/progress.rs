use serde::{Deserialize, Serialize};

use crate::criteria::BadgeCriteria;

/// Snapshot of the backend-maintained profile counters. Missing counters read as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileCounters {
    pub items_completed: Option<i64>,
    pub lists_created: Option<i64>,
    pub lists_following: Option<i64>,
    pub total_points: Option<f64>,
    pub global_rank: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon_path: Option<String>,
    pub criteria: BadgeCriteria,
}

impl Badge {
    pub fn progress_for(&self, profile: &ProfileCounters) -> BadgeProgress {
        BadgeProgress {
            badge_id: self.id,
            progress: calculate_progress(&self.criteria, profile),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub current: f64,
    pub target: f64,
    /// Always within `[0, 100]`.
    pub percentage: f64,
    pub is_earned: bool,
}

impl Progress {
    const ZERO: Self = Self {
        current: 0.0,
        target: 0.0,
        percentage: 0.0,
        is_earned: false,
    };

    fn from_ratio(current: f64, target: f64) -> Self {
        if !target.is_finite() || target <= 0.0 {
            return Self::ZERO;
        }

        let current = if current.is_finite() {
            current.max(0.0)
        } else {
            0.0
        };
        // Reaching the target is exact; 100 * x / x can round below 100.
        if current >= target {
            return Self {
                current,
                target,
                percentage: 100.0,
                is_earned: true,
            };
        }

        Self {
            current,
            target,
            percentage: (100.0 * current / target).clamp(0.0, 100.0),
            is_earned: false,
        }
    }
}

/// Progress of one badge for one profile. Ephemeral, never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BadgeProgress {
    pub badge_id: i64,
    #[serde(flatten)]
    pub progress: Progress,
}

/// Compute how far `profile` is towards satisfying `criteria`.
///
/// Counter criteria are a linear ratio against the target. Rank criteria are a
/// step: a profile ranked at or above the threshold (numerically lower or
/// equal) reports `current == target`, anything else reports zero. Unranked
/// profiles never satisfy a rank badge.
pub fn calculate_progress(criteria: &BadgeCriteria, profile: &ProfileCounters) -> Progress {
    let target = criteria.target();
    let current = match criteria {
        BadgeCriteria::ItemsCompleted { .. } => profile.items_completed.unwrap_or(0) as f64,
        BadgeCriteria::ListsCreated { .. } => profile.lists_created.unwrap_or(0) as f64,
        BadgeCriteria::ListsFollowing { .. } => profile.lists_following.unwrap_or(0) as f64,
        BadgeCriteria::TotalPoints { .. } => profile.total_points.unwrap_or(0.0),
        BadgeCriteria::GlobalRank { .. } => match profile.global_rank {
            Some(rank) if rank > 0 && (rank as f64) <= target => target,
            _ => 0.0,
        },
        BadgeCriteria::Unrecognized => return Progress::ZERO,
    };

    Progress::from_ratio(current, target)
}

#[cfg(test)]
mod tests {
    use super::{Badge, ProfileCounters, Progress, calculate_progress};
    use crate::criteria::BadgeCriteria;

    fn profile() -> ProfileCounters {
        ProfileCounters {
            items_completed: Some(7),
            lists_created: Some(2),
            lists_following: None,
            total_points: Some(1_250.0),
            global_rank: Some(5),
        }
    }

    #[test]
    fn counter_progress_is_linear() {
        let progress = calculate_progress(&BadgeCriteria::ItemsCompleted { target: 10.0 }, &profile());
        assert_eq!(progress.current, 7.0);
        assert_eq!(progress.target, 10.0);
        assert_eq!(progress.percentage, 70.0);
        assert!(!progress.is_earned);
    }

    #[test]
    fn reaching_target_caps_at_one_hundred() {
        let progress = calculate_progress(&BadgeCriteria::TotalPoints { target: 1_000.0 }, &profile());
        assert_eq!(progress.current, 1_250.0);
        assert_eq!(progress.percentage, 100.0);
        assert!(progress.is_earned);

        let exact = calculate_progress(&BadgeCriteria::ListsCreated { target: 2.0 }, &profile());
        assert_eq!(exact.percentage, 100.0);
        assert!(exact.is_earned);
    }

    #[test]
    fn missing_counter_reads_zero() {
        let progress = calculate_progress(&BadgeCriteria::ListsFollowing { target: 3.0 }, &profile());
        assert_eq!(progress.current, 0.0);
        assert_eq!(progress.percentage, 0.0);
        assert!(!progress.is_earned);
    }

    #[test]
    fn zero_target_and_unrecognized_yield_zero_progress() {
        let zero_target = calculate_progress(&BadgeCriteria::ItemsCompleted { target: 0.0 }, &profile());
        assert_eq!(zero_target, Progress::default());

        let negative_target =
            calculate_progress(&BadgeCriteria::TotalPoints { target: -5.0 }, &profile());
        assert_eq!(negative_target, Progress::default());

        let unrecognized = calculate_progress(&BadgeCriteria::Unrecognized, &profile());
        assert_eq!(unrecognized.current, 0.0);
        assert_eq!(unrecognized.percentage, 0.0);
        assert!(!unrecognized.is_earned);
    }

    #[test]
    fn rank_within_threshold_is_earned() {
        let progress = calculate_progress(
            &BadgeCriteria::GlobalRank {
                threshold: Some(10.0),
            },
            &profile(),
        );
        assert_eq!(progress.current, 10.0);
        assert_eq!(progress.target, 10.0);
        assert_eq!(progress.percentage, 100.0);
        assert!(progress.is_earned);
    }

    #[test]
    fn fractional_targets_are_earned_when_reached() {
        let exact_points = ProfileCounters {
            total_points: Some(10.38),
            ..ProfileCounters::default()
        };
        let progress =
            calculate_progress(&BadgeCriteria::TotalPoints { target: 10.38 }, &exact_points);
        assert_eq!(progress.percentage, 100.0);
        assert!(progress.is_earned);

        let first = ProfileCounters {
            global_rank: Some(1),
            ..ProfileCounters::default()
        };
        let progress = calculate_progress(
            &BadgeCriteria::GlobalRank {
                threshold: Some(2.99),
            },
            &first,
        );
        assert_eq!(progress.current, 2.99);
        assert_eq!(progress.percentage, 100.0);
        assert!(progress.is_earned);

        let short = ProfileCounters {
            total_points: Some(10.37),
            ..ProfileCounters::default()
        };
        let progress = calculate_progress(&BadgeCriteria::TotalPoints { target: 10.38 }, &short);
        assert!(progress.percentage < 100.0);
        assert!(!progress.is_earned);
    }

    #[test]
    fn rank_outside_threshold_is_zero() {
        let ranked_20 = ProfileCounters {
            global_rank: Some(20),
            ..profile()
        };
        let progress = calculate_progress(
            &BadgeCriteria::GlobalRank {
                threshold: Some(10.0),
            },
            &ranked_20,
        );
        assert_eq!(progress.current, 0.0);
        assert_eq!(progress.percentage, 0.0);
        assert!(!progress.is_earned);
    }

    #[test]
    fn rank_defaults_to_first_place_and_ignores_unranked() {
        let first = ProfileCounters {
            global_rank: Some(1),
            ..ProfileCounters::default()
        };
        let criteria = BadgeCriteria::GlobalRank { threshold: None };
        assert!(calculate_progress(&criteria, &first).is_earned);
        assert!(!calculate_progress(&criteria, &profile()).is_earned);
        assert!(!calculate_progress(&criteria, &ProfileCounters::default()).is_earned);

        let zero_rank = ProfileCounters {
            global_rank: Some(0),
            ..ProfileCounters::default()
        };
        assert!(!calculate_progress(&criteria, &zero_rank).is_earned);
    }

    #[test]
    fn percentage_stays_in_bounds() {
        let negative = ProfileCounters {
            items_completed: Some(-4),
            total_points: Some(f64::NAN),
            ..ProfileCounters::default()
        };
        let criteria = [
            BadgeCriteria::ItemsCompleted { target: 1.0 },
            BadgeCriteria::ItemsCompleted { target: 3.0 },
            BadgeCriteria::TotalPoints { target: 100.0 },
            BadgeCriteria::TotalPoints { target: 0.5 },
            BadgeCriteria::GlobalRank { threshold: Some(3.0) },
        ];
        for profile in [profile(), negative, ProfileCounters::default()] {
            for criteria in &criteria {
                let progress = calculate_progress(criteria, &profile);
                assert!((0.0..=100.0).contains(&progress.percentage));
            }
        }
    }

    #[test]
    fn badge_progress_carries_badge_id() {
        let badge = Badge {
            id: 42,
            name: "Go-getter".to_owned(),
            description: "Complete ten items".to_owned(),
            icon_path: None,
            criteria: BadgeCriteria::ItemsCompleted { target: 10.0 },
        };
        let progress = badge.progress_for(&profile());
        assert_eq!(progress.badge_id, 42);
        assert_eq!(progress.progress.percentage, 70.0);
    }
}
