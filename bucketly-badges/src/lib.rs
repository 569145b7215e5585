//! Badge criteria, progress calculation and the award sweep.
//!
//! Everything here is storage-agnostic: the sweep talks to an [`AwardLedger`]
//! which `bucketly-database` implements for Postgres.

pub mod award;
pub mod criteria;
pub mod progress;

pub use award::{AwardLedger, SweepReport, run_award_sweep};
pub use criteria::BadgeCriteria;
pub use progress::{Badge, BadgeProgress, Progress, ProfileCounters, calculate_progress};
