pub mod config;
pub mod error;
pub mod feedback;
pub mod optimistic;

use std::sync::Arc;

use bucketly_database::Database;

pub use config::AppConfig;
pub use error::ActionError;

pub type Error = anyhow::Error;

/// Handles every action and background task needs.
#[derive(Clone, Debug)]
pub struct Data {
    pub db: Database,
    pub config: Arc<AppConfig>,
}

impl Data {
    pub fn new(db: Database, config: AppConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}
