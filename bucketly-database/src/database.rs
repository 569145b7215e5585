use sqlx::{PgPool, migrate::Migrator};

use crate::cache::CacheService;

/// Schema, counter triggers, change publication, the rank procedure and the feed view.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Pool plus cache, cloned into every action and background task.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
    cache: CacheService,
}

impl Database {
    pub fn with_cache(pool: PgPool, cache: CacheService) -> Self {
        Self { pool, cache }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    /// Round-trip a trivial query to confirm the pool can reach Postgres.
    pub async fn health_check(&self) -> anyhow::Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
