mod events;

use std::env;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use bucketly_core::config::env_bool;
use bucketly_core::{AppConfig, Data};
use bucketly_database::realtime::{ChangeEvent, Subscription, subscribe};
use bucketly_database::{CacheService, Database, MIGRATOR};

const RESUBSCRIBE_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        // pool acquire chatter
        !metadata.target().starts_with("sqlx::pool")
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL")?;
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    info!("PostgreSQL connection established.");

    let cache = cache_from_env().await;
    let db = Database::with_cache(db_pool, cache);
    db.health_check().await?;

    let auto_run_migrations = env_bool("AUTO_RUN_MIGRATIONS", true);
    if auto_run_migrations {
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    let config = AppConfig::from_env();
    info!(
        admins = config.admin_emails.len(),
        channel = %config.change_channel,
        rank_refresh_secs = config.rank_refresh_interval.as_secs(),
        "Configuration loaded."
    );
    let data = Data::new(db, config);

    run(&data).await
}

async fn cache_from_env() -> CacheService {
    let redis_enabled = env_bool("REDIS_ENABLED", false);
    let redis_key_prefix =
        env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "bucketly:prod".to_owned());

    let cache = if redis_enabled {
        match env::var("REDIS_URL") {
            Ok(redis_url) => match CacheService::redis(&redis_url, redis_key_prefix.clone()) {
                Ok(cache) => {
                    info!(key_prefix = %redis_key_prefix, "Redis cache enabled.");
                    cache
                }
                Err(err) => {
                    warn!(?err, key_prefix = %redis_key_prefix, "Failed to initialize Redis cache; continuing with DB-only mode.");
                    CacheService::disabled(redis_key_prefix)
                }
            },
            Err(_) => {
                warn!(key_prefix = %redis_key_prefix, "REDIS_ENABLED=true but REDIS_URL is missing; continuing with DB-only mode.");
                CacheService::disabled(redis_key_prefix)
            }
        }
    } else {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        CacheService::disabled(redis_key_prefix)
    };

    if cache.is_redis_enabled() {
        if let Err(err) = cache.ping().await {
            warn!(
                ?err,
                "Redis cache ping failed; cache operations will continue with fallback behavior."
            );
        } else {
            info!("Redis cache health check passed.");
        }
    }

    cache
}

async fn open_subscription(data: &Data) -> anyhow::Result<Subscription> {
    let subscription = subscribe(
        &data.db,
        &data.config.change_channel,
        data.config.realtime_buffer,
    )
    .await?;
    info!(channel = %data.config.change_channel, "Listening for changes.");
    Ok(subscription)
}

enum Step {
    Shutdown,
    RefreshRanks,
    Change(Option<ChangeEvent>),
}

/// Dispatch change events and refresh ranks until Ctrl-C.
async fn run(data: &Data) -> anyhow::Result<()> {
    let mut subscription = open_subscription(data).await?;

    let period = data.config.rank_refresh_interval.max(Duration::from_secs(1));
    let mut rank_timer = tokio::time::interval_at(Instant::now() + period, period);
    rank_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let step = tokio::select! {
            signal = &mut shutdown => {
                if let Err(err) = signal {
                    error!(?err, "failed to listen for shutdown signal");
                }
                Step::Shutdown
            }
            _ = rank_timer.tick() => Step::RefreshRanks,
            event = subscription.next() => Step::Change(event),
        };

        match step {
            Step::Shutdown => {
                info!("Shutting down.");
                break;
            }
            Step::RefreshRanks => events::ranks::refresh_ranks(data).await,
            Step::Change(Some(event)) => events::handle_change(data, &event).await,
            Step::Change(None) => {
                warn!(
                    delay_secs = RESUBSCRIBE_DELAY.as_secs(),
                    "Change stream ended; resubscribing."
                );
                tokio::time::sleep(RESUBSCRIBE_DELAY).await;
                match open_subscription(data).await {
                    Ok(fresh) => subscription = fresh,
                    Err(err) => error!(?err, "Resubscribe failed; will retry."),
                }
            }
        }
    }

    subscription.unsubscribe();
    Ok(())
}
