use std::time::{SystemTime, UNIX_EPOCH};

/// Return the current unix timestamp in seconds.
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

/// Current unix timestamp as the `BIGINT` the database stores.
pub fn now_unix_secs_i64() -> i64 {
    i64::try_from(now_unix_secs()).unwrap_or(i64::MAX)
}
