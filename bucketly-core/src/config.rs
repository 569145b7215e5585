use std::env;
use std::time::Duration;

use bucketly_utils::parse::{parse_duration, parse_flag};
use tracing::warn;

pub const DEFAULT_LEADERBOARD_SIZE: u32 = 50;
pub const DEFAULT_FEED_PAGE_SIZE: u32 = 20;
pub const DEFAULT_RANK_REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_REALTIME_BUFFER: usize = 256;
pub const DEFAULT_CHANGE_CHANNEL: &str = "bucketly_changes";
pub const DEFAULT_PHOTO_PREFIX: &str = "memories";

/// Runtime configuration, built once at startup and shared behind an `Arc`.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Lowercased emails allowed to run admin actions.
    pub admin_emails: Vec<String>,
    pub leaderboard_size: u32,
    pub feed_page_size: u32,
    pub rank_refresh_interval: Duration,
    pub change_channel: String,
    pub realtime_buffer: usize,
    /// Object storage prefix for memory photos.
    pub photo_prefix: String,
    /// Run the award sweep and follower fan-out inline when an action completes an item.
    pub sweep_on_completion: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            admin_emails: Vec::new(),
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            feed_page_size: DEFAULT_FEED_PAGE_SIZE,
            rank_refresh_interval: DEFAULT_RANK_REFRESH_INTERVAL,
            change_channel: DEFAULT_CHANGE_CHANNEL.to_owned(),
            realtime_buffer: DEFAULT_REALTIME_BUFFER,
            photo_prefix: DEFAULT_PHOTO_PREFIX.to_owned(),
            sweep_on_completion: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset or unparseable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let rank_refresh_interval = match read("RANK_REFRESH_INTERVAL") {
            Some(raw) => parse_duration(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "invalid RANK_REFRESH_INTERVAL; using default");
                defaults.rank_refresh_interval
            }),
            None => defaults.rank_refresh_interval,
        };

        Self {
            admin_emails: read("ADMIN_EMAILS")
                .map(|raw| parse_email_list(&raw))
                .unwrap_or(defaults.admin_emails),
            leaderboard_size: read("LEADERBOARD_SIZE")
                .and_then(|raw| raw.trim().parse::<u32>().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.leaderboard_size),
            feed_page_size: read("FEED_PAGE_SIZE")
                .and_then(|raw| raw.trim().parse::<u32>().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.feed_page_size),
            rank_refresh_interval,
            change_channel: read("REALTIME_CHANNEL")
                .map(|raw| raw.trim().to_owned())
                .unwrap_or(defaults.change_channel),
            realtime_buffer: read("REALTIME_BUFFER")
                .and_then(|raw| raw.trim().parse::<usize>().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.realtime_buffer),
            photo_prefix: read("PHOTO_PREFIX")
                .map(|raw| raw.trim().trim_matches('/').to_owned())
                .filter(|prefix| !prefix.is_empty())
                .unwrap_or(defaults.photo_prefix),
            sweep_on_completion: read("SWEEP_ON_COMPLETION")
                .and_then(|raw| parse_flag(&raw))
                .unwrap_or(defaults.sweep_on_completion),
        }
    }

    pub fn with_admins<I, S>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.admin_emails = emails
            .into_iter()
            .map(|email| email.as_ref().trim().to_lowercase())
            .filter(|email| !email.is_empty())
            .collect();
        self
    }

    pub fn is_admin(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        !email.is_empty() && self.admin_emails.iter().any(|admin| *admin == email)
    }
}

fn parse_email_list(raw: &str) -> Vec<String> {
    let mut emails: Vec<String> = raw
        .split([',', ';', ' ', '\n'])
        .map(|email| email.trim().to_lowercase())
        .filter(|email| !email.is_empty())
        .collect();
    emails.sort();
    emails.dedup();
    emails
}

pub fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|value| parse_flag(&value))
        .unwrap_or(default)
}

pub fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::{AppConfig, DEFAULT_LEADERBOARD_SIZE};

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config_from(&[]), AppConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("ADMIN_EMAILS", "Ops@Bucketly.app, founder@bucketly.app;ops@bucketly.app"),
            ("LEADERBOARD_SIZE", "25"),
            ("RANK_REFRESH_INTERVAL", "2m"),
            ("SWEEP_ON_COMPLETION", "off"),
            ("PHOTO_PREFIX", "/uploads/"),
        ]);

        assert_eq!(
            config.admin_emails,
            vec!["founder@bucketly.app".to_owned(), "ops@bucketly.app".to_owned()]
        );
        assert_eq!(config.leaderboard_size, 25);
        assert_eq!(config.rank_refresh_interval, Duration::from_secs(120));
        assert!(!config.sweep_on_completion);
        assert_eq!(config.photo_prefix, "uploads");
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = config_from(&[
            ("LEADERBOARD_SIZE", "0"),
            ("RANK_REFRESH_INTERVAL", "soon"),
            ("SWEEP_ON_COMPLETION", "perhaps"),
        ]);
        assert_eq!(config.leaderboard_size, DEFAULT_LEADERBOARD_SIZE);
        assert_eq!(config.rank_refresh_interval, AppConfig::default().rank_refresh_interval);
        assert!(config.sweep_on_completion);
    }

    #[test]
    fn admin_check_is_case_insensitive() {
        let config = AppConfig::default().with_admins(["Admin@Bucketly.app"]);
        assert!(config.is_admin(" admin@bucketly.APP "));
        assert!(!config.is_admin("someone@bucketly.app"));
        assert!(!config.is_admin(""));
    }
}
