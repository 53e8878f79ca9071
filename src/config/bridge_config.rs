use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

use crate::calendar::forex_factory::ForexFactorySource;
use crate::types::blackout_window::BlackoutWindow;

/// Settings read once at startup.
pub struct BridgeConfig {
    /// Shared secret clients must present. `None` rejects every status request.
    pub bridge_token: Option<String>,

    /// Window used when a request does not override it.
    pub default_window: BlackoutWindow,

    /// How long a fetched calendar is served before refetching. Zero always refetches.
    pub cache_ttl: Duration,

    /// Trading Economics API key, only needed by that source.
    pub te_api_key: Option<String>,

    /// XML feed location for the Forex Factory source.
    pub feed_url: Url,

    /// Upper bound on a single upstream request.
    pub upstream_timeout: Duration,
}

impl BridgeConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let pre_minutes = parse_or(read("PRE_MINUTES"), "PRE_MINUTES", 10)?;
        let post_minutes = parse_or(read("POST_MINUTES"), "POST_MINUTES", 30)?;
        let default_window = BlackoutWindow::new(pre_minutes, post_minutes)
            .context("invalid default blackout window")?;

        let cache_ttl_secs: u64 = parse_or(read("CACHE_TTL_SEC"), "CACHE_TTL_SEC", 60)?;
        let timeout_secs: u64 = parse_or(read("UPSTREAM_TIMEOUT_SEC"), "UPSTREAM_TIMEOUT_SEC", 10)?;
        if timeout_secs == 0 {
            anyhow::bail!("UPSTREAM_TIMEOUT_SEC must be > 0");
        }

        let feed_url = read("CALENDAR_FEED_URL")
            .unwrap_or_else(|| ForexFactorySource::DEFAULT_FEED_URL.to_string());
        let feed_url =
            Url::parse(&feed_url).with_context(|| format!("invalid CALENDAR_FEED_URL {feed_url}"))?;

        Ok(Self {
            bridge_token: read("BRIDGE_TOKEN"),
            default_window,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            te_api_key: read("TE_API_KEY"),
            feed_url,
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got {raw:?}")),
        None => Ok(default),
    }
}

impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("bridge_token_set", &self.bridge_token.is_some())
            .field("default_window", &self.default_window)
            .field("cache_ttl", &self.cache_ttl)
            .field("te_api_key_set", &self.te_api_key.is_some())
            .field("feed_url", &self.feed_url.as_str())
            .field("upstream_timeout", &self.upstream_timeout)
            .finish()
    }
}
