use std::{env, str::FromStr, time::Duration};

/// Default number of weeks kept in the LRU store.
pub const DEFAULT_MAX_WEEKS: usize = 26;
/// Default age after which a cached week is stale.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);
/// Default period of the background refresh timer.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);
/// Default minimum time between two refreshes of the same week.
pub const DEFAULT_REFRESH_THRESHOLD: Duration = Duration::from_secs(5 * 60);
/// Default number of concurrent fetches the prefetch drain may reach.
pub const DEFAULT_PREFETCH_CONCURRENCY: usize = 2;
/// Default delay between a week change and prefetch planning.
pub const DEFAULT_PREFETCH_DEBOUNCE: Duration = Duration::from_millis(100);
/// Default delay between two prefetch drain passes.
pub const DEFAULT_PREFETCH_RETRY: Duration = Duration::from_secs(1);
/// Default lifetime of an optimistic event.
pub const DEFAULT_OPTIMISTIC_TTL: Duration = Duration::from_secs(30);

/// Week cache tuning, loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of resident weeks (default: 26)
    pub max_weeks: usize,
    /// Age after which a week is served but refetched (default: 30 min)
    pub ttl: Duration,
    /// Background refresh period (default: 5 min)
    pub refresh_interval: Duration,
    /// Minimum time between refreshes of one week (default: 5 min)
    pub refresh_threshold: Duration,
    /// Concurrency bound for prefetch drain passes (default: 2)
    pub prefetch_concurrency: usize,
    /// Delay before prefetch planning (default: 100 ms)
    pub prefetch_debounce: Duration,
    /// Delay between prefetch drain passes (default: 1 s)
    pub prefetch_retry: Duration,
    /// Lifetime of an optimistic event (default: 30 s)
    pub optimistic_ttl: Duration,
}

impl CacheConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `AGENDA_CACHE_MAX_WEEKS` - Resident week limit (default: 26)
    /// - `AGENDA_CACHE_TTL_SECONDS` - Staleness TTL (default: 1800)
    /// - `AGENDA_REFRESH_INTERVAL_SECONDS` - Refresh period (default: 300)
    /// - `AGENDA_REFRESH_THRESHOLD_SECONDS` - Refresh threshold (default: 300)
    /// - `AGENDA_PREFETCH_CONCURRENCY` - Prefetch concurrency (default: 2)
    /// - `AGENDA_PREFETCH_DEBOUNCE_MS` - Prefetch debounce (default: 100)
    /// - `AGENDA_PREFETCH_RETRY_MS` - Prefetch drain retry (default: 1000)
    /// - `AGENDA_OPTIMISTIC_TTL_SECONDS` - Optimistic event lifetime (default: 30)
    ///
    /// Missing, unparsable and zero values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let count = |name: &str, default: usize| positive(&lookup, name).unwrap_or(default);
        let secs = |name: &str, default: Duration| {
            positive(&lookup, name).map_or(default, Duration::from_secs)
        };
        let millis = |name: &str, default: Duration| {
            positive(&lookup, name).map_or(default, Duration::from_millis)
        };

        Self {
            max_weeks: count("AGENDA_CACHE_MAX_WEEKS", DEFAULT_MAX_WEEKS),
            ttl: secs("AGENDA_CACHE_TTL_SECONDS", DEFAULT_TTL),
            refresh_interval: secs("AGENDA_REFRESH_INTERVAL_SECONDS", DEFAULT_REFRESH_INTERVAL),
            refresh_threshold: secs(
                "AGENDA_REFRESH_THRESHOLD_SECONDS",
                DEFAULT_REFRESH_THRESHOLD,
            ),
            prefetch_concurrency: count(
                "AGENDA_PREFETCH_CONCURRENCY",
                DEFAULT_PREFETCH_CONCURRENCY,
            ),
            prefetch_debounce: millis("AGENDA_PREFETCH_DEBOUNCE_MS", DEFAULT_PREFETCH_DEBOUNCE),
            prefetch_retry: millis("AGENDA_PREFETCH_RETRY_MS", DEFAULT_PREFETCH_RETRY),
            optimistic_ttl: secs("AGENDA_OPTIMISTIC_TTL_SECONDS", DEFAULT_OPTIMISTIC_TTL),
        }
    }

    /// Replaces settings the cache cannot run with by their defaults.
    ///
    /// A zero `max_weeks`, `prefetch_concurrency`, `refresh_interval` or
    /// `prefetch_retry` is reset with a warning. Other zero durations are
    /// kept: they only make the cache eager.
    pub fn validated(mut self) -> Self {
        if self.max_weeks == 0 {
            tracing::warn!(setting = "max_weeks", "Zero is not allowed, using default");
            self.max_weeks = DEFAULT_MAX_WEEKS;
        }
        if self.prefetch_concurrency == 0 {
            tracing::warn!(setting = "prefetch_concurrency", "Zero is not allowed, using default");
            self.prefetch_concurrency = DEFAULT_PREFETCH_CONCURRENCY;
        }
        if self.refresh_interval.is_zero() {
            tracing::warn!(setting = "refresh_interval", "Zero is not allowed, using default");
            self.refresh_interval = DEFAULT_REFRESH_INTERVAL;
        }
        if self.prefetch_retry.is_zero() {
            tracing::warn!(setting = "prefetch_retry", "Zero is not allowed, using default");
            self.prefetch_retry = DEFAULT_PREFETCH_RETRY;
        }
        self
    }
}

fn positive<F, T>(lookup: &F, name: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default,
{
    let raw = lookup(name)?;
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Some(value),
        _ => {
            tracing::warn!(variable = name, value = %raw, "Ignoring invalid configuration value");
            None
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_weeks: DEFAULT_MAX_WEEKS,
            ttl: DEFAULT_TTL,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            refresh_threshold: DEFAULT_REFRESH_THRESHOLD,
            prefetch_concurrency: DEFAULT_PREFETCH_CONCURRENCY,
            prefetch_debounce: DEFAULT_PREFETCH_DEBOUNCE,
            prefetch_retry: DEFAULT_PREFETCH_RETRY,
            optimistic_ttl: DEFAULT_OPTIMISTIC_TTL,
        }
    }
}
