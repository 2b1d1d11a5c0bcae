//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::fmt::Display;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// How long a loaded record may be served before it is reloaded.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Entry store capacity when none is configured.
pub const DEFAULT_MAX_ENTRIES: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => unreachable!(),
};

pub const DEFAULT_CONTENT_ROOT: &str = "content";

/// Content cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the markdown content files
    pub content_root: PathBuf,
    /// Freshness window for cached records
    pub ttl: Duration,
    /// Maximum number of entries the cache can hold
    pub max_entries: NonZeroUsize,
    /// Background sweeper interval; `None` keeps expiry purely lazy
    pub sweep_interval: Option<Duration>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CONTENT_ROOT` - Content directory (default: `content`)
    /// - `CONTENT_TTL` - TTL in seconds, must be positive (default: 300)
    /// - `MAX_ENTRIES` - Maximum cache entries, must be positive (default: 1000)
    /// - `SWEEP_INTERVAL` - Sweeper frequency in seconds, 0 disables (default: 0)
    ///
    /// Unparseable or zero values fall back to the default with a warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let content_root = env::var("CONTENT_ROOT")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.content_root);

        let ttl = match env_parsed::<u64>("CONTENT_TTL") {
            Some(0) => {
                warn!(var = "CONTENT_TTL", "ttl must be positive, using default");
                defaults.ttl
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.ttl,
        };

        let max_entries = match env_parsed::<usize>("MAX_ENTRIES") {
            Some(n) => NonZeroUsize::new(n).unwrap_or_else(|| {
                warn!(var = "MAX_ENTRIES", "max entries must be positive, using default");
                defaults.max_entries
            }),
            None => defaults.max_entries,
        };

        let sweep_interval = env_parsed::<u64>("SWEEP_INTERVAL")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            content_root,
            ttl,
            max_entries,
            sweep_interval,
        }
    }

    pub fn with_content_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.content_root = root.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_entries(mut self, max_entries: NonZeroUsize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Option<Duration>) -> Self {
        self.sweep_interval = interval.filter(|d| !d.is_zero());
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from(DEFAULT_CONTENT_ROOT),
            ttl: DEFAULT_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
            sweep_interval: None,
        }
    }
}

/// Reads and parses `name`, warning when the value is set but unusable.
fn env_parsed<T>(name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(var = name, value = %raw, "ignoring invalid value: {}", err);
            None
        }
    }
}
