//! Batch configuration.

use std::time::Duration;

use chatclip_models::Settings;

use crate::render_pool::DEFAULT_RENDER_WORKERS;

/// Tunable widths and timeouts for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum concurrently processed items. Must be at least 1.
    pub max_workers: usize,

    /// Render pool width, independent of `max_workers` because overlay
    /// rendering is the heaviest step and must not scale with batch width.
    pub render_workers: usize,

    /// Wall-clock bound on the whole batch call.
    pub batch_timeout: Duration,

    /// Bound on waiting for a pooled chat render within one item.
    pub render_wait: Duration,

    /// Bound on the final combine step within one item.
    pub combine_wait: Duration,

    /// Timeout applied to each external command, in seconds.
    pub step_timeout_secs: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_workers: 3,
            render_workers: DEFAULT_RENDER_WORKERS,
            batch_timeout: Duration::from_secs(3600),
            render_wait: Duration::from_secs(300),
            combine_wait: Duration::from_secs(600),
            step_timeout_secs: 900,
        }
    }
}

impl BatchConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_workers: env_parse("CHATCLIP_MAX_WORKERS", defaults.max_workers),
            render_workers: env_parse("CHATCLIP_RENDER_WORKERS", defaults.render_workers),
            batch_timeout: Duration::from_secs(env_parse("CHATCLIP_BATCH_TIMEOUT_SECS", 3600)),
            render_wait: Duration::from_secs(env_parse("CHATCLIP_RENDER_WAIT_SECS", 300)),
            combine_wait: Duration::from_secs(env_parse("CHATCLIP_COMBINE_WAIT_SECS", 600)),
            step_timeout_secs: env_parse("CHATCLIP_STEP_TIMEOUT_SECS", 900),
        }
    }

    /// Apply the persisted settings snapshot (worker width).
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.max_workers = settings.max_workers;
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BatchConfig::default();
        assert_eq!(config.max_workers, 3);
        assert_eq!(config.render_workers, 2);
        assert_eq!(config.batch_timeout, Duration::from_secs(3600));
        assert_eq!(config.render_wait, Duration::from_secs(300));
        assert_eq!(config.combine_wait, Duration::from_secs(600));
    }

    #[test]
    fn test_with_settings_takes_worker_width() {
        let mut settings = Settings::default();
        settings.max_workers = 7;
        let config = BatchConfig::default().with_settings(&settings);
        assert_eq!(config.max_workers, 7);
        assert_eq!(config.render_workers, 2);
    }
}
