use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const MAX_QUEUE_DEPTH_PROPERTY: &str = "maxQueueDepth";
pub const MAX_PUT_WAIT_TIME_PROPERTY: &str = "maxPutWaitTime";
pub const MAX_POLL_WAIT_TIME_PROPERTY: &str = "maxPollWaitTime";

pub const DEFAULT_MAX_QUEUE_DEPTH: usize = 50_000;
pub const DEFAULT_PUT_BLOCK_TIMEOUT_MS: u64 = 0;
pub const DEFAULT_POLL_WAIT_TIMEOUT_MS: u64 = 100;

/// Queue limits. All times are milliseconds.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueConfig {
    /// Capacity ceiling across all buckets.
    pub max_queue_depth: usize,
    /// How long `offer` may block, lock acquisition included. `0` fails at once.
    pub max_put_wait_time: u64,
    /// Wait used by `poll_wait(true)`.
    pub max_poll_wait_time: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_queue_depth: DEFAULT_MAX_QUEUE_DEPTH,
            max_put_wait_time: DEFAULT_PUT_BLOCK_TIMEOUT_MS,
            max_poll_wait_time: DEFAULT_POLL_WAIT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("config parse error: {0}")]
    Parse(String),
}

impl QueueConfig {
    #[inline]
    pub fn put_block_timeout(&self) -> Duration {
        Duration::from_millis(self.max_put_wait_time)
    }

    #[inline]
    pub fn poll_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.max_poll_wait_time)
    }

    pub fn with_max_queue_depth(mut self, depth: usize) -> Self {
        self.max_queue_depth = depth;
        self
    }

    pub fn with_put_wait(mut self, wait: Duration) -> Self {
        self.max_put_wait_time = wait.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    pub fn with_poll_wait(mut self, wait: Duration) -> Self {
        self.max_poll_wait_time = wait.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    /// Build from a property bag. Missing keys keep their defaults and
    /// unrecognised keys are ignored.
    pub fn from_properties<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
        K: AsRef<str>,
    {
        let mut cfg = Self::default();
        for (key, value) in properties {
            match key.as_ref() {
                MAX_QUEUE_DEPTH_PROPERTY => {
                    cfg.max_queue_depth = usize::try_from(value).unwrap_or(usize::MAX)
                }
                MAX_PUT_WAIT_TIME_PROPERTY => cfg.max_put_wait_time = value,
                MAX_POLL_WAIT_TIME_PROPERTY => cfg.max_poll_wait_time = value,
                other => tracing::warn!(property = other, "ignoring unknown queue property"),
            }
        }
        cfg
    }

    fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let raw = fs::read_to_string(path_ref)?;
        let ext = path_ref
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("toml")
            .to_ascii_lowercase();

        if ext == "yaml" || ext == "yml" {
            let cfg: QueueConfig = serde_yaml::from_str(&raw)?;
            Ok(cfg)
        } else {
            let cfg: QueueConfig = toml::from_str(&raw)?;
            Ok(cfg)
        }
    }

    /// Load configuration from an optional file path and environment variables.
    ///
    /// Precedence: file values provide defaults, environment variables override.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let env_path = env::var("PRIOQ_CONFIG").ok();
        let effective_path = path.map(|s| s.to_string()).or(env_path);

        let mut cfg = if let Some(p) = effective_path {
            Self::load_file(p)?
        } else {
            Self::default()
        };

        // Env overrides.
        if let Ok(v) = env::var("PRIOQ_MAX_QUEUE_DEPTH") {
            cfg.max_queue_depth = v
                .parse()
                .map_err(|e| ConfigError::Parse(format!("PRIOQ_MAX_QUEUE_DEPTH: {e}")))?;
        }

        if let Ok(v) = env::var("PRIOQ_MAX_PUT_WAIT_TIME") {
            cfg.max_put_wait_time = v
                .parse()
                .map_err(|e| ConfigError::Parse(format!("PRIOQ_MAX_PUT_WAIT_TIME: {e}")))?;
        }

        if let Ok(v) = env::var("PRIOQ_MAX_POLL_WAIT_TIME") {
            cfg.max_poll_wait_time = v
                .parse()
                .map_err(|e| ConfigError::Parse(format!("PRIOQ_MAX_POLL_WAIT_TIME: {e}")))?;
        }

        Ok(cfg)
    }
}

/// Read a TOML (or `.yaml`/`.yml`) file, no environment overrides.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<QueueConfig, ConfigError> {
    QueueConfig::load_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = QueueConfig::default();
        assert_eq!(cfg.max_queue_depth, 50_000);
        assert_eq!(cfg.put_block_timeout(), Duration::ZERO);
        assert_eq!(cfg.poll_wait_timeout(), Duration::from_millis(100));
    }

    #[test]
    fn properties_override_known_keys_only() {
        let cfg = QueueConfig::from_properties([
            (MAX_PUT_WAIT_TIME_PROPERTY, 1000),
            (MAX_QUEUE_DEPTH_PROPERTY, 5),
            ("somethingElse", 7),
        ]);
        assert_eq!(cfg.max_queue_depth, 5);
        assert_eq!(cfg.max_put_wait_time, 1000);
        assert_eq!(cfg.max_poll_wait_time, DEFAULT_POLL_WAIT_TIMEOUT_MS);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: QueueConfig = toml::from_str("maxPutWaitTime = 25").unwrap();
        assert_eq!(cfg.max_put_wait_time, 25);
        assert_eq!(cfg.max_queue_depth, DEFAULT_MAX_QUEUE_DEPTH);
    }

    #[test]
    fn yaml_uses_the_same_keys() {
        let cfg: QueueConfig =
            serde_yaml::from_str("maxQueueDepth: 10\nmaxPollWaitTime: 5\n").unwrap();
        assert_eq!(cfg.max_queue_depth, 10);
        assert_eq!(cfg.max_poll_wait_time, 5);
    }

    #[test]
    fn builder_helpers_round_to_millis() {
        let cfg = QueueConfig::default()
            .with_max_queue_depth(3)
            .with_put_wait(Duration::from_micros(2500))
            .with_poll_wait(Duration::from_secs(1));
        assert_eq!(cfg.max_queue_depth, 3);
        assert_eq!(cfg.max_put_wait_time, 2);
        assert_eq!(cfg.max_poll_wait_time, 1000);
    }
}
