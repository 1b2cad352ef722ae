//! ProcessorConfig - 実行時の設定
//!
//! Values come from defaults overridden by `SWEEP_*` environment variables:
//!
//! | variable                    | default |
//! |-----------------------------|---------|
//! | `SWEEP_WORKER_THREADS`      | 10      |
//! | `SWEEP_WORK_DELAY_MS`       | 100     |
//! | `SWEEP_SHUTDOWN_TIMEOUT_MS` | 5000 (0 = wait indefinitely) |

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "SWEEP";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Size of the worker pool.
    pub worker_threads: usize,

    /// Per-item latency standing in for real I/O or computation.
    pub work_delay_ms: u64,

    /// How long shutdown waits for in-flight items before interrupting them.
    ///
    /// `None` and `Some(0)` both mean no limit: shutdown waits until every
    /// accepted item has finished, however long that takes.
    pub shutdown_timeout_ms: Option<u64>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            worker_threads: 10,
            work_delay_ms: 100,
            shutdown_timeout_ms: Some(5_000),
        }
    }
}

impl ProcessorConfig {
    /// Defaults overridden by `SWEEP_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let source = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Self::from_source(source)
    }

    /// Deserialize from an already built `config::Config`; missing keys keep
    /// their defaults.
    pub fn from_source(source: config::Config) -> Result<Self, ConfigError> {
        let parsed: Self = source.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_threads == 0 {
            return Err(ConfigError::Invalid(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn work_delay(&self) -> Duration {
        Duration::from_millis(self.work_delay_ms)
    }

    pub fn shutdown_timeout(&self) -> Option<Duration> {
        match self.shutdown_timeout_ms {
            None | Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
        }
    }

    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads;
        self
    }

    pub fn with_work_delay(mut self, delay: Duration) -> Self {
        self.work_delay_ms = saturating_millis(delay);
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.shutdown_timeout_ms = timeout.map(saturating_millis);
        self
    }
}

fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_match_reference_behavior() {
        let cfg = ProcessorConfig::default();
        assert_eq!(cfg.worker_threads, 10);
        assert_eq!(cfg.work_delay(), Duration::from_millis(100));
        assert_eq!(cfg.shutdown_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn empty_source_yields_defaults() {
        let source = config::Config::builder().build().unwrap();
        let cfg = ProcessorConfig::from_source(source).unwrap();
        assert_eq!(cfg, ProcessorConfig::default());
    }

    #[test]
    fn overrides_replace_single_keys() {
        let source = config::Config::builder()
            .set_override("worker_threads", 4)
            .unwrap()
            .set_override("work_delay_ms", 5)
            .unwrap()
            .build()
            .unwrap();
        let cfg = ProcessorConfig::from_source(source).unwrap();

        assert_eq!(cfg.worker_threads, 4);
        assert_eq!(cfg.work_delay_ms, 5);
        assert_eq!(cfg.shutdown_timeout_ms, Some(5_000));
    }

    #[test]
    fn zero_workers_is_rejected() {
        let source = config::Config::builder()
            .set_override("worker_threads", 0)
            .unwrap()
            .build()
            .unwrap();
        let err = ProcessorConfig::from_source(source).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(0), None)]
    #[case(Some(250), Some(Duration::from_millis(250)))]
    fn shutdown_timeout_zero_means_unbounded(
        #[case] ms: Option<u64>,
        #[case] expected: Option<Duration>,
    ) {
        let cfg = ProcessorConfig {
            shutdown_timeout_ms: ms,
            ..ProcessorConfig::default()
        };
        assert_eq!(cfg.shutdown_timeout(), expected);
    }

    #[test]
    fn oversized_durations_saturate() {
        let cfg = ProcessorConfig::default()
            .with_work_delay(Duration::MAX)
            .with_shutdown_timeout(Some(Duration::MAX));
        assert_eq!(cfg.work_delay_ms, u64::MAX);
        assert_eq!(cfg.shutdown_timeout_ms, Some(u64::MAX));

        let cfg = cfg.with_work_delay(Duration::from_micros(1_500));
        assert_eq!(cfg.work_delay_ms, 1);
    }
}
