//! Retry policy, quiescence pauses and wait timeouts.
//!
//! Durations are written as humantime strings (`"10s"`, `"5m"`).

use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Ingress apply retry policy
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause before the repair action that precedes each retry
    #[serde(default = "default_backoff", deserialize_with = "parse_duration")]
    pub backoff: Duration,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff() -> Duration {
    Duration::from_secs(10)
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff: default_backoff(),
        }
    }
}

/// Pauses between mutations and timeouts passed to `kubectl wait`
#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Pause after the force-recreate deletes
    #[serde(default = "default_force_quiescence", deserialize_with = "parse_duration")]
    pub force_quiescence: Duration,

    /// Pause after deleting the ingress on an in-place update
    #[serde(default = "default_update_quiescence", deserialize_with = "parse_duration")]
    pub update_quiescence: Duration,

    #[serde(default = "default_controller_timeout", deserialize_with = "parse_duration")]
    pub controller_ready_timeout: Duration,

    #[serde(default = "default_database_timeout", deserialize_with = "parse_duration")]
    pub database_timeout: Duration,

    #[serde(default = "default_workload_timeout", deserialize_with = "parse_duration")]
    pub workload_timeout: Duration,
}

fn default_force_quiescence() -> Duration {
    Duration::from_secs(5)
}

fn default_update_quiescence() -> Duration {
    Duration::from_secs(2)
}

fn default_controller_timeout() -> Duration {
    Duration::from_secs(300)
}

fn default_database_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_workload_timeout() -> Duration {
    Duration::from_secs(300)
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            force_quiescence: default_force_quiescence(),
            update_quiescence: default_update_quiescence(),
            controller_ready_timeout: default_controller_timeout(),
            database_timeout: default_database_timeout(),
            workload_timeout: default_workload_timeout(),
        }
    }
}

impl TimingConfig {
    /// All pauses zeroed, timeouts kept (used by tests)
    #[cfg(test)]
    pub fn immediate() -> Self {
        Self {
            force_quiescence: Duration::ZERO,
            update_quiescence: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn parse_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom)
}
