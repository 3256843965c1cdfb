use std::time::Duration;

use super::policy::{RetryPolicy, UpdatePolicy};
use super::provider::PositionOptions;
use crate::config::TrackingConfig;

/// Runtime timings of the location tracker
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSettings {
    pub update: UpdatePolicy,
    pub retry: RetryPolicy,
    /// Re-poll cadence, independent of the watch subscription
    pub periodic_interval: Duration,
    pub health_check_interval: Duration,
    /// Gap without a successful sample after which tracking restarts
    pub stale_after: Duration,
    /// Pause between teardown and re-initialisation on a health restart
    pub restart_grace: Duration,
    pub one_shot: PositionOptions,
    pub watch: PositionOptions,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            update: UpdatePolicy::default(),
            retry: RetryPolicy::default(),
            periodic_interval: Duration::from_secs(45),
            health_check_interval: Duration::from_secs(60),
            stale_after: Duration::from_secs(120),
            restart_grace: Duration::from_secs(2),
            one_shot: PositionOptions {
                enable_high_accuracy: true,
                timeout: Duration::from_secs(10),
                maximum_age: Duration::from_secs(30),
            },
            watch: PositionOptions {
                enable_high_accuracy: true,
                timeout: Duration::from_secs(15),
                maximum_age: Duration::from_secs(45),
            },
        }
    }
}

impl From<&TrackingConfig> for TrackingSettings {
    fn from(config: &TrackingConfig) -> Self {
        Self {
            update: UpdatePolicy {
                min_distance_km: f64::from(config.min_movement_meters) / 1000.0,
                refresh_after: Duration::from_secs(config.refresh_after_secs),
            },
            retry: RetryPolicy {
                max_retries: config.max_retries,
                base_delay: Duration::from_millis(config.retry_base_delay_ms),
            },
            periodic_interval: Duration::from_secs(config.periodic_interval_secs),
            health_check_interval: Duration::from_secs(config.health_check_interval_secs),
            stale_after: Duration::from_secs(config.stale_after_secs),
            restart_grace: Duration::from_millis(config.restart_grace_ms),
            one_shot: PositionOptions {
                enable_high_accuracy: config.high_accuracy,
                timeout: Duration::from_millis(config.one_shot_timeout_ms),
                maximum_age: Duration::from_millis(config.one_shot_max_age_ms),
            },
            watch: PositionOptions {
                enable_high_accuracy: config.high_accuracy,
                timeout: Duration::from_millis(config.watch_timeout_ms),
                maximum_age: Duration::from_millis(config.watch_max_age_ms),
            },
        }
    }
}
