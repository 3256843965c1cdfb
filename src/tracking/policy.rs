//! Debounce and retry rules of the location tracker

use std::time::Duration;

use crate::models::PositionSample;
use crate::proximity::distance_km;

/// Decides whether a fresh sample supersedes the stored one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdatePolicy {
    /// Minimum great-circle movement that counts as a new position
    pub min_distance_km: f64,
    /// Age after which a sample is refreshed even without movement
    pub refresh_after: Duration,
}

impl Default for UpdatePolicy {
    fn default() -> Self {
        Self {
            min_distance_km: 0.03,
            refresh_after: Duration::from_secs(120),
        }
    }
}

impl UpdatePolicy {
    /// Accept when nothing is stored yet, when the device moved at least
    /// `min_distance_km`, or when `refresh_after` passed between captures.
    #[must_use]
    pub fn should_update(
        &self,
        current: Option<&PositionSample>,
        candidate: &PositionSample,
    ) -> bool {
        let Some(current) = current else {
            return true;
        };

        let moved = distance_km(&current.coordinates, &candidate.coordinates);
        if moved >= self.min_distance_km {
            return true;
        }

        let refresh_ms = i64::try_from(self.refresh_after.as_millis()).unwrap_or(i64::MAX);
        candidate.millis_since(current) >= refresh_ms
    }
}

/// Exponential backoff for failed acquisitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Consecutive failures after which tracking gives up
    pub max_retries: u32,
    /// Doubled once per attempt: 2x, 4x, 8x ...
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): `base * 2^attempt`
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 1_u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Next retry after a failure, given the consecutive failures before it.
    /// The failure that brings the count to `max_retries` is terminal: `None`.
    #[must_use]
    pub fn next_retry(&self, previous_failures: u32) -> Option<(u32, Duration)> {
        let attempt = previous_failures.saturating_add(1);
        if attempt >= self.max_retries {
            return None;
        }
        Some((attempt, self.delay_for_attempt(attempt)))
    }
}
