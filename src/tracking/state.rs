use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use super::error::LocationError;
use crate::models::PositionSample;
use crate::proximity::RankedLandmark;

/// Lifecycle of the tracker.
///
/// `Idle -> Acquiring -> Tracking <-> Retrying`, `Retrying -> Failed` once
/// the retry budget is spent, and `Stopped` after an explicit stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingPhase {
    Idle,
    Acquiring,
    Tracking,
    Retrying,
    Failed,
    Stopped,
}

impl TrackingPhase {
    /// Status text for the location banner
    #[must_use]
    pub fn status_text(self) -> &'static str {
        match self {
            TrackingPhase::Idle => "Location idle",
            TrackingPhase::Acquiring => "Getting your location...",
            TrackingPhase::Tracking => "Location updated",
            TrackingPhase::Retrying => "Updating location...",
            TrackingPhase::Failed => "Location unavailable",
            TrackingPhase::Stopped => "Location tracking stopped",
        }
    }

    /// Periodic polls are suspended while a backoff timer owns recovery
    pub(crate) fn accepts_periodic_poll(self) -> bool {
        matches!(self, TrackingPhase::Acquiring | TrackingPhase::Tracking)
    }
}

impl fmt::Display for TrackingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status_text())
    }
}

/// Inputs currently feeding the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingMethod {
    /// One-shot polls plus the continuous watch
    Combined,
    /// The watch failed; periodic polls only
    PeriodicOnly,
}

/// Session-scoped tracker state
#[derive(Debug, Clone)]
pub struct TrackingState {
    pub phase: TrackingPhase,
    pub is_active: bool,
    pub retry_count: u32,
    pub max_retries: u32,
    /// Last successful sample, accepted or debounced
    pub last_update: Option<Instant>,
    pub current_sample: Option<PositionSample>,
    pub method: TrackingMethod,
    /// Catalog ranked against `current_sample`
    pub ranked: Option<Arc<[RankedLandmark]>>,
    /// Resolved place label for `current_sample`
    pub label: Option<String>,
    pub(crate) session: u64,
    pub(crate) started_at: Option<Instant>,
}

impl TrackingState {
    pub(crate) fn new(max_retries: u32) -> Self {
        Self {
            phase: TrackingPhase::Idle,
            is_active: false,
            retry_count: 0,
            max_retries,
            last_update: None,
            current_sample: None,
            method: TrackingMethod::Combined,
            ranked: None,
            label: None,
            session: 0,
            started_at: None,
        }
    }

    /// Open a new session and return its id
    pub(crate) fn begin_session(&mut self, now: Instant) -> u64 {
        self.session += 1;
        self.is_active = true;
        self.phase = TrackingPhase::Acquiring;
        self.retry_count = 0;
        self.last_update = None;
        self.method = TrackingMethod::Combined;
        self.started_at = Some(now);
        self.session
    }

    /// Results from an older session or after deactivation are ignored
    pub(crate) fn is_current(&self, session: u64) -> bool {
        self.is_active && self.session == session
    }

    /// Time since the last successful sample, or since start without one
    pub(crate) fn silence(&self, now: Instant) -> Duration {
        self.last_update
            .or(self.started_at)
            .map_or(Duration::ZERO, |since| now.saturating_duration_since(since))
    }
}

/// Notifications for the rendering layer
#[derive(Debug, Clone)]
pub enum TrackerEvent {
    StatusChanged(TrackingPhase),
    PositionAccepted(PositionSample),
    /// Distances are stale; redraw from this ranking
    DistancesUpdated(Arc<[RankedLandmark]>),
    LabelResolved(String),
    AcquisitionFailed(LocationError),
    RetryScheduled { attempt: u32, delay: Duration },
    /// Health check found tracking stalled
    Restarting,
}
