//! Location tracker
//!
//! Four inputs feed one [`TrackingState`]: the one-shot acquisition fired on
//! start, a periodic re-poll, the continuous watch stream and a health check
//! that restarts tracking when samples stop arriving. Each spawned task is
//! tagged with the session it was started for; results from an older session
//! or arriving after a stop are dropped.
//!
//! All tasks run on the ambient tokio runtime, so [`LocationTracker::start`]
//! must be called from within one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::error::LocationError;
use super::provider::PositionProvider;
use super::settings::TrackingSettings;
use super::state::{TrackerEvent, TrackingMethod, TrackingPhase, TrackingState};
use crate::catalog::LandmarkCatalog;
use crate::geocoding::{ReverseGeocoder, resolve_label};
use crate::models::{Coordinates, PositionSample, SEOUL_CENTER};
use crate::proximity::{RankedLandmark, rank};

const EVENT_CAPACITY: usize = 64;

/// Owned handle to a running (or stopped) tracker. Dropping it stops tracking.
pub struct LocationTracker {
    inner: Arc<TrackerInner>,
}

struct TrackerInner {
    provider: Arc<dyn PositionProvider>,
    geocoder: Arc<dyn ReverseGeocoder>,
    catalog: Arc<LandmarkCatalog>,
    settings: TrackingSettings,
    // Lock order: tasks before state.
    tasks: Mutex<TrackerTasks>,
    state: Mutex<TrackingState>,
    events: broadcast::Sender<TrackerEvent>,
}

#[derive(Default)]
struct TrackerTasks {
    periodic: Option<JoinHandle<()>>,
    watch: Option<JoinHandle<()>>,
    health: Option<JoinHandle<()>>,
    retry: Option<JoinHandle<()>>,
    restart: Option<JoinHandle<()>>,
}

impl TrackerTasks {
    fn abort_session_tasks(&mut self) {
        for handle in [
            self.periodic.take(),
            self.watch.take(),
            self.health.take(),
            self.retry.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
    }

    fn abort_restart(&mut self) {
        if let Some(handle) = self.restart.take() {
            handle.abort();
        }
    }

    fn any_running(&self) -> bool {
        [
            &self.periodic,
            &self.watch,
            &self.health,
            &self.retry,
            &self.restart,
        ]
        .into_iter()
        .flatten()
        .any(|handle| !handle.is_finished())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl LocationTracker {
    #[must_use]
    pub fn new(
        provider: Arc<dyn PositionProvider>,
        geocoder: Arc<dyn ReverseGeocoder>,
        catalog: Arc<LandmarkCatalog>,
        settings: TrackingSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let state = TrackingState::new(settings.retry.max_retries);
        Self {
            inner: Arc::new(TrackerInner {
                provider,
                geocoder,
                catalog,
                settings,
                tasks: Mutex::new(TrackerTasks::default()),
                state: Mutex::new(state),
                events,
            }),
        }
    }

    /// Receive tracker events from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.inner.events.subscribe()
    }

    /// Begin a tracking session. No-op while one is already active.
    pub fn start(&self) {
        self.inner.start();
    }

    /// Stop tracking and cancel every timer and subscription. Idempotent.
    pub fn stop(&self) {
        self.inner.halt(TrackingPhase::Stopped, true);
    }

    /// Tear down and start a fresh session, e.g. after `Failed`
    pub fn restart(&self) {
        info!("Restarting location tracking");
        self.inner.halt(TrackingPhase::Idle, true);
        self.inner.start();
    }

    #[must_use]
    pub fn settings(&self) -> &TrackingSettings {
        &self.inner.settings
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> TrackingState {
        lock(&self.inner.state).clone()
    }

    #[must_use]
    pub fn phase(&self) -> TrackingPhase {
        lock(&self.inner.state).phase
    }

    #[must_use]
    pub fn current_sample(&self) -> Option<PositionSample> {
        lock(&self.inner.state).current_sample.clone()
    }

    /// Full ranking against the current sample; `None` until one is accepted
    #[must_use]
    pub fn ranked(&self) -> Option<Arc<[RankedLandmark]>> {
        lock(&self.inner.state).ranked.clone()
    }

    /// The `limit` closest landmarks, empty without a position
    #[must_use]
    pub fn nearest(&self, limit: usize) -> Vec<RankedLandmark> {
        self.ranked()
            .map(|ranked| ranked.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Resolved place label, else raw coordinates, else the status text
    #[must_use]
    pub fn display_label(&self) -> String {
        let state = lock(&self.inner.state);
        match (&state.label, &state.current_sample) {
            (Some(label), _) => label.clone(),
            (None, Some(sample)) => sample.coordinates.format_coordinates(),
            (None, None) => state.phase.status_text().to_string(),
        }
    }

    /// Map center: the current position, or the city center without one
    #[must_use]
    pub fn display_center(&self) -> Coordinates {
        lock(&self.inner.state)
            .current_sample
            .as_ref()
            .map_or(SEOUL_CENTER, |sample| sample.coordinates)
    }

    /// True while any timer, subscription or pending restart is alive
    #[must_use]
    pub fn has_background_tasks(&self) -> bool {
        lock(&self.inner.tasks).any_running()
    }
}

impl Drop for LocationTracker {
    fn drop(&mut self) {
        self.inner.halt(TrackingPhase::Stopped, true);
    }
}

impl TrackerInner {
    fn emit(&self, event: TrackerEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn start(self: &Arc<Self>) {
        let mut tasks = lock(&self.tasks);
        let session = {
            let mut state = lock(&self.state);
            if state.is_active {
                debug!("Location tracking already active");
                return;
            }
            state.begin_session(Instant::now())
        };

        info!(session, "Starting location tracking");
        self.emit(TrackerEvent::StatusChanged(TrackingPhase::Acquiring));

        self.spawn_acquisition(session);
        tasks.periodic = Some(self.spawn_periodic(session));
        tasks.watch = Some(self.spawn_watch(session));
        tasks.health = Some(self.spawn_health_check(session));
    }

    /// Deactivate and cancel the session's tasks. `cancel_restart` also
    /// aborts a pending health restart.
    fn halt(&self, phase: TrackingPhase, cancel_restart: bool) {
        let mut tasks = lock(&self.tasks);
        tasks.abort_session_tasks();
        if cancel_restart {
            tasks.abort_restart();
        }

        let changed = {
            let mut state = lock(&self.state);
            state.is_active = false;
            let changed = state.phase != phase;
            state.phase = phase;
            changed
        };

        if changed {
            debug!(%phase, "Location tracking halted");
            self.emit(TrackerEvent::StatusChanged(phase));
        }
    }

    /// Fire one bounded acquisition. The request runs detached; its result
    /// is dropped if the session has moved on by the time it resolves.
    fn spawn_acquisition(self: &Arc<Self>, session: u64) {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let options = inner.settings.one_shot;
            let result = match time::timeout(
                options.timeout,
                inner.provider.current_position(&options),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(LocationError::AcquisitionTimeout(options.timeout)),
            };

            match result {
                Ok(sample) => inner.handle_sample(session, sample),
                Err(e) => inner.handle_failure(session, e),
            }
        });
    }

    fn spawn_periodic(self: &Arc<Self>, session: u64) -> JoinHandle<()> {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let period = inner.settings.periodic_interval;
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let poll = {
                    let state = lock(&inner.state);
                    if !state.is_current(session) {
                        return;
                    }
                    state.phase.accepts_periodic_poll()
                };
                if poll {
                    debug!("Periodic location poll");
                    inner.spawn_acquisition(session);
                }
            }
        })
    }

    fn spawn_watch(self: &Arc<Self>, session: u64) -> JoinHandle<()> {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let mut updates = inner.provider.watch_position(&inner.settings.watch);
            while let Some(update) = updates.next().await {
                match update {
                    Ok(sample) => inner.handle_sample(session, sample),
                    Err(e) => {
                        inner.handle_watch_failure(session, e);
                        return;
                    }
                }
            }
            debug!("Location watch ended");
        })
    }

    fn spawn_health_check(self: &Arc<Self>, session: u64) -> JoinHandle<()> {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let period = inner.settings.health_check_interval;
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let silence = {
                    let state = lock(&inner.state);
                    if !state.is_current(session) {
                        return;
                    }
                    state.silence(Instant::now())
                };

                if silence > inner.settings.stale_after {
                    warn!(
                        silence_secs = silence.as_secs(),
                        "Location updates stalled, restarting tracking"
                    );
                    inner.emit(TrackerEvent::Restarting);
                    inner.schedule_restart();
                    return;
                }
            }
        })
    }

    fn schedule_restart(self: &Arc<Self>) {
        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move {
            inner.halt(TrackingPhase::Idle, false);
            time::sleep(inner.settings.restart_grace).await;

            // A user stop or start during the grace period wins
            let resume = {
                let state = lock(&inner.state);
                state.phase == TrackingPhase::Idle && !state.is_active
            };
            if resume {
                inner.start();
            }
        });
        lock(&self.tasks).restart = Some(handle);
    }

    fn handle_sample(self: &Arc<Self>, session: u64, sample: PositionSample) {
        let mut tasks = lock(&self.tasks);
        let (recovered, ranked) = {
            let mut state = lock(&self.state);
            if !state.is_current(session) {
                debug!("Ignoring position from an inactive session");
                return;
            }

            let previous = state.phase;
            state.last_update = Some(Instant::now());
            state.retry_count = 0;
            state.phase = TrackingPhase::Tracking;

            let ranked = if self
                .settings
                .update
                .should_update(state.current_sample.as_ref(), &sample)
            {
                let ranked: Arc<[RankedLandmark]> = rank(&sample.coordinates, &self.catalog).into();
                state.current_sample = Some(sample.clone());
                state.ranked = Some(Arc::clone(&ranked));
                state.label = None;
                Some(ranked)
            } else {
                debug!("Position change below threshold, keeping current sample");
                None
            };

            (previous != TrackingPhase::Tracking, ranked)
        };

        if let Some(retry) = tasks.retry.take() {
            retry.abort();
        }
        drop(tasks);

        if recovered {
            self.emit(TrackerEvent::StatusChanged(TrackingPhase::Tracking));
        }

        if let Some(ranked) = ranked {
            debug!(
                lat = sample.coordinates.lat,
                lng = sample.coordinates.lng,
                "Accepted new position"
            );
            let coordinates = sample.coordinates;
            self.emit(TrackerEvent::PositionAccepted(sample));
            self.emit(TrackerEvent::DistancesUpdated(ranked));
            self.spawn_label_resolution(session, coordinates);
        }
    }

    fn handle_failure(self: &Arc<Self>, session: u64, error: LocationError) {
        let mut tasks = lock(&self.tasks);
        let next = {
            let mut state = lock(&self.state);
            if !state.is_current(session) {
                debug!("Ignoring failure from an inactive session");
                return;
            }
            if state.phase == TrackingPhase::Retrying {
                debug!("Retry already scheduled, ignoring failure: {}", error);
                return;
            }

            match self.settings.retry.next_retry(state.retry_count) {
                Some((attempt, delay)) => {
                    state.retry_count = attempt;
                    state.phase = TrackingPhase::Retrying;
                    Some((attempt, delay))
                }
                None => {
                    state.retry_count = state.retry_count.saturating_add(1);
                    state.phase = TrackingPhase::Failed;
                    state.is_active = false;
                    None
                }
            }
        };

        warn!("Location acquisition failed: {}", error);
        self.emit(TrackerEvent::AcquisitionFailed(error));

        match next {
            Some((attempt, delay)) => {
                info!(attempt, delay_secs = delay.as_secs(), "Retrying location");
                self.emit(TrackerEvent::StatusChanged(TrackingPhase::Retrying));
                self.emit(TrackerEvent::RetryScheduled { attempt, delay });
                tasks.retry = Some(self.spawn_retry(session, delay));
            }
            None => {
                error!("Location retries exhausted, tracking unavailable");
                tasks.abort_session_tasks();
                self.emit(TrackerEvent::StatusChanged(TrackingPhase::Failed));
            }
        }
    }

    fn spawn_retry(self: &Arc<Self>, session: u64, delay: Duration) -> JoinHandle<()> {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            time::sleep(delay).await;
            {
                let mut state = lock(&inner.state);
                if !state.is_current(session) || state.phase != TrackingPhase::Retrying {
                    return;
                }
                state.phase = TrackingPhase::Acquiring;
            }
            inner.emit(TrackerEvent::StatusChanged(TrackingPhase::Acquiring));
            inner.spawn_acquisition(session);
        })
    }

    /// Watch errors drop the tracker to periodic polling without touching
    /// the retry budget.
    fn handle_watch_failure(&self, session: u64, error: LocationError) {
        {
            let mut state = lock(&self.state);
            if !state.is_current(session) {
                return;
            }
            state.method = TrackingMethod::PeriodicOnly;
        }
        warn!("Location watch failed, continuing with periodic polls: {}", error);
        self.emit(TrackerEvent::AcquisitionFailed(error));
    }

    fn spawn_label_resolution(self: &Arc<Self>, session: u64, coordinates: Coordinates) {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let label = resolve_label(inner.geocoder.as_ref(), coordinates).await;
            let fresh = {
                let mut state = lock(&inner.state);
                let same_position = state
                    .current_sample
                    .as_ref()
                    .is_some_and(|sample| sample.coordinates == coordinates);
                if state.is_current(session) && same_position {
                    state.label = Some(label.clone());
                    true
                } else {
                    false
                }
            };
            if fresh {
                inner.emit(TrackerEvent::LabelResolved(label));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::DistrictGeocoder;
    use crate::tracking::FixedPositionProvider;

    fn tracker_at(coordinates: Coordinates) -> LocationTracker {
        LocationTracker::new(
            Arc::new(FixedPositionProvider::new(coordinates)),
            Arc::new(DistrictGeocoder),
            Arc::new(LandmarkCatalog::seoul().unwrap()),
            TrackingSettings::default(),
        )
    }

    #[test]
    fn test_idle_tracker_has_no_position() {
        let tracker = tracker_at(SEOUL_CENTER);
        assert_eq!(tracker.phase(), TrackingPhase::Idle);
        assert!(tracker.ranked().is_none());
        assert!(tracker.nearest(3).is_empty());
        assert_eq!(tracker.display_center(), SEOUL_CENTER);
        assert_eq!(tracker.display_label(), "Location idle");
        assert!(!tracker.has_background_tasks());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent() {
        let tracker = tracker_at(Coordinates::new(37.5512, 126.9882));
        tracker.start();
        let session = tracker.state().session;
        tracker.start();
        assert_eq!(tracker.state().session, session);
        assert!(tracker.has_background_tasks());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_start_is_noop() {
        let tracker = tracker_at(SEOUL_CENTER);
        let mut events = tracker.subscribe();
        tracker.stop();
        assert_eq!(tracker.phase(), TrackingPhase::Stopped);
        tracker.stop();
        assert!(matches!(
            events.try_recv(),
            Ok(TrackerEvent::StatusChanged(TrackingPhase::Stopped))
        ));
        assert!(events.try_recv().is_err());
    }
}
