//! Platform location provider seam

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use super::error::Result;
use crate::models::{Coordinates, PositionSample};

/// Options forwarded to the platform with every request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    /// Bounded wait for a fix
    pub timeout: Duration,
    /// Oldest cached fix the platform may hand back
    pub maximum_age: Duration,
}

/// Source of position samples (GPS, browser geolocation, replay ...)
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// One-shot acquisition
    async fn current_position(&self, options: &PositionOptions) -> Result<PositionSample>;

    /// Continuous subscription; dropping the stream ends the watch
    fn watch_position(
        &self,
        options: &PositionOptions,
    ) -> BoxStream<'static, Result<PositionSample>>;
}

/// Provider pinned to a single position, for demos and desktop runs
#[derive(Debug, Clone, Copy)]
pub struct FixedPositionProvider {
    coordinates: Coordinates,
    accuracy_meters: f64,
}

impl FixedPositionProvider {
    #[must_use]
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            accuracy_meters: 10.0,
        }
    }
}

#[async_trait]
impl PositionProvider for FixedPositionProvider {
    async fn current_position(&self, _options: &PositionOptions) -> Result<PositionSample> {
        Ok(PositionSample::now(self.coordinates.lat, self.coordinates.lng)
            .with_accuracy(self.accuracy_meters))
    }

    fn watch_position(
        &self,
        _options: &PositionOptions,
    ) -> BoxStream<'static, Result<PositionSample>> {
        // A stationary device never reports movement
        stream::pending().boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SEOUL_CENTER;
    use crate::tracking::TrackingSettings;

    #[tokio::test]
    async fn test_fixed_provider_reports_its_position() {
        let provider = FixedPositionProvider::new(SEOUL_CENTER);
        let options = TrackingSettings::default().one_shot;
        let sample = provider.current_position(&options).await.unwrap();
        assert_eq!(sample.coordinates, SEOUL_CENTER);
        assert_eq!(sample.accuracy_meters, Some(10.0));
    }
}
