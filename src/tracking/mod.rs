//! Location tracking
//!
//! Keeps a best-effort current position from a [`PositionProvider`],
//! debounces jitter with [`UpdatePolicy`], backs off with [`RetryPolicy`]
//! and re-ranks the catalog whenever a sample is accepted.

pub mod error;
pub mod policy;
pub mod provider;
pub mod settings;
pub mod state;
pub mod tracker;

pub use error::LocationError;
pub use policy::{RetryPolicy, UpdatePolicy};
pub use provider::{FixedPositionProvider, PositionOptions, PositionProvider};
pub use settings::TrackingSettings;
pub use state::{TrackerEvent, TrackingMethod, TrackingPhase, TrackingState};
pub use tracker::LocationTracker;
