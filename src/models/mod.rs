//! Data models for the Seoul Explorer application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and position samples
//! - Landmark: Catalog records and their categories

pub mod landmark;
pub mod location;

// Re-export all public types for convenient access
pub use landmark::{Category, CategoryInfo, DetailSection, Landmark};
pub use location::{Coordinates, PositionSample, SEOUL_CENTER};
