//! Mobility visualization and interaction aggregation for the Rust
//! CareTrace platform.
//!
//! The modules turn facility telemetry (occupancy histograms, movement
//! traces, social events, interaction sessions) into placed map markers
//! and socialization reports, with one shared scaling rule so every
//! layer lands on the same grid.

pub mod model;
pub mod prelude;
pub mod render;
pub mod report;
pub mod schedule;
pub mod spatial;
pub mod telemetry;

pub use prelude::{CoreError, CoreResult, MapConfig, Marker, MarkerKind, MarkerLayer};
