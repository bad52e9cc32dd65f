use serde::{Deserialize, Serialize};

use crate::spatial::ScalingBounds;

/// Shared display configuration consumed by every map layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub display_size: f64,
    pub cell_size: f64,
    pub event_radius: f64,
    pub position_radius: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            display_size: 600.0,
            cell_size: 14.0,
            event_radius: 6.0,
            position_radius: 5.0,
        }
    }
}

/// Marker classes stacked on the mobility map, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    HeatCell,
    Event,
    Position,
}

/// One placed marker in screen space. `x`/`y` are the marker center;
/// the half-size offset for square cells is applied where they are drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
    pub kind: MarkerKind,
}

impl Marker {
    pub fn new(x: f64, y: f64, opacity: f64, kind: MarkerKind) -> Self {
        Self {
            x,
            y,
            opacity,
            kind,
        }
    }
}

/// Common error type for core operations.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Trait describing map layers that place markers through the shared bounds.
///
/// Every layer receives the same `ScalingBounds` so heat cells, event
/// markers, and the live position stay aligned on one grid.
pub trait MarkerLayer {
    fn markers(&self, bounds: &ScalingBounds, config: &MapConfig) -> Vec<Marker>;
}
