pub mod bounds;

pub use bounds::{scale, ScalingBounds};
