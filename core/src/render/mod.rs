pub mod events;
pub mod heatmap;
pub mod path;
pub mod scene;

pub use events::EventLayer;
pub use heatmap::HeatmapLayer;
pub use path::PathAnimator;
pub use scene::MapScene;
