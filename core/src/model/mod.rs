pub mod histogram;
pub mod records;

pub use histogram::{HeatCell, OccupancyHistogram};
pub use records::{
    EventSession, FriendOverlap, InteractionInterval, IsolationLevel, LocationSample,
    LowInteractionEntry, MovementTrace, SocialEvent, SocializationSummary, TracePoint,
};
