pub mod aggregate;

pub use aggregate::{
    duration_minutes, friend_overlap, isolation_level, low_interaction, socialization_summary,
    total_interaction_minutes,
};
