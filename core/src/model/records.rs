use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed position in a movement trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    pub x: f64,
    pub y: f64,
}

/// Chronological positions for one tracked resident; order is the only
/// chronology the animator relies on.
pub type MovementTrace = Vec<TracePoint>;

/// Detected, time-bounded co-location of multiple residents. Created by
/// the upstream detector and immutable once reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialEvent {
    pub event_id: u64,
    pub x_event: f64,
    pub y_event: f64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub participants: u32,
}

/// One contiguous co-presence window for a single resident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionInterval {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
}

impl InteractionInterval {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>, x: f64, y: f64) -> Self {
        Self {
            start_time,
            end_time,
            x,
            y,
        }
    }
}

/// A resident's attendance window at one detected event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSession {
    pub user_id: u64,
    pub event_id: u64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl EventSession {
    pub fn new(
        user_id: u64,
        event_id: u64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            event_id,
            start_time,
            end_time,
        }
    }
}

/// Raw ingested position sample for one resident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub user_id: u64,
    pub recorded_at: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
}

/// Socialization hours over the standard report windows, as of fetch time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SocializationSummary {
    pub today_hours: f64,
    pub week_hours: f64,
    pub month_hours: f64,
}

/// A resident whose total interaction time fell under the review threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowInteractionEntry {
    pub user_id: u64,
    pub total_minutes: i64,
}

/// Cumulative co-presence with one other resident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendOverlap {
    pub user_id: u64,
    pub overlap_minutes: f64,
}

/// Socialization bands used by the butterfly report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IsolationLevel {
    Isolated,
    Moderate,
    Social,
}

impl IsolationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IsolationLevel::Isolated => "Isolated",
            IsolationLevel::Moderate => "Moderate",
            IsolationLevel::Social => "Social",
        }
    }
}
