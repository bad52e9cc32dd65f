use carecore::model::{
    IsolationLevel, OccupancyHistogram, SocialEvent, SocializationSummary, TracePoint,
};
use serde::{Deserialize, Serialize};

use crate::generator::roster::resident_name;
use crate::workflow::runner::ReportResult;

/// Mobility section of the report payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MobilityModel {
    pub zones_visited: Vec<String>,
    pub heatmap: OccupancyHistogram,
    pub movement_path: Vec<TracePoint>,
}

/// Friend row with resolved display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendModel {
    pub user_id: u64,
    pub name: String,
    pub overlap_minutes: f64,
}

/// Butterfly section: total interaction minutes plus the banding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButterflyModel {
    pub total_minutes: i64,
    pub isolation_level: IsolationLevel,
}

impl Default for ButterflyModel {
    fn default() -> Self {
        Self {
            total_minutes: 0,
            isolation_level: IsolationLevel::Isolated,
        }
    }
}

/// Full per-resident report payload served to the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportModel {
    pub user_id: u64,
    pub name: String,
    pub socialization: SocializationSummary,
    pub events: Vec<SocialEvent>,
    pub mobility: MobilityModel,
    pub friends: Vec<FriendModel>,
    pub butterfly: ButterflyModel,
}

impl ReportModel {
    pub fn from_result(result: ReportResult) -> Self {
        let friends = result
            .friends
            .iter()
            .map(|overlap| FriendModel {
                user_id: overlap.user_id,
                name: resident_name(overlap.user_id),
                overlap_minutes: overlap.overlap_minutes,
            })
            .collect();

        Self {
            user_id: result.user_id,
            name: resident_name(result.user_id),
            socialization: result.socialization,
            events: result.events,
            mobility: MobilityModel {
                zones_visited: result.heatmap.zones(),
                heatmap: result.heatmap,
                movement_path: result.movement_path,
            },
            friends,
            butterfly: ButterflyModel {
                total_minutes: result.total_minutes,
                isolation_level: result.isolation_level,
            },
        }
    }
}

/// Overview card counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OverviewModel {
    pub active_devices: usize,
    pub events_today: usize,
}

/// Low-interaction row with resolved display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowInteractionRow {
    pub user_id: u64,
    pub name: String,
    pub total_minutes: i64,
}

/// The payload the dashboard polls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardModel {
    pub report: ReportModel,
    pub overview: OverviewModel,
}
