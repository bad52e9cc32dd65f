use std::collections::{BTreeMap, BTreeSet};
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};

use anyhow::Result;
use carecore::model::InteractionInterval;
use carecore::report::low_interaction;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

use crate::generator::profile::{build_facility_snapshot, FacilitySnapshot, GeneratorConfig};
use crate::generator::roster::resident_name;
use crate::gui_bridge::model::{DashboardModel, LowInteractionRow, OverviewModel, ReportModel};
use crate::workflow::runner::Runner;

fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

#[derive(Debug, Deserialize)]
struct LowInteractionQuery {
    threshold_minutes: Option<i64>,
}

struct DashboardState {
    snapshot: FacilitySnapshot,
    dashboard: DashboardModel,
    focus_user: u64,
}

/// Bridge that hosts the report HTTP endpoints and rebuilds state from
/// incoming scenario configs.
pub struct GuiBridge {
    state: Arc<RwLock<DashboardState>>,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>, snapshot: FacilitySnapshot, focus_user: u64) -> Self {
        let default_threshold = runner.config().threshold_minutes;
        let dashboard = build_dashboard(&runner, &snapshot, focus_user);
        let state = Arc::new(RwLock::new(DashboardState {
            snapshot,
            dashboard,
            focus_user,
        }));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let report_route = warp::path("report")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<DashboardState>>| {
                warp::reply::json(&state.read().unwrap().dashboard)
            });

        let low_route = warp::path("low-interaction")
            .and(warp::get())
            .and(warp::query::<LowInteractionQuery>())
            .and(state_filter.clone())
            .map(
                move |query: LowInteractionQuery, state: Arc<RwLock<DashboardState>>| {
                    let threshold = query.threshold_minutes.unwrap_or(default_threshold);
                    let guard = state.read().unwrap();
                    warp::reply::json(&low_interaction_rows(&guard.snapshot, threshold))
                },
            );

        let scenario_route = warp::path("ingest-config")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and_then(
                |config: GeneratorConfig,
                 state: Arc<RwLock<DashboardState>>,
                 runner: Arc<Runner>| async move {
                    match build_facility_snapshot(&config) {
                        Ok(snapshot) => {
                            let mut guard = state.write().unwrap();
                            let focus_user = guard.focus_user;
                            guard.dashboard = build_dashboard(&runner, &snapshot, focus_user);
                            guard.snapshot = snapshot;
                            if let Some(name) = config.scenario.as_ref() {
                                println!(
                                    "[GUI] Scenario {} -> {} events",
                                    name,
                                    guard.snapshot.events.len()
                                );
                            }
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "events": guard.snapshot.events.len(),
                                    "description": config.description.clone().unwrap_or_default()
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("ingest-config error: {}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        thread::spawn(move || {
            let routes = report_route.or(low_route).or(scenario_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(gui_bind_address()).await;
            });
        });

        Self { state }
    }

    /// Replaces the served snapshot and dashboard in one step.
    pub fn publish(&self, snapshot: FacilitySnapshot, dashboard: DashboardModel) -> Result<()> {
        let mut guard = self.state.write().unwrap();
        guard.snapshot = snapshot;
        guard.dashboard = dashboard;
        println!(
            "[GUI] heat cells: {}, path points: {}, events: {}",
            guard.dashboard.report.mobility.heatmap.len(),
            guard.dashboard.report.mobility.movement_path.len(),
            guard.dashboard.report.events.len()
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot_model(&self) -> DashboardModel {
        self.state.read().unwrap().dashboard.clone()
    }
}

/// Builds the polled payload for one resident as of now.
pub fn build_dashboard(
    runner: &Runner,
    snapshot: &FacilitySnapshot,
    focus_user: u64,
) -> DashboardModel {
    let now = Utc::now();
    let result = runner.execute(snapshot, focus_user, now);

    let active_devices = snapshot
        .samples
        .iter()
        .map(|sample| sample.user_id)
        .collect::<BTreeSet<_>>()
        .len();
    let events_today = snapshot
        .events
        .iter()
        .filter(|event| event.start.date_naive() == now.date_naive())
        .count();

    DashboardModel {
        report: ReportModel::from_result(result),
        overview: OverviewModel {
            active_devices,
            events_today,
        },
    }
}

/// Residents under the threshold, with display names resolved. Every
/// resident seen in the sample feed is considered, so a resident with no
/// sessions at all still surfaces with zero minutes.
fn low_interaction_rows(snapshot: &FacilitySnapshot, threshold_minutes: i64) -> Vec<LowInteractionRow> {
    let mut by_user: BTreeMap<u64, Vec<InteractionInterval>> = BTreeMap::new();
    for sample in &snapshot.samples {
        by_user.entry(sample.user_id).or_default();
    }
    for session in &snapshot.sessions {
        by_user
            .entry(session.user_id)
            .or_default()
            .push(InteractionInterval::new(
                session.start_time,
                session.end_time,
                0.0,
                0.0,
            ));
    }

    low_interaction(&by_user, threshold_minutes)
        .into_iter()
        .map(|entry| LowInteractionRow {
            user_id: entry.user_id,
            name: resident_name(entry.user_id),
            total_minutes: entry.total_minutes,
        })
        .collect()
}
