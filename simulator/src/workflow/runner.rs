use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use carecore::model::{
    FriendOverlap, InteractionInterval, IsolationLevel, OccupancyHistogram, SocialEvent,
    SocializationSummary, TracePoint,
};
use carecore::report::{
    friend_overlap, isolation_level, socialization_summary, total_interaction_minutes,
};
use carecore::telemetry::{LogManager, MetricsRecorder};
use chrono::{DateTime, Utc};

use crate::generator::profile::FacilitySnapshot;
use crate::workflow::config::WorkflowConfig;

/// Everything the report endpoint needs for one resident, derived from
/// a single snapshot at a single instant.
pub struct ReportResult {
    pub user_id: u64,
    pub heatmap: OccupancyHistogram,
    pub movement_path: Vec<TracePoint>,
    pub socialization: SocializationSummary,
    pub events: Vec<SocialEvent>,
    pub friends: Vec<FriendOverlap>,
    pub total_minutes: i64,
    pub isolation_level: IsolationLevel,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// (samples ingested, reports built, records skipped)
    pub fn metrics_snapshot(&self) -> (usize, usize, usize) {
        self.metrics.snapshot()
    }

    /// Chains the core aggregation steps: trace extraction, grid
    /// bucketing, window summaries, attended-event dedup, and the top-3
    /// friend ranking.
    pub fn execute(
        &self,
        snapshot: &FacilitySnapshot,
        user_id: u64,
        now: DateTime<Utc>,
    ) -> ReportResult {
        let logger = LogManager::new();

        let mut user_samples: Vec<_> = snapshot
            .samples
            .iter()
            .filter(|sample| sample.user_id == user_id)
            .filter(|sample| {
                let usable = sample.x.is_finite() && sample.y.is_finite();
                if !usable {
                    self.metrics.record_skipped();
                    logger.record_warning(&format!(
                        "skipping non-finite sample for resident {}",
                        user_id
                    ));
                }
                usable
            })
            .collect();
        user_samples.sort_by_key(|sample| sample.recorded_at);

        let movement_path: Vec<TracePoint> = user_samples
            .iter()
            .map(|sample| TracePoint {
                x: sample.x,
                y: sample.y,
            })
            .collect();

        let heatmap = OccupancyHistogram::from_points(
            movement_path.iter().map(|point| (point.x, point.y)),
            self.config.bucket,
        );

        let intervals = self.user_intervals(snapshot, user_id);
        let socialization = socialization_summary(&intervals, now);
        let total_minutes = total_interaction_minutes(&intervals);

        let mut friends = friend_overlap(user_id, &snapshot.sessions);
        friends.truncate(3);

        let events = attended_events(snapshot, user_id);

        self.metrics.record_samples(movement_path.len());
        self.metrics.record_report();
        logger.record(&format!(
            "report for resident {}: {} samples, {} zones, {} events",
            user_id,
            movement_path.len(),
            heatmap.len(),
            events.len()
        ));

        ReportResult {
            user_id,
            heatmap,
            movement_path,
            socialization,
            events,
            friends,
            total_minutes,
            isolation_level: isolation_level(total_minutes as f64),
        }
    }

    /// One interaction interval per attendance window, located at the
    /// event's coordinates.
    fn user_intervals(&self, snapshot: &FacilitySnapshot, user_id: u64) -> Vec<InteractionInterval> {
        snapshot
            .sessions
            .iter()
            .filter(|session| session.user_id == user_id)
            .map(|session| {
                let (x, y) = snapshot
                    .events
                    .iter()
                    .find(|event| event.event_id == session.event_id)
                    .map(|event| (event.x_event, event.y_event))
                    .unwrap_or((0.0, 0.0));
                InteractionInterval::new(session.start_time, session.end_time, x, y)
            })
            .collect()
    }
}

/// Events the resident attended, one row per event id, newest first,
/// with participant counts recomputed from distinct session holders.
fn attended_events(snapshot: &FacilitySnapshot, user_id: u64) -> Vec<SocialEvent> {
    let mut by_id: BTreeMap<u64, SocialEvent> = BTreeMap::new();
    for session in snapshot
        .sessions
        .iter()
        .filter(|session| session.user_id == user_id)
    {
        if let Some(event) = snapshot
            .events
            .iter()
            .find(|event| event.event_id == session.event_id)
        {
            let participants = snapshot
                .sessions
                .iter()
                .filter(|s| s.event_id == event.event_id)
                .map(|s| s.user_id)
                .collect::<BTreeSet<_>>()
                .len() as u32;
            let mut entry = event.clone();
            entry.participants = participants;
            by_id.insert(entry.event_id, entry);
        }
    }

    let mut events: Vec<SocialEvent> = by_id.into_values().collect();
    events.sort_by(|a, b| b.start.cmp(&a.start));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{build_facility_snapshot, GeneratorConfig};

    fn test_runner() -> Runner {
        Runner::new(WorkflowConfig::from_args(4, 60, 20.0))
    }

    #[test]
    fn runner_builds_a_report_over_the_users_samples() {
        let snapshot = build_facility_snapshot(&GeneratorConfig {
            residents: 4,
            samples_per_resident: 60,
            seed: 11,
            ..Default::default()
        })
        .unwrap();
        let runner = test_runner();
        let result = runner.execute(&snapshot, 1, snapshot.generated_at);

        assert_eq!(result.user_id, 1);
        assert_eq!(result.movement_path.len(), 60);
        assert!(!result.heatmap.is_empty());

        let counted: u32 = result
            .heatmap
            .cells()
            .iter()
            .map(|cell| cell.count)
            .sum();
        assert_eq!(counted as usize, result.movement_path.len());

        let (samples, reports, skipped) = runner.metrics_snapshot();
        assert_eq!(samples, 60);
        assert_eq!(reports, 1);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn attended_events_are_unique_and_newest_first() {
        let snapshot = build_facility_snapshot(&GeneratorConfig {
            residents: 4,
            samples_per_resident: 10,
            seed: 3,
            ..Default::default()
        })
        .unwrap();
        let result = test_runner().execute(&snapshot, 1, snapshot.generated_at);

        let mut ids: Vec<u64> = result.events.iter().map(|event| event.event_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), result.events.len());
        assert!(result
            .events
            .windows(2)
            .all(|pair| pair[0].start >= pair[1].start));
    }

    #[test]
    fn friends_are_capped_at_three() {
        let snapshot = build_facility_snapshot(&GeneratorConfig {
            residents: 8,
            samples_per_resident: 10,
            event_count: 12,
            seed: 5,
            ..Default::default()
        })
        .unwrap();
        let result = test_runner().execute(&snapshot, 1, snapshot.generated_at);
        assert!(result.friends.len() <= 3);
    }
}
