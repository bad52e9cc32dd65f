use crate::model::{OccupancyHistogram, SocialEvent, TracePoint};
use crate::prelude::{MapConfig, Marker, MarkerLayer};
use crate::render::{EventLayer, HeatmapLayer, PathAnimator};
use crate::spatial::ScalingBounds;

/// A fully placed mobility-map frame: one shared bounds, markers in draw
/// order (heat cells, then events, then the live position on top).
#[derive(Debug, Clone)]
pub struct MapScene {
    pub bounds: ScalingBounds,
    pub markers: Vec<Marker>,
}

impl MapScene {
    /// Derives the single `ScalingBounds` over the union of histogram
    /// cells, event coordinates, and trace points, then stacks the
    /// layers through it.
    ///
    /// Returns `None` when the combined point set is empty; the caller
    /// renders an explicit empty state, never an error.
    pub fn compose(
        histogram: &OccupancyHistogram,
        events: &[SocialEvent],
        trace: &[TracePoint],
        animator: &PathAnimator,
        config: &MapConfig,
    ) -> Option<MapScene> {
        let cell_points = histogram.cells().into_iter().map(|cell| (cell.x, cell.y));
        let event_points = events.iter().map(|event| (event.x_event, event.y_event));
        let trace_points = trace.iter().map(|point| (point.x, point.y));
        let bounds =
            ScalingBounds::from_points(cell_points.chain(event_points).chain(trace_points))?;

        let mut markers = Vec::with_capacity(histogram.len() + events.len() + 1);
        markers.extend(HeatmapLayer::new(histogram).markers(&bounds, config));
        markers.extend(EventLayer::new(events).markers(&bounds, config));
        markers.extend(animator.marker(trace, &bounds, config));

        Some(MapScene { bounds, markers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::MarkerKind;
    use chrono::{TimeZone, Utc};

    #[test]
    fn all_empty_inputs_compose_to_none() {
        let scene = MapScene::compose(
            &OccupancyHistogram::new(),
            &[],
            &[],
            &PathAnimator::new(),
            &MapConfig::default(),
        );
        assert!(scene.is_none());
    }

    #[test]
    fn bounds_cover_the_union_of_all_layers() {
        let histogram = OccupancyHistogram::from_points(vec![(0.0, 0.0)], 20.0);
        let start = Utc.with_ymd_and_hms(2026, 8, 7, 14, 0, 0).unwrap();
        let events = vec![SocialEvent {
            event_id: 7,
            x_event: 100.0,
            y_event: -40.0,
            start,
            end: start + chrono::Duration::minutes(10),
            participants: 2,
        }];
        let trace = vec![TracePoint { x: 50.0, y: 80.0 }];

        let scene = MapScene::compose(
            &histogram,
            &events,
            &trace,
            &PathAnimator::new(),
            &MapConfig::default(),
        )
        .unwrap();

        assert_eq!(scene.bounds.min_x, 0.0);
        assert_eq!(scene.bounds.max_x, 100.0);
        assert_eq!(scene.bounds.min_y, -40.0);
        assert_eq!(scene.bounds.max_y, 80.0);
    }

    #[test]
    fn position_marker_stacks_last() {
        let histogram = OccupancyHistogram::from_points(vec![(0.0, 0.0), (20.0, 20.0)], 20.0);
        let trace = vec![TracePoint { x: 10.0, y: 10.0 }];
        let scene = MapScene::compose(
            &histogram,
            &[],
            &trace,
            &PathAnimator::new(),
            &MapConfig::default(),
        )
        .unwrap();

        let last = scene.markers.last().unwrap();
        assert_eq!(last.kind, MarkerKind::Position);
        let heat_cells = scene
            .markers
            .iter()
            .filter(|m| m.kind == MarkerKind::HeatCell)
            .count();
        assert_eq!(heat_cells, histogram.len());
    }

    #[test]
    fn trace_alone_still_produces_a_scene() {
        let trace = vec![TracePoint { x: 1.0, y: 2.0 }, TracePoint { x: 3.0, y: 4.0 }];
        let scene = MapScene::compose(
            &OccupancyHistogram::new(),
            &[],
            &trace,
            &PathAnimator::new(),
            &MapConfig::default(),
        )
        .unwrap();
        assert_eq!(scene.markers.len(), 1);
        assert_eq!(scene.markers[0].kind, MarkerKind::Position);
    }
}
