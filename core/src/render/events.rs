use crate::model::SocialEvent;
use crate::prelude::{MapConfig, Marker, MarkerKind, MarkerLayer};
use crate::spatial::ScalingBounds;

/// Event layer: one fixed-radius circle per detected social event,
/// projected through the same bounds as the heat cells. No internal
/// state; purely a function of the events it borrows.
pub struct EventLayer<'a> {
    events: &'a [SocialEvent],
}

impl<'a> EventLayer<'a> {
    pub fn new(events: &'a [SocialEvent]) -> Self {
        Self { events }
    }
}

impl MarkerLayer for EventLayer<'_> {
    fn markers(&self, bounds: &ScalingBounds, config: &MapConfig) -> Vec<Marker> {
        self.events
            .iter()
            .map(|event| {
                let (x, y) = bounds.project(event.x_event, event.y_event, config.display_size);
                Marker::new(x, y, 1.0, MarkerKind::Event)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event_at(event_id: u64, x: f64, y: f64) -> SocialEvent {
        let start = Utc.with_ymd_and_hms(2026, 8, 7, 9, 0, 0).unwrap();
        SocialEvent {
            event_id,
            x_event: x,
            y_event: y,
            start,
            end: start + chrono::Duration::minutes(30),
            participants: 4,
        }
    }

    #[test]
    fn events_project_through_the_shared_bounds() {
        let events = vec![event_at(1, 0.0, 0.0), event_at(2, 10.0, 10.0)];
        let bounds = ScalingBounds::from_points(vec![(0.0, 0.0), (10.0, 10.0)]).unwrap();
        let markers = EventLayer::new(&events).markers(&bounds, &MapConfig::default());

        assert_eq!(markers.len(), 2);
        assert_eq!((markers[0].x, markers[0].y), (0.0, 600.0));
        assert_eq!((markers[1].x, markers[1].y), (600.0, 0.0));
        assert!(markers.iter().all(|m| m.kind == MarkerKind::Event));
    }

    #[test]
    fn no_events_means_no_markers() {
        let bounds = ScalingBounds::from_points(vec![(0.0, 0.0), (1.0, 1.0)]).unwrap();
        let markers = EventLayer::new(&[]).markers(&bounds, &MapConfig::default());
        assert!(markers.is_empty());
    }
}
