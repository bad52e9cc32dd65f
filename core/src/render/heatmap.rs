use crate::model::OccupancyHistogram;
use crate::prelude::{MapConfig, Marker, MarkerKind, MarkerLayer};
use crate::spatial::ScalingBounds;

/// Heat layer: one center-anchored square per visited cell, opacity
/// proportional to the cell's share of the busiest cell.
///
/// `max_count` is recomputed on every render, so the layer is a pure
/// function of the histogram it borrows.
pub struct HeatmapLayer<'a> {
    histogram: &'a OccupancyHistogram,
}

impl<'a> HeatmapLayer<'a> {
    pub fn new(histogram: &'a OccupancyHistogram) -> Self {
        Self { histogram }
    }
}

impl MarkerLayer for HeatmapLayer<'_> {
    fn markers(&self, bounds: &ScalingBounds, config: &MapConfig) -> Vec<Marker> {
        let max_count = self.histogram.max_count();
        if max_count == 0 {
            return Vec::new();
        }

        self.histogram
            .cells()
            .into_iter()
            .map(|cell| {
                let (x, y) = bounds.project(cell.x, cell.y, config.display_size);
                let opacity = f64::from(cell.count) / f64::from(max_count);
                Marker::new(x, y, opacity, MarkerKind::HeatCell)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_cell_histogram() -> OccupancyHistogram {
        let mut histogram = OccupancyHistogram::new();
        histogram.insert_raw("0,0", 2);
        histogram.insert_raw("10,10", 8);
        histogram
    }

    fn cell_bounds(histogram: &OccupancyHistogram) -> ScalingBounds {
        ScalingBounds::from_points(histogram.cells().into_iter().map(|c| (c.x, c.y))).unwrap()
    }

    #[test]
    fn busiest_cell_is_fully_opaque_and_placed_at_the_corner() {
        let histogram = two_cell_histogram();
        let bounds = cell_bounds(&histogram);
        let config = MapConfig::default();

        let markers = HeatmapLayer::new(&histogram).markers(&bounds, &config);
        assert_eq!(markers.len(), 2);

        let origin = &markers[0];
        assert_eq!((origin.x, origin.y), (0.0, 600.0));
        assert_eq!(origin.opacity, 0.25);

        let busiest = &markers[1];
        assert_eq!((busiest.x, busiest.y), (600.0, 0.0));
        assert_eq!(busiest.opacity, 1.0);
    }

    #[test]
    fn opacity_stays_within_unit_range() {
        let histogram = two_cell_histogram();
        let bounds = cell_bounds(&histogram);
        let markers = HeatmapLayer::new(&histogram).markers(&bounds, &MapConfig::default());

        for marker in &markers {
            assert!((0.0..=1.0).contains(&marker.opacity));
            assert_eq!(marker.kind, MarkerKind::HeatCell);
        }
    }

    #[test]
    fn rendering_is_idempotent() {
        let histogram = two_cell_histogram();
        let bounds = cell_bounds(&histogram);
        let config = MapConfig::default();
        let layer = HeatmapLayer::new(&histogram);

        assert_eq!(layer.markers(&bounds, &config), layer.markers(&bounds, &config));
    }

    #[test]
    fn empty_histogram_yields_no_markers() {
        let histogram = OccupancyHistogram::new();
        let bounds = ScalingBounds::from_points(vec![(0.0, 0.0), (1.0, 1.0)]).unwrap();
        let markers = HeatmapLayer::new(&histogram).markers(&bounds, &MapConfig::default());
        assert!(markers.is_empty());
    }
}
