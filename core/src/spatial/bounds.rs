/// Linear map of `value` from `[min, max]` onto `[0.0, display_size]`.
///
/// A degenerate axis (`min == max`) collapses every point to the midpoint
/// instead of dividing by zero.
pub fn scale(value: f64, min: f64, max: f64, display_size: f64) -> f64 {
    if max == min {
        return display_size / 2.0;
    }
    ((value - min) / (max - min)) * display_size
}

/// Axis-aligned bounds taken over the union of every spatial input.
///
/// Invariant: one `ScalingBounds` covers histogram cells, trace points,
/// and event coordinates combined. Per-subset bounds would place the
/// layers on different grids and the map would not line up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl ScalingBounds {
    /// Folds a point set into bounds.
    ///
    /// Returns `None` for an empty set; callers surface that as a
    /// "no data" state rather than an error.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = points.into_iter();
        let (first_x, first_y) = iter.next()?;
        let mut bounds = Self {
            min_x: first_x,
            max_x: first_x,
            min_y: first_y,
            max_y: first_y,
        };
        for (x, y) in iter {
            bounds.include(x, y);
        }
        Some(bounds)
    }

    /// Widens the bounds to cover one more point.
    pub fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// Projects a data-space point into screen space.
    ///
    /// The Y axis is flipped (`display_size - scaled`) because raster
    /// coordinates grow downward while facility coordinates grow upward.
    pub fn project(&self, x: f64, y: f64, display_size: f64) -> (f64, f64) {
        let screen_x = scale(x, self.min_x, self.max_x, display_size);
        let screen_y = display_size - scale(y, self.min_y, self.max_y, display_size);
        (screen_x, screen_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_stays_within_display_range() {
        for value in [0.0, 2.5, 7.0, 10.0] {
            let scaled = scale(value, 0.0, 10.0, 600.0);
            assert!((0.0..=600.0).contains(&scaled));
        }
    }

    #[test]
    fn scale_is_monotonic_when_axis_is_wide() {
        let low = scale(2.0, 0.0, 10.0, 600.0);
        let high = scale(8.0, 0.0, 10.0, 600.0);
        assert!(low <= high);
    }

    #[test]
    fn scale_degenerate_axis_returns_midpoint() {
        assert_eq!(scale(42.0, 7.0, 7.0, 600.0), 300.0);
        assert_eq!(scale(-3.0, 7.0, 7.0, 400.0), 200.0);
    }

    #[test]
    fn from_points_covers_the_union() {
        let bounds =
            ScalingBounds::from_points(vec![(0.0, 5.0), (10.0, -2.0), (4.0, 9.0)]).unwrap();
        assert_eq!(bounds.min_x, 0.0);
        assert_eq!(bounds.max_x, 10.0);
        assert_eq!(bounds.min_y, -2.0);
        assert_eq!(bounds.max_y, 9.0);
    }

    #[test]
    fn from_points_empty_set_yields_none() {
        assert!(ScalingBounds::from_points(Vec::new()).is_none());
    }

    #[test]
    fn project_flips_the_vertical_axis() {
        let bounds = ScalingBounds::from_points(vec![(0.0, 0.0), (10.0, 10.0)]).unwrap();
        assert_eq!(bounds.project(10.0, 10.0, 600.0), (600.0, 0.0));
        assert_eq!(bounds.project(0.0, 0.0, 600.0), (0.0, 600.0));
    }
}
