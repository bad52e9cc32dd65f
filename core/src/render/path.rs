use crate::model::TracePoint;
use crate::prelude::{MapConfig, Marker, MarkerKind};
use crate::spatial::ScalingBounds;

/// Advances one highlighted marker along the movement trace.
///
/// The animator owns only the integer cursor; the advancement cadence
/// belongs to the caller's timer, which runs independently of the data
/// refresh. The cursor deliberately survives refetches and is re-wrapped
/// against the current trace length on every read, so a shorter trace
/// can never produce an out-of-range index.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathAnimator {
    cursor: usize,
}

impl PathAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// One animation tick: `cursor = (cursor + 1) % trace_len`, looping
    /// forever. An empty trace parks the cursor at zero.
    pub fn advance(&mut self, trace_len: usize) {
        if trace_len == 0 {
            self.cursor = 0;
        } else {
            self.cursor = (self.cursor + 1) % trace_len;
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current trace position, or `None` when there is no trace to walk.
    pub fn current<'a>(&self, trace: &'a [TracePoint]) -> Option<&'a TracePoint> {
        if trace.is_empty() {
            return None;
        }
        trace.get(self.cursor % trace.len())
    }

    /// The live-position marker, drawn above the heat and event layers
    /// and distinguished by color/shape, not scale.
    pub fn marker(
        &self,
        trace: &[TracePoint],
        bounds: &ScalingBounds,
        config: &MapConfig,
    ) -> Option<Marker> {
        let point = self.current(trace)?;
        let (x, y) = bounds.project(point.x, point.y, config.display_size);
        Some(Marker::new(x, y, 1.0, MarkerKind::Position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace_of(points: &[(f64, f64)]) -> Vec<TracePoint> {
        points.iter().map(|&(x, y)| TracePoint { x, y }).collect()
    }

    #[test]
    fn cursor_after_k_ticks_is_k_mod_length() {
        let trace = trace_of(&[(0.0, 0.0), (5.0, 5.0)]);
        let mut animator = PathAnimator::new();
        for _ in 0..3 {
            animator.advance(trace.len());
        }
        assert_eq!(animator.cursor(), 3 % trace.len());
        assert_eq!(animator.current(&trace), Some(&trace[1]));
    }

    #[test]
    fn empty_trace_emits_no_position() {
        let mut animator = PathAnimator::new();
        animator.advance(0);
        assert_eq!(animator.cursor(), 0);
        assert!(animator.current(&[]).is_none());

        let bounds = ScalingBounds::from_points(vec![(0.0, 0.0), (1.0, 1.0)]).unwrap();
        assert!(animator.marker(&[], &bounds, &MapConfig::default()).is_none());
    }

    #[test]
    fn cursor_survives_a_shorter_refetched_trace() {
        let long_trace = trace_of(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)]);
        let mut animator = PathAnimator::new();
        for _ in 0..4 {
            animator.advance(long_trace.len());
        }
        assert_eq!(animator.cursor(), 4);

        let short_trace = trace_of(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(animator.current(&short_trace), Some(&short_trace[4 % 3]));
    }

    #[test]
    fn marker_projects_the_current_point() {
        let trace = trace_of(&[(0.0, 0.0), (10.0, 10.0)]);
        let bounds = ScalingBounds::from_points(vec![(0.0, 0.0), (10.0, 10.0)]).unwrap();
        let mut animator = PathAnimator::new();
        animator.advance(trace.len());

        let marker = animator
            .marker(&trace, &bounds, &MapConfig::default())
            .unwrap();
        assert_eq!((marker.x, marker.y), (600.0, 0.0));
        assert_eq!(marker.kind, MarkerKind::Position);
    }
}
