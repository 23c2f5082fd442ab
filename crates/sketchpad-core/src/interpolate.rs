//! Stroke densification.
//!
//! Pointer devices deliver samples at whatever rate they like; a fast drag can
//! leave gaps of dozens of units between two samples. The interpolator fills
//! those gaps with evenly spaced points so strokes render and hit-test as a
//! continuous line, while capping density at roughly one point per step.

use crate::error::{SketchError, SketchResult};
use kurbo::Point;

/// Default spacing between interpolated points, in logical units.
pub const INTERPOLATION_STEP: f64 = 1.5;

/// Upper bound on points emitted for a single sample.
pub const MAX_POINTS_PER_SAMPLE: usize = 4096;

/// Fills gaps between sampled points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolator {
    step: f64,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self {
            step: INTERPOLATION_STEP,
        }
    }
}

impl Interpolator {
    pub fn new(step: f64) -> SketchResult<Self> {
        if !(step > 0.0 && step.is_finite()) {
            return Err(SketchError::InvalidStep(step));
        }
        Ok(Self { step })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of points emitted for a gap of `distance`.
    ///
    /// At least one, at most [`MAX_POINTS_PER_SAMPLE`]; wider gaps get sparser points.
    pub fn steps_for(&self, distance: f64) -> usize {
        // Float-to-int casts saturate, and NaN becomes 0
        ((distance / self.step).floor() as usize).clamp(1, MAX_POINTS_PER_SAMPLE)
    }

    /// Extend an in-progress stroke with a new sample.
    ///
    /// Returns how many points were appended.
    pub fn extend(&self, points: &mut Vec<Point>, sample: Point) -> usize {
        let Some(&prev) = points.last() else {
            points.push(sample);
            return 1;
        };

        let distance = prev.distance(sample);
        if distance > self.step / 2.0 {
            let before = points.len();
            points.extend(self.between(prev, sample));
            points.len() - before
        } else if distance > 0.0 && points.len() == 1 {
            // A very short stroke still needs a second point to be kept
            points.push(sample);
            1
        } else {
            0
        }
    }

    /// Evenly spaced points from `from` (exclusive) to `to` (inclusive).
    ///
    /// The last point is exactly `to`.
    pub fn between(&self, from: Point, to: Point) -> impl Iterator<Item = Point> {
        let steps = self.steps_for(from.distance(to));
        (1..=steps).map(move |i| {
            if i == steps {
                to
            } else {
                from.lerp(to, i as f64 / steps as f64)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_is_pushed() {
        let interp = Interpolator::default();
        let mut points = Vec::new();
        assert_eq!(interp.extend(&mut points, Point::new(1.0, 2.0)), 1);
        assert_eq!(points, vec![Point::new(1.0, 2.0)]);
    }

    #[test]
    fn test_long_gap_is_filled() {
        let interp = Interpolator::default();
        let mut points = vec![Point::ZERO];
        let end = Point::new(10.0, 0.0);

        let added = interp.extend(&mut points, end);
        // floor(10 / 1.5) = 6
        assert_eq!(added, 6);
        assert_eq!(*points.last().unwrap(), end);
        for p in &points[1..points.len() - 1] {
            assert!(p.x > 0.0 && p.x < 10.0);
        }
    }

    #[test]
    fn test_points_are_evenly_spaced() {
        let interp = Interpolator::default();
        let mut points = vec![Point::ZERO];
        interp.extend(&mut points, Point::new(0.0, 9.0));

        let gaps: Vec<f64> = points.windows(2).map(|w| w[0].distance(w[1])).collect();
        for gap in &gaps {
            assert!((gap - gaps[0]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_gap_just_over_half_step_emits_one() {
        let interp = Interpolator::default();
        let mut points = vec![Point::ZERO, Point::new(0.0, 1.0)];
        assert_eq!(interp.extend(&mut points, Point::new(0.0, 2.0)), 1);
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn test_tiny_move_on_single_point_is_kept() {
        let interp = Interpolator::default();
        let mut points = vec![Point::ZERO];
        assert_eq!(interp.extend(&mut points, Point::new(0.3, 0.0)), 1);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_tiny_move_on_longer_stroke_is_dropped() {
        let interp = Interpolator::default();
        let mut points = vec![Point::ZERO, Point::new(5.0, 0.0)];
        assert_eq!(interp.extend(&mut points, Point::new(5.3, 0.0)), 0);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_no_move_is_dropped() {
        let interp = Interpolator::default();
        let mut points = vec![Point::ZERO];
        assert_eq!(interp.extend(&mut points, Point::ZERO), 0);
    }

    #[test]
    fn test_count_matches_floor_for_many_distances() {
        let interp = Interpolator::default();
        for tenth in 16..400 {
            let d = tenth as f64 / 10.0;
            let from = Point::new(3.0, 4.0);
            let to = Point::new(3.0 + d, 4.0);
            let produced: Vec<Point> = interp.between(from, to).collect();
            assert_eq!(produced.len(), (d / 1.5).floor() as usize);
            assert_eq!(*produced.last().unwrap(), to);
        }
    }

    #[test]
    fn test_unusable_steps_rejected() {
        for step in [0.0, -1.5, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(Interpolator::new(step), Err(SketchError::InvalidStep(_))),
                "step {step}"
            );
        }
        assert_eq!(Interpolator::new(2.0).unwrap().step(), 2.0);
    }

    #[test]
    fn test_huge_gap_is_capped() {
        let interp = Interpolator::default();
        assert_eq!(interp.steps_for(1e12), MAX_POINTS_PER_SAMPLE);
        assert_eq!(interp.steps_for(f64::INFINITY), MAX_POINTS_PER_SAMPLE);
        assert_eq!(interp.steps_for(f64::NAN), 1);

        let mut points = vec![Point::ZERO];
        let end = Point::new(1e9, 0.0);
        assert_eq!(interp.extend(&mut points, end), MAX_POINTS_PER_SAMPLE);
        assert_eq!(*points.last().unwrap(), end);
    }
}
