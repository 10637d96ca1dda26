//! Closed race track built from a handful of control points.
//!
//! The centerline is a Catmull-Rom spline through the control points. Both
//! walls are offset from it by a fixed half-width along each edge normal, so
//! all three polylines are index-aligned.

use geo::{Coord, coord};

use super::error::{Result, SimError};
use super::geometric_utils::{catmull_rom, edge_normal};
use super::params::Params;

/// Position and heading where every vehicle spawns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartPose {
    /// Spawn position (first centerline point).
    pub pos: Coord<f32>,
    /// Heading in radians towards the second centerline point.
    pub heading: f32,
}

/// Immutable track geometry.
#[derive(Debug, Clone)]
pub struct Track {
    center_line: Vec<Coord<f32>>,
    inner_wall: Vec<Coord<f32>>,
    outer_wall: Vec<Coord<f32>>,
    checkpoints: Vec<Coord<f32>>,
    start: StartPose,
    half_width: f32,
}

impl Track {
    /// Builds a track from cyclic control points.
    ///
    /// # Arguments
    ///
    /// * `control_points` - Ordered control points, at least four
    /// * `steps` - Spline samples per control-point segment
    /// * `half_width` - Distance from the centerline to each wall
    /// * `checkpoint_stride` - Every Nth centerline point becomes a checkpoint
    ///
    /// # Errors
    ///
    /// [`SimError::TooFewControlPoints`] for fewer than four points,
    /// [`SimError::InvalidConfig`] for a half-width that is not a positive finite
    /// number and [`SimError::DegenerateGeometry`] when two consecutive
    /// centerline points coincide.
    pub fn build(
        control_points: &[Coord<f32>],
        steps: usize,
        half_width: f32,
        checkpoint_stride: usize,
    ) -> Result<Self> {
        let n = control_points.len();
        if n < 4 {
            return Err(SimError::TooFewControlPoints(n));
        }
        if !(half_width.is_finite() && half_width > 0.0) {
            return Err(SimError::invalid_config(format!(
                "track half-width must be positive and finite, got {half_width}"
            )));
        }
        if steps == 0 || checkpoint_stride == 0 {
            return Err(SimError::invalid_config(
                "spline steps and checkpoint stride must be non-zero",
            ));
        }

        let mut center_line = Vec::with_capacity(n * steps);
        for i in 0..n {
            let p0 = control_points[(i + n - 1) % n];
            let p1 = control_points[i];
            let p2 = control_points[(i + 1) % n];
            let p3 = control_points[(i + 2) % n];
            for j in 0..steps {
                let t = j as f32 / steps as f32;
                center_line.push(catmull_rom(p0, p1, p2, p3, t));
            }
        }

        let len = center_line.len();
        let mut inner_wall = Vec::with_capacity(len);
        let mut outer_wall = Vec::with_capacity(len);
        let mut checkpoints = Vec::with_capacity(len / checkpoint_stride + 1);

        for (i, &p) in center_line.iter().enumerate() {
            let next = center_line[(i + 1) % len];
            let normal = edge_normal(p, next).ok_or(SimError::DegenerateGeometry { index: i })?;

            inner_wall.push(p + normal * half_width);
            outer_wall.push(p - normal * half_width);

            if i % checkpoint_stride == 0 {
                checkpoints.push(p);
            }
        }

        let first = center_line[0];
        let second = center_line[1 % len];
        let start = StartPose {
            pos: first,
            heading: (second.y - first.y).atan2(second.x - first.x),
        };

        Ok(Self {
            center_line,
            inner_wall,
            outer_wall,
            checkpoints,
            start,
            half_width,
        })
    }

    /// Builds the default circuit: an oval with a twist on the top straight.
    ///
    /// The twist near (850, 250) bends tighter than the default half-width, so
    /// the inner wall folds into a small swallowtail there. The outer wall and
    /// the centerline stay simple and the two walls never cross. The geometry is
    /// kept as is; use [`Track::build`] with other points for a fully simple
    /// boundary.
    pub fn default_circuit(params: &Params) -> Result<Self> {
        Self::build(
            &default_control_points(),
            params.spline_steps,
            params.track_half_width,
            params.checkpoint_stride,
        )
    }

    /// Dense, closed centerline.
    pub fn center_line(&self) -> &[Coord<f32>] {
        &self.center_line
    }

    /// Wall offset along the positive edge normal.
    pub fn inner_wall(&self) -> &[Coord<f32>] {
        &self.inner_wall
    }

    /// Wall offset along the negative edge normal.
    pub fn outer_wall(&self) -> &[Coord<f32>] {
        &self.outer_wall
    }

    /// Checkpoints in traversal order.
    pub fn checkpoints(&self) -> &[Coord<f32>] {
        &self.checkpoints
    }

    /// Spawn pose for every vehicle.
    pub fn start(&self) -> StartPose {
        self.start
    }

    /// Distance from the centerline to each wall.
    pub fn half_width(&self) -> f32 {
        self.half_width
    }

    /// Checkpoint following `checkpoint_index`, wrapping around the lap.
    pub fn next_checkpoint(&self, checkpoint_index: usize) -> Coord<f32> {
        self.checkpoints[(checkpoint_index + 1) % self.checkpoints.len()]
    }
}

/// Control points of the default circuit.
pub fn default_control_points() -> Vec<Coord<f32>> {
    vec![
        coord! { x: 150.0, y: 360.0 },
        coord! { x: 350.0, y: 150.0 },
        coord! { x: 700.0, y: 150.0 },
        coord! { x: 850.0, y: 250.0 },
        coord! { x: 1000.0, y: 150.0 },
        coord! { x: 1100.0, y: 360.0 },
        coord! { x: 900.0, y: 570.0 },
        coord! { x: 350.0, y: 570.0 },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_circuit_sizes() {
        let track = Track::default_circuit(&Params::default()).unwrap();
        assert_eq!(track.center_line().len(), 400);
        assert_eq!(track.inner_wall().len(), 400);
        assert_eq!(track.outer_wall().len(), 400);
        // indices 0, 30, ..., 390
        assert_eq!(track.checkpoints().len(), 14);
    }

    #[test]
    fn test_start_pose_matches_first_points() {
        let track = Track::default_circuit(&Params::default()).unwrap();
        let start = track.start();
        assert_eq!(start.pos, track.center_line()[0]);
        // the first segment leaves (150, 360) heading up the screen
        assert!(start.heading < 0.0);
    }

    #[test]
    fn test_too_few_control_points() {
        let points = &default_control_points()[..3];
        assert!(matches!(
            Track::build(points, 10, 45.0, 5),
            Err(SimError::TooFewControlPoints(3))
        ));
    }

    #[test]
    fn test_coincident_control_points_are_degenerate() {
        let p = coord! { x: 5.0, y: 5.0 };
        let result = Track::build(&[p, p, p, p], 10, 45.0, 5);
        assert!(matches!(result, Err(SimError::DegenerateGeometry { .. })));
    }

    #[test]
    fn test_next_checkpoint_wraps() {
        let track = Track::default_circuit(&Params::default()).unwrap();
        let last = track.checkpoints().len() - 1;
        assert_eq!(track.next_checkpoint(last), track.checkpoints()[0]);
        assert_eq!(track.next_checkpoint(0), track.checkpoints()[1]);
    }

    #[test]
    fn test_non_positive_or_non_finite_half_width_is_rejected() {
        let points = default_control_points();
        for width in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, 0.0, -45.0] {
            assert!(
                matches!(
                    Track::build(&points, 50, width, 30),
                    Err(SimError::InvalidConfig(_))
                ),
                "half-width {width} accepted"
            );
        }
    }

    #[test]
    fn test_walls_are_finite() {
        let track = Track::default_circuit(&Params::default()).unwrap();
        assert!(
            track
                .inner_wall()
                .iter()
                .chain(track.outer_wall())
                .all(|p| p.x.is_finite() && p.y.is_finite())
        );
    }
}
