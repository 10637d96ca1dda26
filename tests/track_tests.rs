#![allow(missing_docs)]

use evo_racer::simulation::geometric_utils::closed_edges;
use evo_racer::simulation::params::Params;
use evo_racer::simulation::track::Track;
use geo::{Coord, Intersects, Line, coord};

fn create_test_params() -> Params {
    Params::default()
}

/// Eight control points on a circle of radius 300.
fn round_control_points() -> Vec<Coord<f32>> {
    (0..8)
        .map(|i| {
            let a = i as f32 * std::f32::consts::TAU / 8.0;
            coord! { x: 600.0 + 300.0 * a.cos(), y: 400.0 + 300.0 * a.sin() }
        })
        .collect()
}

fn self_intersections(points: &[Coord<f32>]) -> usize {
    let edges: Vec<Line<f32>> = closed_edges(points).collect();
    let n = edges.len();
    let mut count = 0;
    for i in 0..n {
        for j in (i + 2)..n {
            // first and last edge share a vertex
            if i == 0 && j == n - 1 {
                continue;
            }
            if edges[i].intersects(&edges[j]) {
                count += 1;
            }
        }
    }
    count
}

fn crossings(a: &[Coord<f32>], b: &[Coord<f32>]) -> usize {
    let b_edges: Vec<Line<f32>> = closed_edges(b).collect();
    closed_edges(a)
        .map(|ea| b_edges.iter().filter(|eb| ea.intersects(*eb)).count())
        .sum()
}

#[test]
fn test_walls_match_centerline_length() {
    let track = Track::default_circuit(&create_test_params()).unwrap();
    let n = track.center_line().len();
    assert_eq!(track.inner_wall().len(), n);
    assert_eq!(track.outer_wall().len(), n);
}

#[test]
fn test_no_coincident_consecutive_points() {
    let track = Track::default_circuit(&create_test_params()).unwrap();
    for wall in [track.center_line(), track.inner_wall(), track.outer_wall()] {
        for edge in closed_edges(wall) {
            assert_ne!(edge.start, edge.end);
        }
    }
}

#[test]
fn test_walls_sit_at_half_width() {
    let params = create_test_params();
    let track = Track::default_circuit(&params).unwrap();
    for ((c, i), o) in track
        .center_line()
        .iter()
        .zip(track.inner_wall())
        .zip(track.outer_wall())
    {
        let di = (*i - *c).x.hypot((*i - *c).y);
        let d_o = (*o - *c).x.hypot((*o - *c).y);
        assert!((di - params.track_half_width).abs() < 1e-3);
        assert!((d_o - params.track_half_width).abs() < 1e-3);
    }
}

#[test]
fn test_round_circuit_boundary_is_simple() {
    let params = create_test_params();
    let track = Track::build(
        &round_control_points(),
        params.spline_steps,
        params.track_half_width,
        params.checkpoint_stride,
    )
    .unwrap();

    assert_eq!(self_intersections(track.center_line()), 0);
    assert_eq!(self_intersections(track.inner_wall()), 0);
    assert_eq!(self_intersections(track.outer_wall()), 0);
    assert_eq!(crossings(track.inner_wall(), track.outer_wall()), 0);
}

#[test]
fn test_default_circuit_walls_never_cross() {
    let track = Track::default_circuit(&create_test_params()).unwrap();
    assert_eq!(self_intersections(track.center_line()), 0);
    assert_eq!(self_intersections(track.outer_wall()), 0);
    assert_eq!(crossings(track.inner_wall(), track.outer_wall()), 0);
}

#[test]
fn test_checkpoints_lie_on_centerline() {
    let params = create_test_params();
    let track = Track::default_circuit(&params).unwrap();
    for (k, checkpoint) in track.checkpoints().iter().enumerate() {
        assert_eq!(*checkpoint, track.center_line()[k * params.checkpoint_stride]);
    }
}
