//! Geometric utility functions for splines, normals and segment intersection.

use geo::{Coord, Line};

/// Evaluates a uniform Catmull-Rom segment between `p1` and `p2` at `t` in `[0, 1)`.
///
/// `p0` and `p3` are the neighbouring control points that shape the tangents.
pub fn catmull_rom(
    p0: Coord<f32>,
    p1: Coord<f32>,
    p2: Coord<f32>,
    p3: Coord<f32>,
    t: f32,
) -> Coord<f32> {
    let tt = t * t;
    let ttt = tt * t;
    let axis = |a: f32, b: f32, c: f32, d: f32| {
        0.5 * ((2.0 * b)
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * tt
            + (-a + 3.0 * b - 3.0 * c + d) * ttt)
    };
    Coord {
        x: axis(p0.x, p1.x, p2.x, p3.x),
        y: axis(p0.y, p1.y, p2.y, p3.y),
    }
}

/// Unit normal `(-dy, dx) / len` of the edge from `from` to `to`.
///
/// Returns `None` for zero-length or non-finite edges.
pub fn edge_normal(from: Coord<f32>, to: Coord<f32>) -> Option<Coord<f32>> {
    let delta = to - from;
    let len = delta.x.hypot(delta.y);
    if !(len.is_finite() && len > 0.0) {
        return None;
    }
    Some(Coord {
        x: -delta.y / len,
        y: delta.x / len,
    })
}

/// Linear interpolation from `a` to `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Coord<f32>, b: Coord<f32>) -> f32 {
    let delta = a - b;
    delta.x.hypot(delta.y)
}

/// Length of a coordinate treated as a vector.
#[inline]
pub fn magnitude(v: Coord<f32>) -> f32 {
    v.x.hypot(v.y)
}

/// Unit vector pointing along `angle` (radians).
#[inline]
pub fn heading_vector(angle: f32) -> Coord<f32> {
    Coord {
        x: angle.cos(),
        y: angle.sin(),
    }
}

/// Parametric intersection of segment `ray` with segment `wall`.
///
/// Returns the offset along `ray` (0 at its start, 1 at its end) when both
/// segment parameters lie in `[0, 1]`. Parallel segments never intersect.
#[inline]
pub fn segment_intersection(ray: &Line<f32>, wall: &Line<f32>) -> Option<f32> {
    let (a, b) = (ray.start, ray.end);
    let (c, d) = (wall.start, wall.end);

    let t_top = (d.x - c.x) * (a.y - c.y) - (d.y - c.y) * (a.x - c.x);
    let u_top = (c.y - a.y) * (a.x - b.x) - (c.x - a.x) * (a.y - b.y);
    let bottom = (d.y - c.y) * (b.x - a.x) - (d.x - c.x) * (b.y - a.y);

    if bottom == 0.0 {
        return None;
    }

    let t = t_top / bottom;
    let u = u_top / bottom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(t)
    } else {
        None
    }
}

/// Iterates the edges of a closed polyline, including the edge from the last
/// point back to the first.
pub fn closed_edges(points: &[Coord<f32>]) -> impl Iterator<Item = Line<f32>> + '_ {
    let n = points.len();
    (0..n).map(move |i| Line::new(points[i], points[(i + 1) % n]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn test_catmull_rom_passes_through_p1() {
        let p = [
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 10.0, y: 5.0 },
            coord! { x: 20.0, y: 0.0 },
            coord! { x: 30.0, y: 5.0 },
        ];
        let at_start = catmull_rom(p[0], p[1], p[2], p[3], 0.0);
        assert!((at_start.x - 10.0).abs() < 1e-5);
        assert!((at_start.y - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_edge_normal_is_left_perpendicular() {
        let n = edge_normal(coord! { x: 0.0, y: 0.0 }, coord! { x: 3.0, y: 0.0 }).unwrap();
        assert!((n.x - 0.0).abs() < 1e-6);
        assert!((n.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_edge_normal_rejects_zero_length() {
        let p = coord! { x: 4.0, y: 4.0 };
        assert!(edge_normal(p, p).is_none());
    }

    #[test]
    fn test_segment_intersection_midpoint() {
        let ray = Line::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 0.0 });
        let wall = Line::new(coord! { x: 5.0, y: -1.0 }, coord! { x: 5.0, y: 1.0 });
        let t = segment_intersection(&ray, &wall).unwrap();
        assert!((t - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_segment_intersection_misses_short_ray() {
        let ray = Line::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 4.0, y: 0.0 });
        let wall = Line::new(coord! { x: 5.0, y: -1.0 }, coord! { x: 5.0, y: 1.0 });
        assert!(segment_intersection(&ray, &wall).is_none());
    }

    #[test]
    fn test_parallel_segments_never_hit() {
        let ray = Line::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 0.0 });
        let wall = Line::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 5.0, y: 0.0 });
        assert!(segment_intersection(&ray, &wall).is_none());
    }

    #[test]
    fn test_closed_edges_wrap_around() {
        let square = [
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 1.0, y: 0.0 },
            coord! { x: 1.0, y: 1.0 },
        ];
        let edges: Vec<_> = closed_edges(&square).collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2].end, square[0]);
    }
}
