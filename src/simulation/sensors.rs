//! Ray-cast perception of the track walls.
//!
//! A vehicle looks along a fan of rays. Each reading is the normalized offset
//! of the nearest wall hit along the ray, 1.0 when nothing is within range.

use geo::{Coord, Line};
use kdtree::KdTree;
use kdtree::distance::squared_euclidean;

use super::geometric_utils::{
    closed_edges, distance, heading_vector, lerp, segment_intersection,
};
use super::params::Params;
use super::track::Track;

type Tree2D = KdTree<f32, usize, [f32; 2]>;

/// Spatial index over wall edges, keyed by edge midpoint.
///
/// Any edge that a ray of length `range` can touch has its midpoint within
/// `range + longest_half_edge` of the ray origin, so a radius query returns a
/// superset of the edges the brute-force scan would hit.
pub struct WallIndex {
    walls: Vec<Line<f32>>,
    tree: Tree2D,
    query_radius_sq: f32,
}

impl WallIndex {
    /// Indexes both walls of `track` as closed loops.
    pub fn new(track: &Track, range: f32) -> Self {
        let walls: Vec<Line<f32>> = closed_edges(track.inner_wall())
            .chain(closed_edges(track.outer_wall()))
            .collect();

        let mut tree = KdTree::with_capacity(2, walls.len());
        let mut longest_half_edge = 0.0_f32;
        for (i, wall) in walls.iter().enumerate() {
            let mid = (wall.start + wall.end) * 0.5;
            longest_half_edge = longest_half_edge.max(distance(wall.start, wall.end) * 0.5);
            // Coordinates come from a validated track and are always finite.
            let _ = tree.add([mid.x, mid.y], i);
        }

        // one unit of slack absorbs rounding in the squared distances
        let query_radius = range + longest_half_edge + 1.0;

        Self {
            walls,
            tree,
            query_radius_sq: query_radius * query_radius,
        }
    }

    /// Every wall edge of the track, inner loop first.
    pub fn walls(&self) -> &[Line<f32>] {
        &self.walls
    }

    /// Indices of the wall edges that may be reached from `origin`.
    pub fn candidates(&self, origin: Coord<f32>) -> Vec<usize> {
        self.tree
            .within(&[origin.x, origin.y], self.query_radius_sq, &squared_euclidean)
            .unwrap_or_default()
            .into_iter()
            .map(|(_, &idx)| idx)
            .collect()
    }
}

impl std::fmt::Debug for WallIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WallIndex")
            .field("walls", &self.walls.len())
            .field("query_radius_sq", &self.query_radius_sq)
            .finish_non_exhaustive()
    }
}

/// Casts the sensor fan of a vehicle against the track walls.
#[derive(Debug)]
pub struct RayCaster {
    num_rays: usize,
    fov: f32,
    range: f32,
    index: WallIndex,
}

impl RayCaster {
    /// Creates a ray caster for `track` using the sensor settings in `params`.
    pub fn new(track: &Track, params: &Params) -> Self {
        Self {
            num_rays: params.num_rays,
            fov: params.fov,
            range: params.sensor_range,
            index: WallIndex::new(track, params.sensor_range),
        }
    }

    /// Number of rays, and therefore readings, per cast.
    pub fn num_rays(&self) -> usize {
        self.num_rays
    }

    /// Maximum sensing distance.
    pub fn range(&self) -> f32 {
        self.range
    }

    /// Absolute ray angles from leftmost to rightmost, both inclusive.
    pub fn ray_angles(&self, heading: f32) -> impl Iterator<Item = f32> + '_ {
        let half = self.fov / 2.0;
        let last = (self.num_rays - 1) as f32;
        (0..self.num_rays).map(move |i| {
            let t = i as f32 / last;
            heading + lerp(-half, half, t)
        })
    }

    /// Ray segments from `pos` out to the sensing range.
    pub fn rays(&self, pos: Coord<f32>, heading: f32) -> Vec<Line<f32>> {
        self.ray_angles(heading)
            .map(|angle| Line::new(pos, pos + heading_vector(angle) * self.range))
            .collect()
    }

    /// Normalized wall distance along every ray, using the wall index.
    pub fn sense(&self, pos: Coord<f32>, heading: f32) -> Vec<f32> {
        let candidates = self.index.candidates(pos);
        let walls = self.index.walls();
        self.rays(pos, heading)
            .iter()
            .map(|ray| nearest_hit(ray, candidates.iter().map(|&i| &walls[i])))
            .collect()
    }

    /// Same readings as [`RayCaster::sense`], testing every wall edge.
    pub fn sense_brute_force(&self, pos: Coord<f32>, heading: f32) -> Vec<f32> {
        let walls = self.index.walls();
        self.rays(pos, heading)
            .iter()
            .map(|ray| nearest_hit(ray, walls.iter()))
            .collect()
    }
}

fn nearest_hit<'a>(ray: &Line<f32>, walls: impl Iterator<Item = &'a Line<f32>>) -> f32 {
    let mut min_offset = 1.0_f32;
    for wall in walls {
        if let Some(offset) = segment_intersection(ray, wall) {
            if offset < min_offset {
                min_offset = offset;
            }
        }
    }
    min_offset
}
