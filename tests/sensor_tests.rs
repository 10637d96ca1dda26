#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evo_racer::simulation::geometric_utils::{closed_edges, segment_intersection};
use evo_racer::simulation::params::Params;
use evo_racer::simulation::sensors::RayCaster;
use evo_racer::simulation::track::Track;
use geo::{Coord, Line};
use proptest::prelude::*;

fn create_test_params() -> Params {
    Params::default()
}

fn setup() -> (Track, RayCaster) {
    let params = create_test_params();
    let track = Track::default_circuit(&params).unwrap();
    let caster = RayCaster::new(&track, &params);
    (track, caster)
}

#[test]
fn test_outermost_rays_see_walls_at_start() {
    let (track, caster) = setup();
    let start = track.start();
    let readings = caster.sense(start.pos, start.heading);
    // the outermost rays point slightly backwards and still see a wall
    assert!(readings[0] < 1.0);
    assert!(readings[8] < 1.0);
}

proptest! {
    #[test]
    fn prop_readings_are_bounded_and_match_walls(
        x in 50.0f32..1200.0,
        y in 50.0f32..700.0,
        heading in -std::f32::consts::PI..std::f32::consts::PI,
    ) {
        let (track, caster) = setup();
        let pos = Coord { x, y };
        let readings = caster.sense(pos, heading);
        prop_assert_eq!(readings.len(), caster.num_rays());

        let walls: Vec<Line<f32>> = closed_edges(track.inner_wall())
            .chain(closed_edges(track.outer_wall()))
            .collect();

        for (ray, &reading) in caster.rays(pos, heading).iter().zip(&readings) {
            prop_assert!((0.0..=1.0).contains(&reading));
            let hit = walls
                .iter()
                .filter_map(|w| segment_intersection(ray, w))
                .any(|t| t < 1.0);
            prop_assert_eq!(reading < 1.0, hit);
        }

        prop_assert_eq!(readings, caster.sense_brute_force(pos, heading));
    }
}
