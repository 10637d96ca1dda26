//! Checkpoint progress, fitness scoring and death conditions.

use geo::Coord;
use serde::{Deserialize, Serialize};

use super::geometric_utils::distance;
use super::params::Params;
use super::track::Track;

/// Why a vehicle stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// A sensor reading dropped below the collision threshold.
    Collision,
    /// Crawling below the minimum speed for too long.
    Stagnation,
    /// No checkpoint captured within the hard timeout.
    Timeout,
    /// Still running when the generation reached its tick limit.
    GenerationLimit,
}

/// Lap progress of a single vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Progress {
    /// Checkpoints captured this life. Never decreases.
    pub checkpoint_index: usize,
    /// Time since spawn or the last captured checkpoint.
    pub age: f32,
    /// `checkpoint_index + (1 - distance_to_next / norm)`.
    pub fitness: f32,
    /// Distance to the checkpoint targeted on the last update.
    pub distance_to_next: f32,
}

impl Progress {
    /// Credits one tick of age.
    pub fn age_by(&mut self, dt: f32) {
        self.age += dt;
    }

    /// Captures the next checkpoint when within reach and rescores fitness.
    ///
    /// A capture resets the age: progress forgives time.
    pub fn update(&mut self, pos: Coord<f32>, track: &Track, params: &Params) {
        let target = track.next_checkpoint(self.checkpoint_index);
        let dist = distance(target, pos);

        if dist < params.checkpoint_radius {
            self.checkpoint_index += 1;
            self.age = 0.0;
        }

        self.distance_to_next = dist;
        self.fitness =
            self.checkpoint_index as f32 + (1.0 - dist / params.fitness_distance_norm);
    }

    /// In-between-checkpoints part of the fitness.
    pub fn distance_score(&self) -> f32 {
        self.fitness - self.checkpoint_index as f32
    }
}

/// First death condition that applies, checked in a fixed order.
pub fn death_cause(
    sensors: &[f32],
    age: f32,
    speed: f32,
    params: &Params,
) -> Option<DeathCause> {
    if sensors.iter().any(|&s| s < params.collision_threshold) {
        Some(DeathCause::Collision)
    } else if age > params.slow_timeout && speed < params.min_speed {
        Some(DeathCause::Stagnation)
    } else if age > params.hard_timeout {
        Some(DeathCause::Timeout)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_increments_and_resets_age() {
        let params = Params::default();
        let track = Track::default_circuit(&params).unwrap();
        let mut progress = Progress {
            age: 12.0,
            ..Progress::default()
        };

        progress.update(track.checkpoints()[1], &track, &params);
        assert_eq!(progress.checkpoint_index, 1);
        assert_eq!(progress.age, 0.0);
        assert!((progress.fitness - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_far_from_checkpoint_keeps_index() {
        let params = Params::default();
        let track = Track::default_circuit(&params).unwrap();
        let mut progress = Progress::default();

        progress.update(track.start().pos, &track, &params);
        assert_eq!(progress.checkpoint_index, 0);
        assert!(progress.fitness < 1.0);
        assert!((progress.distance_score() - progress.fitness).abs() < 1e-6);
    }

    #[test]
    fn test_death_conditions_in_order() {
        let params = Params::default();
        let clear = [1.0; 9];
        let mut crashed = [1.0; 9];
        crashed[3] = 0.01;

        assert_eq!(death_cause(&clear, 5.0, 3.0, &params), None);
        assert_eq!(
            death_cause(&crashed, 150.0, 0.0, &params),
            Some(DeathCause::Collision)
        );
        assert_eq!(
            death_cause(&clear, 20.5, 1.0, &params),
            Some(DeathCause::Stagnation)
        );
        assert_eq!(death_cause(&clear, 20.5, 8.0, &params), None);
        assert_eq!(
            death_cause(&clear, 100.5, 8.0, &params),
            Some(DeathCause::Timeout)
        );
    }
}
