//! Per-tick vehicle kinematics.
//!
//! Velocity is measured in displacement per tick, so integration needs no
//! explicit timestep. The update is deterministic: identical state and
//! controls always produce bit-identical results.

use geo::Coord;

use super::geometric_utils::{heading_vector, magnitude};
use super::params::Params;
use super::track::StartPose;

/// Control outputs for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Controls {
    /// Steering in `[-1, 1]`.
    pub steer: f32,
    /// Throttle in `[min_throttle, 1]`.
    pub throttle: f32,
}

impl Controls {
    /// Maps raw network outputs to controls.
    ///
    /// Steering is `2 * out - 1` clamped to `[-1, 1]`; throttle is clamped to
    /// `[min_throttle, 1]` so the vehicle always has some forward drive.
    pub fn from_outputs(steer_raw: f32, throttle_raw: f32, min_throttle: f32) -> Self {
        Self {
            steer: (steer_raw * 2.0 - 1.0).clamp(-1.0, 1.0),
            throttle: throttle_raw.clamp(min_throttle, 1.0),
        }
    }
}

/// Position, velocity and heading of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    /// Position in track coordinates.
    pub pos: Coord<f32>,
    /// Displacement per tick.
    pub vel: Coord<f32>,
    /// Heading in radians.
    pub heading: f32,
}

impl Kinematics {
    /// Places a vehicle at `start`, already rolling forward at `push`.
    pub fn spawn(start: StartPose, push: f32) -> Self {
        Self {
            pos: start.pos,
            vel: heading_vector(start.heading) * push,
            heading: start.heading,
        }
    }

    /// Current speed.
    pub fn speed(&self) -> f32 {
        magnitude(self.vel)
    }

    /// Advances one tick: turn, accelerate, apply friction, move.
    pub fn integrate(&mut self, controls: Controls, params: &Params) {
        let speed = self.speed();

        // a stationary vehicle cannot turn
        self.heading += controls.steer * params.turn_gain * (speed / params.max_speed);

        let force = heading_vector(self.heading) * (controls.throttle * params.acceleration);
        self.vel = self.vel + force;
        self.vel = self.vel * params.friction;

        self.pos = self.pos + self.vel;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_origin(heading: f32, push: f32) -> Kinematics {
        Kinematics::spawn(
            StartPose {
                pos: Coord { x: 0.0, y: 0.0 },
                heading,
            },
            push,
        )
    }

    #[test]
    fn test_stationary_vehicle_does_not_turn() {
        let params = Params::default();
        let mut body = at_origin(0.3, 0.0);
        body.integrate(
            Controls {
                steer: 1.0,
                throttle: 1.0,
            },
            &params,
        );
        assert_eq!(body.heading, 0.3);
        assert!(body.pos.x > 0.0);
    }

    #[test]
    fn test_friction_applied_after_force() {
        let params = Params::default();
        let mut body = at_origin(0.0, 2.0);
        body.integrate(
            Controls {
                steer: 0.0,
                throttle: 1.0,
            },
            &params,
        );
        // (2 + 0.5) * 0.95
        assert!((body.vel.x - 2.375).abs() < 1e-6);
        assert!((body.pos.x - 2.375).abs() < 1e-6);
    }

    #[test]
    fn test_speed_converges_to_terminal_velocity() {
        let params = Params::default();
        let mut body = at_origin(0.0, 0.0);
        for _ in 0..500 {
            body.integrate(
                Controls {
                    steer: 0.0,
                    throttle: 1.0,
                },
                &params,
            );
        }
        // v = (v + a) * f  =>  v* = a * f / (1 - f)
        let terminal = 0.5 * 0.95 / 0.05;
        assert!((body.speed() - terminal).abs() < 1e-2);
    }

    #[test]
    fn test_turn_rate_scales_with_speed() {
        let params = Params::default();
        let mut body = at_origin(0.0, 6.0);
        body.integrate(
            Controls {
                steer: 1.0,
                throttle: 0.2,
            },
            &params,
        );
        assert!((body.heading - 0.1 * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_controls_mapping() {
        let c = Controls::from_outputs(1.0, -0.7, 0.2);
        assert_eq!(c.steer, 1.0);
        assert_eq!(c.throttle, 0.2);
        let c = Controls::from_outputs(0.25, 0.6, 0.2);
        assert_eq!(c.steer, -0.5);
        assert_eq!(c.throttle, 0.6);
    }
}
