//! Vehicle state and the per-tick sense → think → move → score cycle.

use ndarray::Array1;

use super::brain::{Activations, Brain};
use super::fitness::{DeathCause, Progress, death_cause};
use super::params::Params;
use super::physics::{Controls, Kinematics};
use super::sensors::RayCaster;
use super::track::{StartPose, Track};

/// A simulated race car driven by its own brain.
///
/// A vehicle lives for exactly one generation. Once dead it keeps its final
/// pose, sensors and fitness for ranking but is never stepped again.
#[derive(Debug, Clone)]
pub struct Vehicle {
    /// Index within its generation.
    pub id: usize,
    /// Generation the vehicle was born into.
    pub generation: u32,
    /// Position, velocity and heading.
    pub body: Kinematics,
    /// Controls chosen on the previous tick, fed back as brain inputs.
    pub controls: Controls,
    /// Checkpoint progress and fitness.
    pub progress: Progress,
    /// Normalized wall distances from the last tick, leftmost ray first.
    pub sensors: Vec<f32>,
    /// Exclusively owned controller.
    pub brain: Brain,
    /// Last forward pass, for display only.
    pub last_activations: Option<Activations>,
    /// Set once, when the vehicle dies.
    pub death: Option<DeathCause>,
}

impl Vehicle {
    /// Spawns a vehicle at `start` with a small forward push.
    pub fn new(
        id: usize,
        brain: Brain,
        generation: u32,
        start: StartPose,
        params: &Params,
    ) -> Self {
        Self {
            id,
            generation,
            body: Kinematics::spawn(start, params.spawn_push),
            controls: Controls::default(),
            progress: Progress::default(),
            sensors: Vec::new(),
            brain,
            last_activations: None,
            death: None,
        }
    }

    /// Checks if the vehicle is still racing.
    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    /// Current fitness score.
    pub fn fitness(&self) -> f32 {
        self.progress.fitness
    }

    /// Checkpoints captured so far.
    pub fn checkpoint_index(&self) -> usize {
        self.progress.checkpoint_index
    }

    /// Stops the vehicle for good. The first recorded cause wins.
    pub fn kill(&mut self, cause: DeathCause) {
        if self.death.is_none() {
            self.death = Some(cause);
        }
    }

    /// Brain inputs: sensor readings followed by last throttle and steer.
    fn brain_inputs(&self) -> Array1<f32> {
        self.sensors
            .iter()
            .copied()
            .chain([self.controls.throttle, self.controls.steer])
            .collect()
    }

    /// Advances the vehicle by one tick. Dead vehicles are left untouched.
    pub fn step(&mut self, track: &Track, caster: &RayCaster, params: &Params) {
        if !self.is_alive() {
            return;
        }

        self.progress.age_by(params.dt);

        self.sensors = caster.sense(self.body.pos, self.body.heading);

        let trace = self.brain.predict_traced(self.brain_inputs());
        self.controls =
            Controls::from_outputs(trace.outputs[0], trace.outputs[1], params.min_throttle);
        self.last_activations = Some(trace);

        self.body.integrate(self.controls, params);

        self.progress.update(self.body.pos, track, params);

        let speed = self.body.speed();
        if let Some(cause) = death_cause(&self.sensors, self.progress.age, speed, params) {
            self.kill(cause);
        }
    }
}
