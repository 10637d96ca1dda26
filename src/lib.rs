//! # Evo Racer - Neuroevolution on a Race Track
//!
//! A population of cars, each driven by its own small neural network, learns
//! to drive around a closed circuit. Cars that crash, crawl or stop making
//! progress are retired; once a whole generation is gone the best brains are
//! bred into the next one with a genetic algorithm.
//!
//! ## Features
//!
//! - Catmull-Rom track geometry with checkpoints
//! - Ray-cast wall sensors backed by a k-d tree
//! - Feed-forward brains (one tanh hidden layer)
//! - Elitism, single-point crossover and per-gene mutation
//! - Parallel, deterministic per-tick updates with rayon
//! - Real-time visualization with egui/macroquad and a headless runner
//!
//! ## Core Modules
//!
//! - [`simulation::track`] - Track geometry
//! - [`simulation::sensors`] - Ray casting
//! - [`simulation::vehicle`] - Vehicle lifecycle
//! - [`simulation::evolution`] - Genetic algorithm
//! - [`simulation::race`] - The simulation context and clock

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural network controller for vehicles.
    pub mod brain;
    /// Host commands applied between frames.
    pub mod commands;
    /// Error type shared by the simulation.
    pub mod error;
    /// Generational genetic algorithm.
    pub mod evolution;
    /// Checkpoint progress, fitness and death conditions.
    pub mod fitness;
    /// Geometric utility functions for splines, normals and intersections.
    pub mod geometric_utils;
    /// Per-generation summaries.
    pub mod history;
    /// Simulation parameters.
    pub mod params;
    /// Vehicle kinematics.
    pub mod physics;
    /// Simulation context and generation clock.
    pub mod race;
    /// Ray-cast wall sensors.
    pub mod sensors;
    /// Track geometry built from control points.
    pub mod track;
    /// Vehicle state and per-tick update.
    pub mod vehicle;
}

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `default_level`.
///
/// Only binaries call this; the library itself never installs a subscriber.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // a second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
