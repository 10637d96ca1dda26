use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::fitness::DeathCause;
use super::vehicle::Vehicle;

/// Summary of one finished generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation index the summary belongs to.
    pub generation: u32,
    /// Highest fitness reached.
    pub best_fitness: f32,
    /// Mean fitness over the whole population.
    pub mean_fitness: f32,
    /// Checkpoints captured by the best vehicle.
    pub best_checkpoints: usize,
    /// Ticks the generation ran for.
    pub ticks: u64,
    /// Vehicles that hit a wall.
    pub collisions: usize,
    /// Vehicles that crawled too slowly.
    pub stagnations: usize,
    /// Vehicles that ran out of time between checkpoints.
    pub timeouts: usize,
    /// Vehicles stopped by the generation tick limit.
    pub limits: usize,
}

impl GenerationStats {
    /// Summarizes a finished population. Returns `None` for an empty one.
    pub fn from_population(generation: u32, ticks: u64, population: &[Vehicle]) -> Option<Self> {
        let best = population
            .iter()
            .reduce(|best, v| if v.fitness() > best.fitness() { v } else { best })?;

        let mean_fitness =
            population.iter().map(Vehicle::fitness).sum::<f32>() / population.len() as f32;
        let count = |cause: DeathCause| {
            population
                .iter()
                .filter(|v| v.death == Some(cause))
                .count()
        };

        Some(Self {
            generation,
            best_fitness: best.fitness(),
            mean_fitness,
            best_checkpoints: best.checkpoint_index(),
            ticks,
            collisions: count(DeathCause::Collision),
            stagnations: count(DeathCause::Stagnation),
            timeouts: count(DeathCause::Timeout),
            limits: count(DeathCause::GenerationLimit),
        })
    }
}

/// Bounded record of recent generations, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    /// Recorded generations.
    pub entries: VecDeque<GenerationStats>,
    /// Maximum number of generations kept.
    pub max_history: usize,
}

impl Default for History {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
            max_history: 500,
        }
    }
}

impl History {
    /// Appends a generation, dropping the oldest once full.
    pub fn record(&mut self, stats: GenerationStats) {
        self.entries.push_back(stats);
        if self.entries.len() > self.max_history {
            self.entries.pop_front();
        }
    }

    /// Most recent generation, if any finished yet.
    pub fn latest(&self) -> Option<&GenerationStats> {
        self.entries.back()
    }

    /// Best fitness ever recorded in the kept window.
    pub fn best_fitness(&self) -> Option<f32> {
        self.entries
            .iter()
            .map(|s| s.best_fitness)
            .reduce(f32::max)
    }

    /// `(generation, best_fitness)` pairs for plotting.
    pub fn best_fitness_series(&self) -> Vec<[f64; 2]> {
        self.entries
            .iter()
            .map(|s| [s.generation as f64, s.best_fitness as f64])
            .collect()
    }

    /// `(generation, mean_fitness)` pairs for plotting.
    pub fn mean_fitness_series(&self) -> Vec<[f64; 2]> {
        self.entries
            .iter()
            .map(|s| [s.generation as f64, s.mean_fitness as f64])
            .collect()
    }

    /// Number of recorded generations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if nothing was recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets every recorded generation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
