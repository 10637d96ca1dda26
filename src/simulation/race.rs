//! The simulation context: track, population and generation clock.
//!
//! Every tick steps all living vehicles in parallel against the shared,
//! immutable track and sensor index. When a tick leaves nobody alive the
//! population is replaced by the next generation before the following tick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use super::brain::{Brain, BrainLayout};
use super::commands::Command;
use super::error::{Result, SimError};
use super::evolution;
use super::fitness::DeathCause;
use super::history::{GenerationStats, History};
use super::params::Params;
use super::sensors::RayCaster;
use super::track::Track;
use super::vehicle::Vehicle;

/// What a call to [`Simulation::advance`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvanceReport {
    /// Ticks actually executed.
    pub ticks: usize,
    /// Generations that finished during the call, oldest first.
    pub finished: Vec<GenerationStats>,
    /// Set when the stop flag interrupted the call.
    pub stopped: bool,
}

/// Complete simulation state. There are no globals; hosts own one of these.
#[derive(Debug)]
pub struct Simulation {
    params: Params,
    track: Track,
    caster: RayCaster,
    population: Vec<Vehicle>,
    generation: u32,
    tick: u64,
    total_ticks: u64,
    running: bool,
    seed: u64,
    rng: StdRng,
    history: History,
    last_best: Option<f32>,
    stop: Arc<AtomicBool>,
}

impl Simulation {
    /// Creates a simulation on the default circuit.
    ///
    /// The clock starts paused; [`Command::Start`] lets [`Simulation::frame`]
    /// tick.
    ///
    /// # Errors
    ///
    /// Fails when `params` do not validate or the circuit cannot be built.
    pub fn new(params: Params) -> Result<Self> {
        params.validate()?;
        let track = Track::default_circuit(&params)?;
        Self::with_track(params, track)
    }

    /// Creates a simulation on a prebuilt track.
    pub fn with_track(params: Params, track: Track) -> Result<Self> {
        params.validate()?;

        let seed = params.seed.unwrap_or_else(|| rand::rng().random());
        let caster = RayCaster::new(&track, &params);

        let mut sim = Self {
            params,
            track,
            caster,
            population: Vec::new(),
            generation: 0,
            tick: 0,
            total_ticks: 0,
            running: false,
            seed,
            rng: StdRng::seed_from_u64(seed),
            history: History::default(),
            last_best: None,
            stop: Arc::new(AtomicBool::new(false)),
        };
        sim.spawn_population();

        info!(
            seed,
            population = sim.params.population_size,
            checkpoints = sim.track.checkpoints().len(),
            "simulation created"
        );
        Ok(sim)
    }

    fn spawn_population(&mut self) {
        let layout = BrainLayout::new(self.params.brain_inputs(), self.params.hidden_size);
        let start = self.track.start();
        self.population = (0..self.params.population_size)
            .map(|id| {
                let brain = Brain::new_random(layout, self.params.weight_scale, &mut self.rng);
                Vehicle::new(id, brain, self.generation, start, &self.params)
            })
            .collect();
    }

    /// Current parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Track geometry.
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Ray caster shared by all vehicles, also used to draw sensor rays.
    pub fn caster(&self) -> &RayCaster {
        &self.caster
    }

    /// Vehicles of the current generation, alive and dead.
    pub fn population(&self) -> &[Vehicle] {
        &self.population
    }

    /// Current generation index, starting at zero.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Ticks elapsed in the current generation.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Ticks elapsed since creation or the last reset.
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Checks if [`Simulation::frame`] advances the clock.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seed the random number generator was initialized with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Recent generation summaries.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Number of vehicles still racing.
    pub fn alive_count(&self) -> usize {
        self.population.iter().filter(|v| v.is_alive()).count()
    }

    /// Vehicle with the highest current fitness; the lowest id wins ties.
    pub fn best_vehicle(&self) -> Option<&Vehicle> {
        self.population
            .iter()
            .reduce(|best, v| if v.fitness() > best.fitness() { v } else { best })
    }

    /// Best fitness of the previous generation.
    pub fn best_of_last_generation(&self) -> Option<f32> {
        self.last_best
    }

    /// Handle that stops [`Simulation::advance`] before its next tick.
    ///
    /// Setting the flag also pauses the simulation; the flag is cleared once
    /// honoured.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Resumes ticking.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stops ticking in [`Simulation::frame`].
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Replaces the population with fresh random brains and forgets history.
    pub fn reset(&mut self) {
        self.generation = 0;
        self.tick = 0;
        self.total_ticks = 0;
        self.history.clear();
        self.last_best = None;
        self.spawn_population();
        info!(population = self.population.len(), "simulation reset");
    }

    fn update_params(&mut self, change: impl FnOnce(&mut Params)) -> Result<()> {
        let mut params = self.params.clone();
        change(&mut params);
        params.validate()?;
        self.params = params;
        Ok(())
    }

    /// Changes the population size and resets.
    ///
    /// # Errors
    ///
    /// [`SimError::EmptyPopulation`] for sizes below two.
    pub fn set_population_size(&mut self, size: usize) -> Result<()> {
        if size < 2 {
            return Err(SimError::EmptyPopulation { size });
        }
        self.update_params(|p| p.population_size = size)?;
        self.reset();
        Ok(())
    }

    /// Changes the per-gene mutation probability used by the next reproduction.
    pub fn set_mutation_rate(&mut self, rate: f32) -> Result<()> {
        self.update_params(|p| p.mutation_rate = rate)?;
        debug!(rate, "mutation rate changed");
        Ok(())
    }

    /// Changes the crossover probability used by the next reproduction.
    pub fn set_crossover_rate(&mut self, rate: f32) -> Result<()> {
        self.update_params(|p| p.crossover_rate = rate)?;
        debug!(rate, "crossover rate changed");
        Ok(())
    }

    /// Changes how many ticks [`Simulation::frame`] executes.
    pub fn set_ticks_per_frame(&mut self, ticks: usize) -> Result<()> {
        self.update_params(|p| p.ticks_per_frame = ticks)
    }

    /// Applies a host command. Rejected commands leave the state unchanged.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Reset => self.reset(),
            Command::SetPopulationSize(size) => self.set_population_size(size)?,
            Command::SetMutationRate(rate) => self.set_mutation_rate(rate)?,
            Command::SetCrossoverRate(rate) => self.set_crossover_rate(rate)?,
            Command::SetTicksPerFrame(ticks) => self.set_ticks_per_frame(ticks)?,
        }
        Ok(())
    }

    /// Executes one tick.
    ///
    /// Returns the summary of the generation when this tick ended it.
    pub fn step(&mut self) -> Result<Option<GenerationStats>> {
        let track = &self.track;
        let caster = &self.caster;
        let params = &self.params;
        self.population
            .par_iter_mut()
            .for_each(|vehicle| vehicle.step(track, caster, params));

        self.tick += 1;
        self.total_ticks += 1;

        let limit = self.params.generation_tick_limit as u64;
        if limit > 0 && self.tick >= limit {
            for vehicle in self.population.iter_mut() {
                vehicle.kill(DeathCause::GenerationLimit);
            }
        }

        if self.alive_count() > 0 {
            return Ok(None);
        }
        self.evolve().map(Some)
    }

    /// Executes up to `ticks` ticks, stopping early when the stop flag is set.
    pub fn advance(&mut self, ticks: usize) -> Result<AdvanceReport> {
        let mut report = AdvanceReport::default();
        for _ in 0..ticks {
            if self.stop.swap(false, Ordering::SeqCst) {
                self.running = false;
                report.stopped = true;
                debug!(tick = self.tick, "stop requested");
                break;
            }
            if let Some(stats) = self.step()? {
                report.finished.push(stats);
            }
            report.ticks += 1;
        }
        Ok(report)
    }

    /// Advances by the configured ticks per frame while running.
    pub fn frame(&mut self) -> Result<AdvanceReport> {
        if !self.running {
            return Ok(AdvanceReport::default());
        }
        self.advance(self.params.ticks_per_frame)
    }

    /// Ticks until the current generation ends and returns its summary.
    ///
    /// With `generation_tick_limit` set to zero this only returns once every
    /// vehicle has died on its own.
    pub fn run_generation(&mut self) -> Result<GenerationStats> {
        loop {
            if let Some(stats) = self.step()? {
                return Ok(stats);
            }
        }
    }

    fn evolve(&mut self) -> Result<GenerationStats> {
        let stats = GenerationStats::from_population(self.generation, self.tick, &self.population)
            .ok_or(SimError::EmptyPopulation { size: 0 })?;

        info!(
            generation = stats.generation,
            best = stats.best_fitness,
            mean = stats.mean_fitness,
            checkpoints = stats.best_checkpoints,
            ticks = stats.ticks,
            collisions = stats.collisions,
            "generation finished"
        );

        self.population = evolution::next_generation(
            &mut self.population,
            self.generation,
            self.track.start(),
            &self.params,
            &mut self.rng,
        )?;
        self.generation += 1;
        self.tick = 0;
        self.last_best = Some(stats.best_fitness);
        self.history.record(stats.clone());

        Ok(stats)
    }
}
