use serde::{Deserialize, Serialize};

use super::error::{Result, SimError};

/// Simulation parameters that control track, vehicle, brain and evolution behavior.
///
/// Every field has a default, so a TOML file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Time credited to a vehicle's age per tick.
    pub dt: f32,

    /// Samples generated per control-point segment of the spline.
    pub spline_steps: usize,
    /// Distance from the centerline to each wall.
    pub track_half_width: f32,
    /// Every Nth centerline point becomes a checkpoint.
    pub checkpoint_stride: usize,

    /// Number of sensor rays (odd, at least 3).
    pub num_rays: usize,
    /// Total angle covered by the sensor fan in radians.
    pub fov: f32,
    /// Length of each sensor ray.
    pub sensor_range: f32,

    /// Vehicle body length (presentation and footprint only).
    pub vehicle_length: f32,
    /// Vehicle body width (presentation and footprint only).
    pub vehicle_width: f32,
    /// Speed at which steering reaches full authority.
    pub max_speed: f32,
    /// Heading change per tick at full steer and full authority.
    pub turn_gain: f32,
    /// Velocity added per tick at full throttle.
    pub acceleration: f32,
    /// Velocity multiplier applied every tick.
    pub friction: f32,
    /// Lowest throttle the controller can command.
    pub min_throttle: f32,
    /// Initial forward speed given to freshly spawned vehicles.
    pub spawn_push: f32,

    /// Distance at which the next checkpoint counts as captured.
    pub checkpoint_radius: f32,
    /// Distance that maps the in-between progress term to zero.
    pub fitness_distance_norm: f32,
    /// Sensor reading below which the vehicle counts as crashed.
    pub collision_threshold: f32,
    /// Age after which slow vehicles die.
    pub slow_timeout: f32,
    /// Speed below which a vehicle counts as crawling.
    pub min_speed: f32,
    /// Age after which any vehicle dies without checkpoint progress.
    pub hard_timeout: f32,

    /// Width of the hidden layer.
    pub hidden_size: usize,
    /// Initial genes are drawn uniformly from `[-weight_scale, weight_scale]`.
    pub weight_scale: f32,

    /// Vehicles per generation.
    pub population_size: usize,
    /// Top performers copied unchanged into the next generation.
    pub elite_count: usize,
    /// Per-gene mutation probability.
    pub mutation_rate: f32,
    /// Mutation offsets are drawn uniformly from `[-mutation_scale, mutation_scale]`.
    pub mutation_scale: f32,
    /// Probability that a child is a crossover rather than a copy of one parent.
    pub crossover_rate: f32,

    /// Ticks after which any survivors are stopped and the generation ends.
    /// Zero disables the limit.
    pub generation_tick_limit: usize,

    /// Ticks executed per rendered frame.
    pub ticks_per_frame: usize,
    /// Seed for reproducible runs; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            dt: 0.5,
            spline_steps: 50,
            track_half_width: 45.0,
            checkpoint_stride: 30,
            num_rays: 9,
            fov: std::f32::consts::PI * 4.0 / 3.0,
            sensor_range: 180.0,
            vehicle_length: 40.0,
            vehicle_width: 20.0,
            max_speed: 12.0,
            turn_gain: 0.1,
            acceleration: 0.5,
            friction: 0.95,
            min_throttle: 0.2,
            spawn_push: 2.0,
            checkpoint_radius: 40.0,
            fitness_distance_norm: 200.0,
            collision_threshold: 0.05,
            slow_timeout: 20.0,
            min_speed: 1.5,
            hard_timeout: 100.0,
            hidden_size: 12,
            weight_scale: 2.0,
            population_size: 50,
            elite_count: 2,
            mutation_rate: 0.1,
            mutation_scale: 2.0,
            crossover_rate: 1.0,
            generation_tick_limit: 10_000,
            ticks_per_frame: 1,
            seed: None,
        }
    }
}

impl Params {
    /// Parses parameters from TOML and validates them.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let params: Self = toml::from_str(source)?;
        params.validate()?;
        Ok(params)
    }

    /// Number of brain inputs: one per ray plus fed-back throttle and steer.
    pub fn brain_inputs(&self) -> usize {
        self.num_rays + 2
    }

    /// Checks that every parameter lies in its usable range.
    pub fn validate(&self) -> Result<()> {
        if self.num_rays < 3 || self.num_rays % 2 == 0 {
            return Err(SimError::invalid_config(format!(
                "num_rays must be odd and at least 3, got {}",
                self.num_rays
            )));
        }
        if !(self.fov > std::f32::consts::PI && self.fov < std::f32::consts::TAU) {
            return Err(SimError::invalid_config(format!(
                "fov must be wider than a semicircle and narrower than a full turn, got {}",
                self.fov
            )));
        }
        let positive = [
            ("dt", self.dt),
            ("track_half_width", self.track_half_width),
            ("sensor_range", self.sensor_range),
            ("max_speed", self.max_speed),
            ("checkpoint_radius", self.checkpoint_radius),
            ("fitness_distance_norm", self.fitness_distance_norm),
            ("weight_scale", self.weight_scale),
            ("mutation_scale", self.mutation_scale),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::invalid_config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let unit = [
            ("friction", self.friction),
            ("min_throttle", self.min_throttle),
            ("collision_threshold", self.collision_threshold),
            ("mutation_rate", self.mutation_rate),
            ("crossover_rate", self.crossover_rate),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::invalid_config(format!(
                    "{name} must lie in [0, 1], got {value}"
                )));
            }
        }
        if self.spline_steps == 0 || self.checkpoint_stride == 0 || self.hidden_size == 0 {
            return Err(SimError::invalid_config(
                "spline_steps, checkpoint_stride and hidden_size must be non-zero",
            ));
        }
        if self.population_size < 2 {
            return Err(SimError::EmptyPopulation {
                size: self.population_size,
            });
        }
        if self.elite_count > self.population_size {
            return Err(SimError::invalid_config(format!(
                "elite_count {} exceeds population_size {}",
                self.elite_count, self.population_size
            )));
        }
        if self.ticks_per_frame == 0 {
            return Err(SimError::invalid_config("ticks_per_frame must be at least 1"));
        }
        Ok(())
    }
}
