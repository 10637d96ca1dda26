//! Error types for track construction, brain assembly and evolution.

use thiserror::Error;

/// Errors raised by the simulation core.
///
/// All of these surface at construction or configuration time. A running
/// simulation never fails for in-range states.
#[derive(Error, Debug)]
pub enum SimError {
    /// Two consecutive centerline points coincide (or are not finite), so no
    /// edge normal exists.
    #[error("Degenerate track geometry at centerline index {index}")]
    DegenerateGeometry {
        /// Index of the edge start point in the centerline.
        index: usize,
    },

    /// A closed spline needs at least four control points.
    #[error("Track needs at least 4 control points, got {0}")]
    TooFewControlPoints(usize),

    /// A brain was assembled from a genome of the wrong length.
    #[error("Invalid genome length: expected {expected}, got {actual}")]
    InvalidGenomeLength {
        /// Length required by the brain layout.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// Selection needs at least two vehicles.
    #[error("Population of {size} is too small to evolve (need at least 2)")]
    EmptyPopulation {
        /// Size of the offending population.
        size: usize,
    },

    /// A parameter is outside its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A parameter file could not be parsed.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type alias for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new invalid configuration error.
    #[must_use]
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
