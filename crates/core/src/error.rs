//! Error types for the simulation core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that prevent a session from being constructed.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The probability table has no entries.
    #[error("probability table is empty")]
    EmptyProbabilities,

    /// A weight is negative, NaN or infinite.
    #[error("probability at index {index} is invalid: {value}")]
    InvalidProbability {
        /// Position of the offending weight.
        index: usize,
        /// The rejected value.
        value: f64,
    },

    /// The weights do not sum to 1 within the allowed epsilon.
    #[error("the sum of the probabilities is not equal to one (got {sum})")]
    ProbabilitySum {
        /// Actual sum of the weights.
        sum: f64,
    },

    /// The table length differs from the number of archetypes of the mode.
    #[error("mode {mode} expects {expected} probabilities, got {actual}")]
    ArchetypeCount {
        /// Mode name.
        mode: &'static str,
        /// Archetypes available in the mode.
        expected: usize,
        /// Weights supplied.
        actual: usize,
    },

    /// A field dimension is below the minimum the piece set needs.
    #[error("{dimension} must be at least {min}, got {actual}")]
    FieldTooSmall {
        /// Which dimension was rejected.
        dimension: &'static str,
        /// Minimum accepted value.
        min: u16,
        /// Supplied value.
        actual: u16,
    },

    /// A timer interval of zero would fire every tick forever.
    #[error("{name} must be greater than zero")]
    ZeroInterval {
        /// Which interval was rejected.
        name: &'static str,
    },

    /// The config file could not be read.
    #[error("failed to read config {}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config text is not valid JSON for [`GameConfig`](crate::GameConfig).
    #[error("failed to parse config")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
