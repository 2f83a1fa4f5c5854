//! Session configuration
//!
//! The settings collaborator owns these values; the core only reads them once
//! when a session starts. Configs deserialize from camelCase JSON with every
//! field optional:
//!
//! ```
//! use dualfall_core::GameConfig;
//! use dualfall_core::types::Mode;
//!
//! let config = GameConfig::from_json_str(r#"{ "mode": "wide", "seed": 7 }"#).unwrap();
//! assert_eq!(config.mode, Mode::Wide);
//! assert_eq!(config.field_width(), 12);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::randomizer::ProbabilityTable;
use crate::types::{Mode, DEFAULT_DROP_MS, DEFAULT_EXTRA_DROP_MS, DEFAULT_HEIGHT, DEFAULT_HIDDEN_ROWS};

/// Smallest width that fits every archetype at the spawn column
pub const MIN_WIDTH: u16 = 5;

/// Smallest visible height
pub const MIN_HEIGHT: u16 = 4;

/// Hidden rows needed to hold a freshly spawned piece in any rotation
pub const MIN_HIDDEN_ROWS: u16 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub mode: Mode,
    /// Columns; the mode's default when absent
    pub width: Option<u16>,
    /// Visible rows
    pub height: u16,
    pub hidden_rows: u16,
    /// Gravity interval in milliseconds
    pub drop_time_ms: u32,
    /// Soft-drop interval in milliseconds
    pub extra_drop_time_ms: u32,
    /// One weight per archetype; the mode's default table when absent
    pub probabilities: Option<Vec<f64>>,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Narrow,
            width: None,
            height: DEFAULT_HEIGHT,
            hidden_rows: DEFAULT_HIDDEN_ROWS,
            drop_time_ms: DEFAULT_DROP_MS,
            extra_drop_time_ms: DEFAULT_EXTRA_DROP_MS,
            probabilities: None,
            seed: 1,
        }
    }
}

impl GameConfig {
    /// Default config for a mode
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn narrow() -> Self {
        Self::for_mode(Mode::Narrow)
    }

    pub fn wide() -> Self {
        Self::for_mode(Mode::Wide)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn field_width(&self) -> u16 {
        self.width.unwrap_or_else(|| self.mode.default_width())
    }

    pub fn probabilities(&self) -> &[f64] {
        match &self.probabilities {
            Some(p) => p,
            None => self.mode.default_probabilities(),
        }
    }

    /// Check every value and build the probability table
    pub fn validate(&self) -> Result<ProbabilityTable> {
        check_min("width", self.field_width(), MIN_WIDTH)?;
        check_min("height", self.height, MIN_HEIGHT)?;
        check_min("hiddenRows", self.hidden_rows, MIN_HIDDEN_ROWS)?;

        if self.drop_time_ms == 0 {
            return Err(CoreError::ZeroInterval { name: "dropTimeMs" });
        }
        if self.extra_drop_time_ms == 0 {
            return Err(CoreError::ZeroInterval {
                name: "extraDropTimeMs",
            });
        }

        let weights = self.probabilities();
        if weights.len() != self.mode.archetype_count() {
            return Err(CoreError::ArchetypeCount {
                mode: self.mode.as_str(),
                expected: self.mode.archetype_count(),
                actual: weights.len(),
            });
        }
        ProbabilityTable::new(weights)
    }
}

fn check_min(dimension: &'static str, actual: u16, min: u16) -> Result<()> {
    if actual < min {
        return Err(CoreError::FieldTooSmall {
            dimension,
            min,
            actual,
        });
    }
    Ok(())
}
