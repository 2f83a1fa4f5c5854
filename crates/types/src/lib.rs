//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behavior beyond parsing and small lookups,
//! making them usable from the simulation core, a host loop, or a renderer.
//!
//! # Coordinates
//!
//! The grid is addressed as `(row, col)`. Row 0 is the floor and rows grow
//! upward; the top `DEFAULT_HIDDEN_ROWS` rows sit above the visible play area and are
//! where new pieces appear.
//!
//! # Field Dimensions
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_HEIGHT` | 20 | Visible rows |
//! | `DEFAULT_HIDDEN_ROWS` | 4 | Buffer rows above the visible area |
//! | `NARROW_WIDTH` | 10 | Columns in narrow mode |
//! | `WIDE_WIDTH` | 12 | Columns in wide mode |
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep of the host loop (~60 FPS) |
//! | `DEFAULT_DROP_MS` | 700 | Gravity interval |
//! | `DEFAULT_EXTRA_DROP_MS` | 100 | Soft-drop interval while held |
//!
//! # Examples
//!
//! ```
//! use dualfall_types::{Mode, PieceKind, Rotation};
//!
//! assert_eq!(PieceKind::from_index(6), Some(PieceKind::T));
//! assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
//!
//! assert_eq!(Mode::Narrow.clear_unit(), 1);
//! assert_eq!(Mode::Wide.clear_unit(), 2);
//! ```

use serde::{Deserialize, Serialize};

/// Visible rows of the play field
pub const DEFAULT_HEIGHT: u16 = 20;

/// Rows kept above the visible area for spawning and overflow detection
pub const DEFAULT_HIDDEN_ROWS: u16 = 4;

/// Field width in narrow mode
pub const NARROW_WIDTH: u16 = 10;

/// Field width in wide mode
pub const WIDE_WIDTH: u16 = 12;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval (one row every 700ms)
pub const DEFAULT_DROP_MS: u32 = 700;

/// Accelerated fall interval while soft drop is held
pub const DEFAULT_EXTRA_DROP_MS: u32 = 100;

/// Allowed deviation of a probability table sum from 1
pub const PROBABILITY_EPSILON: f64 = 1e-6;

/// Spawn weights for the seven narrow-mode archetypes, in `PieceKind::ALL` order
pub const NARROW_PROBABILITIES: [f64; 7] = [0.1, 0.15, 0.15, 0.15, 0.15, 0.1, 0.2];

/// Spawn weights for the ten wide-mode archetypes, in `PieceKind::ALL` order.
///
/// The T archetype drops to its alternate weight (0.05) so the extra three
/// archetypes fit in the distribution.
pub const WIDE_PROBABILITIES: [f64; 10] = [0.1, 0.15, 0.15, 0.15, 0.15, 0.1, 0.05, 0.05, 0.05, 0.05];

/// Game mode
///
/// - **Narrow**: a single field, seven archetypes, a single full row clears
/// - **Wide**: a doubled field where every piece has a clone one field-width to
///   the left, ten archetypes, two consecutive full rows clear together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Narrow,
    Wide,
}

impl Mode {
    /// Number of consecutive full rows required to trigger a clear
    pub fn clear_unit(&self) -> usize {
        match self {
            Mode::Narrow => 1,
            Mode::Wide => 2,
        }
    }

    /// Number of piece archetypes available in this mode
    pub fn archetype_count(&self) -> usize {
        match self {
            Mode::Narrow => 7,
            Mode::Wide => 10,
        }
    }

    /// Default field width for this mode
    pub fn default_width(&self) -> u16 {
        match self {
            Mode::Narrow => NARROW_WIDTH,
            Mode::Wide => WIDE_WIDTH,
        }
    }

    /// Default spawn weights for this mode
    pub fn default_probabilities(&self) -> &'static [f64] {
        match self {
            Mode::Narrow => &NARROW_PROBABILITIES,
            Mode::Wide => &WIDE_PROBABILITIES,
        }
    }

    /// Parse mode from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "narrow" => Some(Mode::Narrow),
            "wide" => Some(Mode::Wide),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Narrow => "narrow",
            Mode::Wide => "wide",
        }
    }
}

/// Piece archetypes
///
/// The first seven are the classic tetrominoes used by both modes. The last
/// three only appear in wide mode:
/// - **I3**: straight three-block bar
/// - **V**: three-block corner
/// - **D**: two-block domino
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    S,
    Z,
    J,
    L,
    T,
    I3,
    V,
    D,
}

impl PieceKind {
    /// Every archetype, indexed the same way as the probability tables
    pub const ALL: [PieceKind; 10] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
        PieceKind::I3,
        PieceKind::V,
        PieceKind::D,
    ];

    /// Archetype for a probability-table index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::T => "t",
            PieceKind::I3 => "i3",
            PieceKind::V => "v",
            PieceKind::D => "d",
        }
    }
}

/// Rotation states, in quarter turns
///
/// - **North**: Spawn orientation (0°)
/// - **West**: Rotated 90° counter-clockwise
/// - **South**: Rotated 180°
/// - **East**: Rotated 270° counter-clockwise (90° clockwise)
///
/// Positive angles are counter-clockwise in the y-up grid, so the `Rotate`
/// command walks North → West → South → East → North.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// All rotations in command order, starting from spawn orientation
    pub const ALL: [Rotation; 4] = [Rotation::North, Rotation::West, Rotation::South, Rotation::East];

    /// Rotate counter-clockwise (+90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use dualfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::West.rotate_ccw(), Rotation::South);
    /// assert_eq!(Rotation::South.rotate_ccw(), Rotation::East);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Number of counter-clockwise quarter turns from North
    pub fn quarter_turns(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::West => 1,
            Rotation::South => 2,
            Rotation::East => 3,
        }
    }
}

/// Commands accepted by the simulation
///
/// Input commands are pushed once per discrete input edge. `SoftDropTick` and
/// `GravityTick` are normally produced by the session's own timers, but a host
/// may push them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Rotate piece by +90°
    Rotate,
    /// Accelerated fall step while soft drop is held
    SoftDropTick,
    /// Periodic fall step
    GravityTick,
}

/// Events raised by the simulation, delivered in FIFO order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A new piece entered the hidden buffer
    PieceSpawned(PieceKind),
    /// The active piece (or pair) settled and its blocks were committed
    PieceDropped,
    /// The row at this index was removed; blocks resting on it disappear
    LineDestroyed(i32),
    /// Rows above this index moved down by one
    LinesShifted(i32),
    /// Score changed by this delta
    ScoreChanged(u32),
    /// The hidden buffer overflowed; no more pieces spawn
    GameOver,
}

impl GameEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameEvent::PieceSpawned(_) => "pieceSpawned",
            GameEvent::PieceDropped => "pieceDropped",
            GameEvent::LineDestroyed(_) => "lineDestroyed",
            GameEvent::LinesShifted(_) => "linesShifted",
            GameEvent::ScoreChanged(_) => "scoreChanged",
            GameEvent::GameOver => "gameOver",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_probability_tables_sum_to_one() {
        let narrow: f64 = NARROW_PROBABILITIES.iter().sum();
        let wide: f64 = WIDE_PROBABILITIES.iter().sum();
        assert!((narrow - 1.0).abs() <= PROBABILITY_EPSILON);
        assert!((wide - 1.0).abs() <= PROBABILITY_EPSILON);
    }

    #[test]
    fn mode_tables_match_archetype_counts() {
        for mode in [Mode::Narrow, Mode::Wide] {
            assert_eq!(mode.default_probabilities().len(), mode.archetype_count());
            assert!(mode.archetype_count() <= PieceKind::ALL.len());
        }
    }

    #[test]
    fn piece_kind_index_roundtrip() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(PieceKind::from_index(i), Some(*kind));
        }
        assert_eq!(PieceKind::from_index(10), None);
    }

    #[test]
    fn rotation_quarter_turns_follow_ccw_order() {
        let mut r = Rotation::North;
        for expected in 0..4 {
            assert_eq!(r.quarter_turns(), expected);
            r = r.rotate_ccw();
        }
        assert_eq!(r, Rotation::North);
    }

    #[test]
    fn mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Wide).unwrap(), "\"wide\"");
        let m: Mode = serde_json::from_str("\"narrow\"").unwrap();
        assert_eq!(m, Mode::Narrow);
    }
}
