//! Core game logic - pure, deterministic, and testable
//!
//! Everything that decides what happens on the field lives here: the grid,
//! pieces and their movement rules, line clearing, piece spawning and the
//! wide-mode pair logic. Nothing in this crate renders, reads input or keeps
//! wall-clock time; hosts feed commands and elapsed milliseconds in and read
//! events and snapshots out.
//!
//! # Module Structure
//!
//! - [`grid`]: occupancy field with a hidden buffer above the visible rows
//! - [`piece`]: archetype shapes and the falling [`Piece`]
//! - [`movement`]: legality of moves and rotations, settling, side-teleport
//! - [`dual`]: the wide-mode primary/clone pair
//! - [`line_clear`]: clear-unit detection and row compaction
//! - [`randomizer`] and [`spawner`]: weighted archetype choice and placement
//! - [`game_state`]: one session tying the above together
//!
//! # Modes
//!
//! - **Narrow**: 10 columns, solid side walls, single rows clear, 7 archetypes
//! - **Wide**: 12 columns, every piece has a clone one field-width to its left
//!   and pieces wrap around the sides; rows clear in pairs, 10 archetypes
//!
//! # Example
//!
//! ```
//! use dualfall_core::{GameConfig, GameState};
//! use dualfall_core::types::{Command, GameEvent};
//!
//! let mut game = GameState::new(GameConfig::wide().with_seed(12345)).unwrap();
//! assert!(matches!(game.drain_events()[..], [GameEvent::PieceSpawned(_)]));
//!
//! game.apply(Command::MoveLeft);
//! game.apply(Command::Rotate);
//!
//! // Commands run first, then 700 ms of gravity moves the pair down one row
//! game.tick(700, false, &[Command::MoveRight]);
//! assert!(game.active().unwrap().is_linked());
//! ```
//!
//! # Timing
//!
//! Hosts call [`GameState::tick`] with the elapsed time, usually in fixed
//! 16 ms steps. Gravity fires every `drop_time_ms`; while soft drop is held an
//! extra fall fires every `extra_drop_time_ms`.

pub mod config;
pub mod dual;
pub mod error;
pub mod events;
pub mod game_state;
pub mod grid;
pub mod line_clear;
pub mod movement;
pub mod piece;
pub mod randomizer;
pub mod snapshot;
pub mod spawner;

pub use dualfall_types as types;

// Re-export commonly used types for convenience
pub use config::GameConfig;
pub use dual::{DualModeCoordinator, PiecePair};
pub use error::{CoreError, Result};
pub use events::EventQueue;
pub use game_state::GameState;
pub use grid::{Boundary, GridField};
pub use line_clear::LineClearEngine;
pub use movement::{MovementValidator, Transform, Verdict};
pub use piece::{Displacement, GridPos, Piece, PieceRole};
pub use randomizer::ProbabilityTable;
pub use snapshot::{ActiveSnapshot, GameSnapshot};
pub use spawner::PieceSpawner;
