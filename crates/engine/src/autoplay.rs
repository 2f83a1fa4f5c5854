//! Random autoplayer for headless runs and soak tests
//!
//! Picks a random rotation and pivot column for every new piece from its own
//! seeded generator, so a session seed plus an autoplayer seed replays the
//! same game.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use dualfall_core::piece::rotates;
use dualfall_core::GameState;
use dualfall_types::{Command, Mode, Rotation};

use crate::place::{apply_place, PlaceError};

/// Random targets tried by [`Autoplayer::place`] before dropping in place
const PLACE_ATTEMPTS: usize = 4;

/// Where the autoplayer wants the active piece to land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub col: i32,
    pub rotation: Rotation,
}

#[derive(Debug, Clone)]
pub struct Autoplayer {
    rng: Pcg32,
    target: Option<Target>,
    /// `pieces_spawned` of the session when `target` was chosen
    piece: u32,
}

impl Autoplayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            target: None,
            piece: 0,
        }
    }

    pub fn target(&self) -> Option<Target> {
        self.target
    }

    /// Pick a random target for the active piece.
    ///
    /// In narrow mode the column range keeps every block inside the walls for
    /// the chosen rotation.
    pub fn choose(&mut self, state: &GameState) -> Option<Target> {
        let pair = state.active()?;
        let kind = pair.primary.kind();

        let rotation = if rotates(kind) {
            Rotation::ALL[self.rng.random_range(0..Rotation::ALL.len())]
        } else {
            pair.primary.rotation()
        };

        let width = state.grid().cols() as i32;
        let (lo, hi) = match state.mode() {
            Mode::Narrow => {
                let mut probe = pair.primary.clone();
                probe.set_rotation(rotation);
                let pivot = probe.pivot().col;
                let cells = probe.cells();
                let min = cells.iter().map(|c| c.col - pivot).min().unwrap_or(0);
                let max = cells.iter().map(|c| c.col - pivot).max().unwrap_or(0);
                (-min, width - 1 - max)
            }
            Mode::Wide => (0, width - 1),
        };

        let col = self.rng.random_range(lo..=hi);
        Some(Target { col, rotation })
    }

    /// Next command that moves the active piece toward its target.
    ///
    /// Rotation comes first, then sideways moves. Returns `None` once the
    /// piece is lined up, meaning the host can let it fall.
    pub fn next_command(&mut self, state: &GameState) -> Option<Command> {
        if state.game_over() {
            return None;
        }
        if self.target.is_none() || self.piece != state.pieces_spawned() {
            self.target = self.choose(state);
            self.piece = state.pieces_spawned();
            if let Some(target) = self.target {
                log::trace!("piece {} target {:?}", self.piece, target);
            }
        }

        let target = self.target?;
        let primary = &state.active()?.primary;

        if primary.rotation() != target.rotation {
            return Some(Command::Rotate);
        }
        let col = primary.pivot().col;
        if col < target.col {
            Some(Command::MoveRight)
        } else if col > target.col {
            Some(Command::MoveLeft)
        } else {
            None
        }
    }

    /// Place the active piece at once at a random reachable target.
    ///
    /// After `PLACE_ATTEMPTS` rejected targets the piece falls straight down
    /// from where it is.
    pub fn place(&mut self, state: &mut GameState) -> Result<u32, PlaceError> {
        if state.game_over() {
            return Err(PlaceError::NotPlayable);
        }
        for _ in 0..PLACE_ATTEMPTS {
            let target = self.choose(state).ok_or(PlaceError::NoActive)?;
            match apply_place(state, target.col, target.rotation) {
                Ok(rows) => return Ok(rows),
                Err(PlaceError::NotPlayable) => return Err(PlaceError::NotPlayable),
                Err(e) => log::trace!("target {:?} rejected: {}", target, e),
            }
        }

        let primary = &state.active().ok_or(PlaceError::NoActive)?.primary;
        let (col, rotation) = (primary.pivot().col, primary.rotation());
        apply_place(state, col, rotation)
    }
}
