use thiserror::Error;

use dualfall_core::piece::rotates;
use dualfall_core::GameState;
use dualfall_types::{Command, Mode, Rotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("game is not playable")]
    NotPlayable,
    #[error("no active piece")]
    NoActive,
    #[error("could not rotate to target rotation")]
    RotationBlocked,
    #[error("target column would place piece out of bounds")]
    ColumnOutOfBounds,
    #[error("could not move to target column due to collision")]
    ColumnBlocked,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "not_playable",
            PlaceError::NoActive
            | PlaceError::RotationBlocked
            | PlaceError::ColumnOutOfBounds
            | PlaceError::ColumnBlocked => "invalid_place",
        }
    }
}

/// Rotate the active piece to `target_rotation`, slide its pivot to
/// `target_col` and let it fall until it settles.
///
/// Returns the number of rows the piece fell. On error the session is left
/// exactly as it was.
pub fn apply_place(
    state: &mut GameState,
    target_col: i32,
    target_rotation: Rotation,
) -> Result<u32, PlaceError> {
    if state.game_over() {
        return Err(PlaceError::NotPlayable);
    }

    let before = state.clone();
    let result = place(state, target_col, target_rotation);
    if result.is_err() {
        *state = before;
    }
    result
}

fn place(state: &mut GameState, target_col: i32, target_rotation: Rotation) -> Result<u32, PlaceError> {
    let active = state.active().ok_or(PlaceError::NoActive)?;
    let kind = active.primary.kind();
    let current = active.primary.rotation();

    // Only +90° turns exist, so every target is 0..=3 turns away
    if rotates(kind) {
        let turns = (target_rotation.quarter_turns() + 4 - current.quarter_turns()) % 4;
        for _ in 0..turns {
            if !state.apply(Command::Rotate) {
                return Err(PlaceError::RotationBlocked);
            }
        }
    }

    let active = state.active().ok_or(PlaceError::NoActive)?;
    let width = state.grid().cols() as i32;
    let shift = target_col - active.primary.pivot().col;

    match state.mode() {
        Mode::Narrow => {
            let out_of_bounds = active
                .primary
                .cells()
                .iter()
                .any(|c| c.col + shift < 0 || c.col + shift >= width);
            if out_of_bounds {
                return Err(PlaceError::ColumnOutOfBounds);
            }
        }
        Mode::Wide => {
            if !(0..width).contains(&target_col) {
                return Err(PlaceError::ColumnOutOfBounds);
            }
        }
    }

    let step = if shift < 0 {
        Command::MoveLeft
    } else {
        Command::MoveRight
    };
    for _ in 0..shift.unsigned_abs() {
        if !state.apply(step) {
            return Err(PlaceError::ColumnBlocked);
        }
    }

    let mut rows = 0;
    while state.apply(Command::SoftDropTick) {
        rows += 1;
    }
    Ok(rows)
}
