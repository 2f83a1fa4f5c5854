//! Movement validation - legality of moves and rotations against the grid
//!
//! A candidate transform is applied to a copy of the piece and every block of
//! the copy is checked in block order, stopping at the first failure:
//!
//! 1. **Settle**: a downward move whose block lands below the floor or on a
//!    filled cell drops the piece.
//! 2. **Blocked**: a lateral move or rotation whose block lands on a filled
//!    cell is rejected; the piece keeps falling.
//! 3. **Edge** (narrow): a block outside `[0, width)` is rejected.
//! 4. **Wrap** (wide): a block at `col >= 2 * width` or `col < -width` moves
//!    the whole piece `2 * width` columns back toward the field and the check
//!    restarts from the new position.
//!
//! Settle is tested before blocking so that a piece touching a wall and the
//! floor at once still lands instead of hanging in the air.

use crate::events::EventQueue;
use crate::grid::GridField;
use crate::piece::{Displacement, Piece};
use crate::types::{GameEvent, Mode};

/// A candidate change to a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Translate(Displacement),
    /// +90°
    Rotate,
}

impl Transform {
    pub fn is_downward(&self) -> bool {
        matches!(self, Transform::Translate(d) if d.is_downward())
    }

    fn apply(&self, piece: &mut Piece) {
        match self {
            Transform::Translate(d) => piece.translate(*d),
            Transform::Rotate => piece.rotate_ccw(),
        }
    }
}

/// Outcome of checking one piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The transform may be applied
    Legal,
    /// The transform is rejected, the piece is still falling
    Blocked,
    /// The transform is rejected and the piece is now dropped
    Settled,
}

/// Result of scanning the blocks of a candidate position
enum Scan {
    Clear,
    Blocked,
    Settle,
    Wrap(i32),
}

/// Validates moves for one field geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementValidator {
    mode: Mode,
    width: i32,
}

impl MovementValidator {
    pub fn new(mode: Mode, width: usize) -> Self {
        Self {
            mode,
            width: width as i32,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    /// Check a transform without applying it.
    ///
    /// Side effects are limited to the `dropped` flag and, in wide mode, a
    /// side-teleport of the pivot. A dropped piece never moves again.
    pub fn check(&self, piece: &mut Piece, grid: &GridField, transform: Transform) -> Verdict {
        if piece.is_dropped() {
            return Verdict::Blocked;
        }

        let downward = transform.is_downward();
        let mut wrapped = false;

        loop {
            let mut candidate = piece.clone();
            transform.apply(&mut candidate);

            match self.scan(&candidate, grid, downward) {
                Scan::Clear => return Verdict::Legal,
                Scan::Blocked => return Verdict::Blocked,
                Scan::Settle => {
                    piece.mark_dropped();
                    return Verdict::Settled;
                }
                Scan::Wrap(dcol) => {
                    if wrapped {
                        // A piece narrower than the field cannot cross both edges
                        return Verdict::Legal;
                    }
                    log::debug!(
                        "{:?} {:?} wraps by {} columns",
                        piece.role(),
                        piece.kind(),
                        dcol
                    );
                    piece.translate(Displacement::new(0, dcol));
                    wrapped = true;
                }
            }
        }
    }

    fn scan(&self, candidate: &Piece, grid: &GridField, downward: bool) -> Scan {
        for cell in candidate.cells() {
            let (row, col) = (cell.row, cell.col);

            if downward {
                if row < 0 || grid.is_filled(row, col) {
                    return Scan::Settle;
                }
            } else if grid.is_filled(row, col) {
                return Scan::Blocked;
            }

            match self.mode {
                Mode::Narrow => {
                    if col < 0 || col >= self.width {
                        return Scan::Blocked;
                    }
                }
                Mode::Wide => {
                    if col >= 2 * self.width {
                        return Scan::Wrap(-2 * self.width);
                    }
                    if col < -self.width {
                        return Scan::Wrap(2 * self.width);
                    }
                }
            }
        }
        Scan::Clear
    }

    /// Validate a translation of a lone piece.
    ///
    /// Returns whether the caller may apply `displacement`. When the piece
    /// settles its footprint is committed and `PieceDropped` is raised.
    pub fn try_move(
        &self,
        piece: &mut Piece,
        grid: &mut GridField,
        events: &mut EventQueue,
        displacement: Displacement,
    ) -> bool {
        self.resolve(piece, grid, events, Transform::Translate(displacement))
    }

    /// Validate a +90° rotation of a lone piece
    pub fn try_rotate(&self, piece: &mut Piece, grid: &mut GridField, events: &mut EventQueue) -> bool {
        self.resolve(piece, grid, events, Transform::Rotate)
    }

    fn resolve(
        &self,
        piece: &mut Piece,
        grid: &mut GridField,
        events: &mut EventQueue,
        transform: Transform,
    ) -> bool {
        match self.check(piece, grid, transform) {
            Verdict::Legal => true,
            Verdict::Blocked => false,
            Verdict::Settled => {
                commit(piece, grid);
                events.push(GameEvent::PieceDropped);
                false
            }
        }
    }
}

/// Write every block of the piece into the grid.
///
/// Blocks outside the stored columns are discarded by the grid.
pub fn commit(piece: &Piece, grid: &mut GridField) {
    for cell in piece.cells() {
        grid.set_filled(cell.row, cell.col);
    }
    log::debug!(
        "{:?} {:?} settled at {:?}",
        piece.role(),
        piece.kind(),
        piece.pivot()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Boundary;
    use crate::piece::GridPos;
    use crate::types::PieceKind;

    fn narrow_grid() -> GridField {
        GridField::new(20, 4, 10, Boundary::Blocked)
    }

    #[test]
    fn test_check_does_not_move_piece() {
        let grid = narrow_grid();
        let validator = MovementValidator::new(Mode::Narrow, 10);
        let mut piece = Piece::new(PieceKind::T, GridPos::new(10, 4));
        let before = piece.clone();

        for t in [
            Transform::Translate(Displacement::LEFT),
            Transform::Translate(Displacement::DOWN),
            Transform::Rotate,
        ] {
            assert_eq!(validator.check(&mut piece, &grid, t), Verdict::Legal);
            assert_eq!(piece, before);
        }
    }

    #[test]
    fn test_settle_wins_over_blocking() {
        // Floor and wall at once: the downward move settles
        let grid = narrow_grid();
        let validator = MovementValidator::new(Mode::Narrow, 10);
        let mut piece = Piece::new(PieceKind::I, GridPos::new(0, 1));

        assert_eq!(
            validator.check(&mut piece, &grid, Transform::Translate(Displacement::DOWN)),
            Verdict::Settled
        );
        assert!(piece.is_dropped());
    }

    #[test]
    fn test_lateral_block_keeps_piece_airborne() {
        let mut grid = narrow_grid();
        grid.set_filled(10, 6);
        let validator = MovementValidator::new(Mode::Narrow, 10);
        // I spans cols 2..=5; one step right reaches col 6
        let mut piece = Piece::new(PieceKind::I, GridPos::new(10, 3));

        assert_eq!(
            validator.check(&mut piece, &grid, Transform::Translate(Displacement::RIGHT)),
            Verdict::Blocked
        );
        assert!(!piece.is_dropped());
    }

    #[test]
    fn test_narrow_edge_rejects_with_open_boundary() {
        let grid = GridField::new(20, 4, 10, Boundary::Open);
        let validator = MovementValidator::new(Mode::Narrow, 10);
        let mut piece = Piece::new(PieceKind::I, GridPos::new(10, 1));

        assert_eq!(
            validator.check(&mut piece, &grid, Transform::Translate(Displacement::LEFT)),
            Verdict::Blocked
        );
    }

    #[test]
    fn test_wide_wrap_teleports_and_stays_legal() {
        let grid = GridField::new(20, 4, 12, Boundary::Open);
        let validator = MovementValidator::new(Mode::Wide, 12);
        // D occupies cols 22 and 23; one step right reaches 24 = 2 * width
        let mut piece = Piece::new(PieceKind::D, GridPos::new(10, 22));

        let verdict = validator.check(&mut piece, &grid, Transform::Translate(Displacement::RIGHT));
        assert_eq!(verdict, Verdict::Legal);
        assert_eq!(piece.pivot(), GridPos::new(10, -2));
    }

    #[test]
    fn test_wide_wrap_from_left_edge() {
        let grid = GridField::new(20, 4, 12, Boundary::Open);
        let validator = MovementValidator::new(Mode::Wide, 12);
        let mut piece = Piece::new(PieceKind::D, GridPos::new(10, -12));

        let verdict = validator.check(&mut piece, &grid, Transform::Translate(Displacement::LEFT));
        assert_eq!(verdict, Verdict::Legal);
        assert_eq!(piece.pivot(), GridPos::new(10, 12));
    }

    #[test]
    fn test_rotation_into_wall_is_blocked() {
        let grid = narrow_grid();
        let validator = MovementValidator::new(Mode::Narrow, 10);

        // Vertical I against the right wall; turning flat needs col 10
        let mut piece = Piece::new(PieceKind::I, GridPos::new(10, 9));
        piece.rotate_ccw();
        assert_eq!(validator.check(&mut piece, &grid, Transform::Rotate), Verdict::Blocked);

        let mut free = Piece::new(PieceKind::I, GridPos::new(10, 5));
        free.rotate_ccw();
        assert_eq!(validator.check(&mut free, &grid, Transform::Rotate), Verdict::Legal);
    }

    #[test]
    fn test_dropped_piece_never_moves() {
        let mut grid = narrow_grid();
        let mut events = EventQueue::new();
        let validator = MovementValidator::new(Mode::Narrow, 10);
        let mut piece = Piece::new(PieceKind::O, GridPos::new(0, 4));

        assert!(!validator.try_move(&mut piece, &mut grid, &mut events, Displacement::DOWN));
        assert!(!validator.try_move(&mut piece, &mut grid, &mut events, Displacement::LEFT));
        assert!(!validator.try_rotate(&mut piece, &mut grid, &mut events));
        assert_eq!(events.len(), 1);
    }
}
