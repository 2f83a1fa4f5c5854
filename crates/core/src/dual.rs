//! Dual mode - a primary piece and its clone moving as one logical piece
//!
//! In wide mode every primary has a clone one field-width to its left. Blocks
//! outside the stored columns are hidden, so as the pair slides sideways the
//! part of the shape that leaves one edge of the field shows up at the other.
//!
//! Every move is validated for the clone first, then for the primary, and is
//! applied to both or to neither. When either side settles the other side is
//! dropped too, both footprints are committed and `PieceDropped` is raised
//! once for the pair.

use crate::events::EventQueue;
use crate::grid::GridField;
use crate::movement::{commit, MovementValidator, Transform, Verdict};
use crate::piece::{rotates, Displacement, Piece};
use crate::types::GameEvent;

/// The active piece, with its clone in wide mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiecePair {
    pub primary: Piece,
    pub clone: Option<Piece>,
}

impl PiecePair {
    /// A piece without a clone
    pub fn single(primary: Piece) -> Self {
        Self {
            primary,
            clone: None,
        }
    }

    pub fn is_dropped(&self) -> bool {
        self.primary.is_dropped()
    }

    pub fn is_linked(&self) -> bool {
        self.clone.is_some()
    }

    fn translate(&mut self, d: Displacement) {
        self.primary.translate(d);
        if let Some(clone) = self.clone.as_mut() {
            clone.translate(d);
        }
    }

    fn rotate_ccw(&mut self) {
        self.primary.rotate_ccw();
        if let Some(clone) = self.clone.as_mut() {
            clone.rotate_ccw();
        }
    }
}

/// Keeps a linked pair in lockstep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DualModeCoordinator {
    validator: MovementValidator,
}

impl DualModeCoordinator {
    pub fn new(validator: MovementValidator) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &MovementValidator {
        &self.validator
    }

    /// Pair `primary` with a clone one field-width to its left
    pub fn link(&self, primary: Piece) -> PiecePair {
        let clone = primary.clone_at(-self.validator.width());
        PiecePair {
            primary,
            clone: Some(clone),
        }
    }

    /// Validate a translation for the pair and apply it when legal.
    pub fn propose_move(
        &self,
        pair: &mut PiecePair,
        grid: &mut GridField,
        events: &mut EventQueue,
        displacement: Displacement,
    ) -> bool {
        if !self.propose(pair, grid, events, Transform::Translate(displacement)) {
            return false;
        }
        pair.translate(displacement);
        true
    }

    /// Validate a +90° rotation for the pair and apply it when legal.
    pub fn propose_rotate(&self, pair: &mut PiecePair, grid: &mut GridField, events: &mut EventQueue) -> bool {
        if !rotates(pair.primary.kind()) {
            return false;
        }
        if !self.propose(pair, grid, events, Transform::Rotate) {
            return false;
        }
        pair.rotate_ccw();
        true
    }

    fn propose(
        &self,
        pair: &mut PiecePair,
        grid: &mut GridField,
        events: &mut EventQueue,
        transform: Transform,
    ) -> bool {
        let verdict = match pair.clone.as_mut() {
            None => self.validator.check(&mut pair.primary, grid, transform),
            Some(clone) => match self.validator.check(clone, grid, transform) {
                Verdict::Settled => {
                    pair.primary.mark_dropped();
                    Verdict::Settled
                }
                Verdict::Blocked => Verdict::Blocked,
                Verdict::Legal => {
                    let verdict = self.validator.check(&mut pair.primary, grid, transform);
                    if verdict == Verdict::Settled {
                        clone.mark_dropped();
                    }
                    verdict
                }
            },
        };

        if let Some(clone) = pair.clone.as_ref() {
            debug_assert_eq!(
                clone.is_dropped(),
                pair.primary.is_dropped(),
                "linked pair desynchronized"
            );
        }

        match verdict {
            Verdict::Legal => true,
            Verdict::Blocked => false,
            Verdict::Settled => {
                commit(&pair.primary, grid);
                if let Some(clone) = pair.clone.as_ref() {
                    commit(clone, grid);
                }
                events.push(GameEvent::PieceDropped);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Boundary;
    use crate::piece::GridPos;
    use crate::types::{Mode, PieceKind};

    fn wide() -> (GridField, DualModeCoordinator) {
        let grid = GridField::new(20, 4, 12, Boundary::Open);
        let coordinator = DualModeCoordinator::new(MovementValidator::new(Mode::Wide, 12));
        (grid, coordinator)
    }

    #[test]
    fn test_link_places_clone_one_width_left() {
        let (_, coordinator) = wide();
        let pair = coordinator.link(Piece::new(PieceKind::L, GridPos::new(20, 6)));
        let clone = pair.clone.as_ref().unwrap();
        assert_eq!(clone.pivot(), GridPos::new(20, -6));
        assert_eq!(clone.kind(), PieceKind::L);
    }

    #[test]
    fn test_legal_move_moves_both() {
        let (mut grid, coordinator) = wide();
        let mut events = EventQueue::new();
        let mut pair = coordinator.link(Piece::new(PieceKind::T, GridPos::new(10, 6)));

        assert!(coordinator.propose_move(&mut pair, &mut grid, &mut events, Displacement::LEFT));
        assert_eq!(pair.primary.pivot(), GridPos::new(10, 5));
        assert_eq!(pair.clone.as_ref().unwrap().pivot(), GridPos::new(10, -7));
    }

    #[test]
    fn test_floor_settles_pair_and_fires_once() {
        let (mut grid, coordinator) = wide();
        let mut events = EventQueue::new();
        let mut pair = coordinator.link(Piece::new(PieceKind::D, GridPos::new(0, 1)));

        assert!(!coordinator.propose_move(&mut pair, &mut grid, &mut events, Displacement::DOWN));
        assert!(pair.primary.is_dropped());
        assert!(pair.clone.as_ref().unwrap().is_dropped());
        assert_eq!(events.len(), 1);
        assert!(grid.is_filled(0, 1) && grid.is_filled(0, 2));
    }

    #[test]
    fn test_rotate_keeps_pair_aligned() {
        let (mut grid, coordinator) = wide();
        let mut events = EventQueue::new();
        let mut pair = coordinator.link(Piece::new(PieceKind::J, GridPos::new(10, 6)));

        assert!(coordinator.propose_rotate(&mut pair, &mut grid, &mut events));
        let clone = pair.clone.as_ref().unwrap();
        assert_eq!(clone.rotation(), pair.primary.rotation());
    }
}
