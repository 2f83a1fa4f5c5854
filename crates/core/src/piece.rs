//! Pieces module - archetype shapes and the movable [`Piece`]
//!
//! A piece is a rigid set of up to four blocks sharing one integer pivot and
//! one rotation. Block offsets are `(row, col)` deltas from the pivot in the
//! y-up grid; rotation turns them around the pivot cell.

use arrayvec::ArrayVec;

use crate::types::{PieceKind, Rotation};

/// Maximum number of blocks in a piece
pub const MAX_BLOCKS: usize = 4;

/// Offset of a single block relative to the piece pivot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockOffset {
    pub drow: i8,
    pub dcol: i8,
}

impl BlockOffset {
    pub const fn new(drow: i8, dcol: i8) -> Self {
        Self { drow, dcol }
    }

    /// Turn the offset counter-clockwise by the rotation's quarter turns
    pub fn rotated(self, rotation: Rotation) -> Self {
        let (mut drow, mut dcol) = (self.drow, self.dcol);
        for _ in 0..rotation.quarter_turns() {
            // (x, y) -> (-y, x) with x = col and y = row
            let next_col = -drow;
            drow = dcol;
            dcol = next_col;
        }
        Self { drow, dcol }
    }
}

/// Absolute cell address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub row: i32,
    pub col: i32,
}

impl GridPos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, offset: BlockOffset) -> Self {
        Self {
            row: self.row + offset.drow as i32,
            col: self.col + offset.dcol as i32,
        }
    }
}

/// A translation in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Displacement {
    pub drow: i32,
    pub dcol: i32,
}

impl Displacement {
    pub const NONE: Displacement = Displacement::new(0, 0);
    pub const LEFT: Displacement = Displacement::new(0, -1);
    pub const RIGHT: Displacement = Displacement::new(0, 1);
    pub const DOWN: Displacement = Displacement::new(-1, 0);

    pub const fn new(drow: i32, dcol: i32) -> Self {
        Self { drow, dcol }
    }

    /// Whether the displacement has a downward component
    pub fn is_downward(&self) -> bool {
        self.drow < 0
    }
}

/// Block offsets in spawn orientation, as (row, col) deltas
type ShapeTable = &'static [(i8, i8)];

/// Get the spawn-orientation shape of an archetype
pub fn base_shape(kind: PieceKind) -> ShapeTable {
    match kind {
        PieceKind::I => &[(0, -1), (0, 0), (0, 1), (0, 2)],
        PieceKind::O => &[(0, 0), (0, 1), (1, 0), (1, 1)],
        PieceKind::S => &[(0, -1), (0, 0), (1, 0), (1, 1)],
        PieceKind::Z => &[(1, -1), (1, 0), (0, 0), (0, 1)],
        PieceKind::J => &[(1, -1), (0, -1), (0, 0), (0, 1)],
        PieceKind::L => &[(0, -1), (0, 0), (0, 1), (1, 1)],
        PieceKind::T => &[(0, -1), (0, 0), (0, 1), (1, 0)],
        PieceKind::I3 => &[(0, -1), (0, 0), (0, 1)],
        PieceKind::V => &[(0, 0), (1, 0), (0, 1)],
        PieceKind::D => &[(0, 0), (0, 1)],
    }
}

/// Whether rotating this archetype does anything
///
/// The square would wobble around an integer pivot, so it stays put.
pub fn rotates(kind: PieceKind) -> bool {
    kind != PieceKind::O
}

/// Which side of a wide-mode pair a piece is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceRole {
    Primary,
    Clone,
}

/// A falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    offsets: ArrayVec<BlockOffset, MAX_BLOCKS>,
    pivot: GridPos,
    rotation: Rotation,
    dropped: bool,
    role: PieceRole,
}

impl Piece {
    /// Create a primary piece of the given archetype at `pivot`
    pub fn new(kind: PieceKind, pivot: GridPos) -> Self {
        let offsets = base_shape(kind)
            .iter()
            .map(|&(drow, dcol)| BlockOffset::new(drow, dcol))
            .collect();
        Self {
            kind,
            offsets,
            pivot,
            rotation: Rotation::North,
            dropped: false,
            role: PieceRole::Primary,
        }
    }

    /// Copy of this piece shifted by `dcol` columns and tagged as a clone
    pub fn clone_at(&self, dcol: i32) -> Self {
        let mut twin = self.clone();
        twin.pivot.col += dcol;
        twin.role = PieceRole::Clone;
        twin
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn pivot(&self) -> GridPos {
        self.pivot
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn role(&self) -> PieceRole {
        self.role
    }

    pub fn is_dropped(&self) -> bool {
        self.dropped
    }

    pub fn mark_dropped(&mut self) {
        self.dropped = true;
    }

    /// Offsets in spawn orientation
    pub fn offsets(&self) -> &[BlockOffset] {
        &self.offsets
    }

    /// Absolute cells of every block, in block order
    pub fn cells(&self) -> ArrayVec<GridPos, MAX_BLOCKS> {
        self.offsets
            .iter()
            .map(|&o| self.pivot.offset(o.rotated(self.rotation)))
            .collect()
    }

    /// Cells inside `[0, cols)`; blocks outside are hidden
    pub fn visible_cells(&self, cols: usize) -> ArrayVec<GridPos, MAX_BLOCKS> {
        self.cells()
            .into_iter()
            .filter(|p| p.col >= 0 && (p.col as usize) < cols)
            .collect()
    }

    pub fn translate(&mut self, d: Displacement) {
        self.pivot.row += d.drow;
        self.pivot.col += d.dcol;
    }

    /// Rotate by +90° (counter-clockwise)
    pub fn rotate_ccw(&mut self) {
        if rotates(self.kind) {
            self.rotation = self.rotation.rotate_ccw();
        }
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        if rotates(self.kind) {
            self.rotation = rotation;
        }
    }
}
