//! Read-only view of a session for renderers and tests
//!
//! Only the visible area is captured; hidden-buffer rows and blocks outside
//! the stored columns are left out, the same way a renderer hides them.

use crate::piece::GridPos;
use crate::types::{Mode, PieceKind, Rotation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub pivot: GridPos,
    /// Visible blocks of the primary and, in wide mode, of the clone
    pub cells: Vec<GridPos>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameSnapshot {
    pub mode: Mode,
    pub width: usize,
    pub height: usize,
    /// Visible rows, row-major from the floor up
    pub cells: Vec<bool>,
    pub active: Option<ActiveSnapshot>,
    pub score: u32,
    pub lines: u32,
    pub pieces_spawned: u32,
    pub game_over: bool,
}

impl GameSnapshot {
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.cells[row * self.width + col]
    }

    pub fn is_active(&self, row: usize, col: usize) -> bool {
        self.active.as_ref().is_some_and(|a| {
            a.cells
                .iter()
                .any(|p| p.row == row as i32 && p.col == col as i32)
        })
    }

    /// Text rendering, top row first: `#` settled, `@` falling, `.` empty
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in (0..self.height).rev() {
            for col in 0..self.width {
                let c = if self.is_active(row, col) {
                    '@'
                } else if self.is_filled(row, col) {
                    '#'
                } else {
                    '.'
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }
}
