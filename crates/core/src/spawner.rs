//! Piece spawning - weighted archetype choice and spawn placement
//!
//! New pieces appear with their pivot on the first hidden row, centered
//! horizontally. In wide mode the spawner also creates the clone and links the
//! pair through the [`DualModeCoordinator`].

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::dual::{DualModeCoordinator, PiecePair};
use crate::error::{CoreError, Result};
use crate::piece::{GridPos, Piece};
use crate::randomizer::ProbabilityTable;
use crate::types::{Mode, PieceKind};

/// Chooses and places new pieces
#[derive(Debug, Clone)]
pub struct PieceSpawner {
    table: ProbabilityTable,
    rng: Pcg32,
    mode: Mode,
    spawn: GridPos,
}

impl PieceSpawner {
    /// Create a spawner for a field with `visible_rows` rows and `width` columns.
    ///
    /// Fails when the table does not have one weight per archetype of `mode`.
    pub fn new(table: ProbabilityTable, mode: Mode, visible_rows: usize, width: usize, seed: u64) -> Result<Self> {
        if table.len() != mode.archetype_count() {
            return Err(CoreError::ArchetypeCount {
                mode: mode.as_str(),
                expected: mode.archetype_count(),
                actual: table.len(),
            });
        }

        Ok(Self {
            table,
            rng: Pcg32::seed_from_u64(seed),
            mode,
            spawn: spawn_position(visible_rows, width),
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn spawn_position(&self) -> GridPos {
        self.spawn
    }

    pub fn table(&self) -> &ProbabilityTable {
        &self.table
    }

    /// Draw the next archetype
    pub fn next_kind(&mut self) -> PieceKind {
        let index = self.table.sample(&mut self.rng);
        // The length check in `new` keeps the index inside the archetype list
        PieceKind::from_index(index).unwrap_or(PieceKind::I)
    }

    /// Create the next piece, linked to its clone in wide mode
    pub fn spawn_next(&mut self, coordinator: &DualModeCoordinator) -> PiecePair {
        let kind = self.next_kind();
        self.spawn_kind(kind, coordinator)
    }

    /// Place a piece of a chosen archetype at the spawn point
    pub fn spawn_kind(&self, kind: PieceKind, coordinator: &DualModeCoordinator) -> PiecePair {
        let primary = Piece::new(kind, self.spawn);
        log::debug!("spawn {:?} at {:?}", kind, self.spawn);
        match self.mode {
            Mode::Narrow => PiecePair::single(primary),
            Mode::Wide => coordinator.link(primary),
        }
    }
}

/// Spawn pivot: first hidden row, horizontal center
pub fn spawn_position(visible_rows: usize, width: usize) -> GridPos {
    GridPos::new(visible_rows as i32, (width / 2) as i32)
}
