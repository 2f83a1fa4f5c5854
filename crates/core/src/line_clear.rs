//! Line clearing - removes clear units and compacts the rows above
//!
//! A clear unit is `N` consecutive full rows (`N = 1` in narrow mode, `N = 2`
//! in wide mode). Rows are scanned from the floor upward; after a unit is
//! removed at row `i` the scan re-tests `i`, because the rows that shifted
//! into that slot may complete another unit.

use crate::events::EventQueue;
use crate::grid::GridField;
use crate::types::{GameEvent, Mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClearEngine {
    clear_unit: usize,
}

impl LineClearEngine {
    pub fn new(clear_unit: usize) -> Self {
        Self {
            clear_unit: clear_unit.max(1),
        }
    }

    pub fn for_mode(mode: Mode) -> Self {
        Self::new(mode.clear_unit())
    }

    pub fn clear_unit(&self) -> usize {
        self.clear_unit
    }

    /// Whether rows `[row, row + N)` are all full
    pub fn is_unit_full(&self, grid: &GridField, row: i32) -> bool {
        (0..self.clear_unit as i32).all(|k| grid.is_row_full(row + k))
    }

    /// Remove every clear unit and return the number of rows removed.
    ///
    /// For each removed row this raises `LineDestroyed(i)`, shifts the rows
    /// above down, raises `LinesShifted(i)` and raises `ScoreChanged(1)`.
    ///
    /// `shift_rows_down` never empties the topmost row, so a field packed to
    /// the top could refill forever; at most `rows` rows are removed per call.
    pub fn check_and_clear(&self, grid: &mut GridField, events: &mut EventQueue) -> u32 {
        let max_lines = grid.rows() as u32;
        let unit = self.clear_unit as i32;
        let mut cleared = 0u32;
        let mut row = 0i32;

        while row + unit <= grid.rows() as i32 {
            if !self.is_unit_full(grid, row) {
                row += 1;
                continue;
            }

            if cleared + self.clear_unit as u32 > max_lines {
                log::warn!("line clear stopped after {} rows; field is packed to the top", cleared);
                break;
            }

            // Each shift pulls the next row of the unit into `row`
            for _ in 0..unit {
                events.push(GameEvent::LineDestroyed(row));
                grid.shift_rows_down(row);
                events.push(GameEvent::LinesShifted(row));
                events.push(GameEvent::ScoreChanged(1));
                cleared += 1;
            }
        }

        if cleared > 0 {
            log::debug!("cleared {} rows", cleared);
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Boundary;

    fn fill_row(grid: &mut GridField, row: i32) {
        for col in 0..grid.cols() as i32 {
            grid.set_filled(row, col);
        }
    }

    #[test]
    fn test_single_unit_clears_one_row() {
        let mut grid = GridField::new(6, 2, 4, Boundary::Blocked);
        let mut events = EventQueue::new();
        fill_row(&mut grid, 0);
        grid.set_filled(1, 2);

        let engine = LineClearEngine::new(1);
        assert_eq!(engine.check_and_clear(&mut grid, &mut events), 1);
        assert!(grid.is_filled(0, 2));
        assert!(!grid.is_filled(1, 2));
        assert_eq!(
            events.drain().collect::<Vec<_>>(),
            vec![
                GameEvent::LineDestroyed(0),
                GameEvent::LinesShifted(0),
                GameEvent::ScoreChanged(1),
            ]
        );
    }

    #[test]
    fn test_stacked_rows_clear_in_place() {
        let mut grid = GridField::new(6, 2, 4, Boundary::Blocked);
        let mut events = EventQueue::new();
        fill_row(&mut grid, 2);
        fill_row(&mut grid, 3);

        let engine = LineClearEngine::new(1);
        assert_eq!(engine.check_and_clear(&mut grid, &mut events), 2);
        assert_eq!(grid.filled_count(), 0);
        let destroyed: Vec<_> = events
            .drain()
            .filter(|e| matches!(e, GameEvent::LineDestroyed(_)))
            .collect();
        assert_eq!(destroyed, vec![GameEvent::LineDestroyed(2), GameEvent::LineDestroyed(2)]);
    }

    #[test]
    fn test_wide_unit_needs_two_rows() {
        let mut grid = GridField::new(6, 2, 4, Boundary::Open);
        let mut events = EventQueue::new();
        fill_row(&mut grid, 0);
        grid.set_filled(1, 0);

        let engine = LineClearEngine::for_mode(Mode::Wide);
        assert_eq!(engine.check_and_clear(&mut grid, &mut events), 0);
        assert!(events.is_empty());

        fill_row(&mut grid, 1);
        assert_eq!(engine.check_and_clear(&mut grid, &mut events), 2);
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    fn test_separate_full_rows_do_not_form_wide_unit() {
        let mut grid = GridField::new(6, 2, 4, Boundary::Open);
        let mut events = EventQueue::new();
        fill_row(&mut grid, 0);
        fill_row(&mut grid, 2);

        let engine = LineClearEngine::new(2);
        assert_eq!(engine.check_and_clear(&mut grid, &mut events), 0);
        assert_eq!(grid.filled_count(), 8);
    }

    #[test]
    fn test_packed_field_terminates() {
        let mut grid = GridField::new(3, 1, 2, Boundary::Blocked);
        let mut events = EventQueue::new();
        for row in 0..4 {
            fill_row(&mut grid, row);
        }

        let engine = LineClearEngine::new(1);
        assert_eq!(engine.check_and_clear(&mut grid, &mut events), 4);
    }
}
