//! Game state module - one playing session
//!
//! Ties the field, the spawner, the movement rules and the line clear engine
//! together and drives them from commands and elapsed time. A session owns
//! its grid; nothing outside it mutates the field.
//!
//! Settle handling order: the settled footprint is committed, full units are
//! cleared, then the hidden buffer is checked. Any filled hidden cell ends the
//! session with a single `GameOver`; otherwise the next piece spawns.

use crate::config::GameConfig;
use crate::dual::{DualModeCoordinator, PiecePair};
use crate::error::Result;
use crate::events::EventQueue;
use crate::grid::{Boundary, GridField};
use crate::line_clear::LineClearEngine;
use crate::movement::MovementValidator;
use crate::piece::Displacement;
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::spawner::PieceSpawner;
use crate::types::{Command, GameEvent, Mode, PieceKind};

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    grid: GridField,
    coordinator: DualModeCoordinator,
    clear_engine: LineClearEngine,
    spawner: PieceSpawner,
    active: Option<PiecePair>,
    events: EventQueue,
    score: u32,
    lines: u32,
    pieces_spawned: u32,
    gravity_timer_ms: u32,
    soft_drop_timer_ms: u32,
    game_over: bool,
}

impl GameState {
    /// Validate `config`, build the field and spawn the first piece.
    pub fn new(config: GameConfig) -> Result<Self> {
        let table = config.validate()?;
        let mode = config.mode;
        let width = config.field_width() as usize;
        let visible_rows = config.height as usize;

        // Clones start wholly left of the field, so wide fields read open sides
        let boundary = match mode {
            Mode::Narrow => Boundary::Blocked,
            Mode::Wide => Boundary::Open,
        };
        let grid = GridField::new(visible_rows, config.hidden_rows as usize, width, boundary);
        let validator = MovementValidator::new(mode, width);
        let spawner = PieceSpawner::new(table, mode, visible_rows, width, config.seed)?;

        log::debug!(
            "new {} session: {}x{} (+{} hidden), seed {}",
            mode.as_str(),
            width,
            visible_rows,
            config.hidden_rows,
            config.seed
        );

        let mut state = Self {
            config,
            grid,
            coordinator: DualModeCoordinator::new(validator),
            clear_engine: LineClearEngine::for_mode(mode),
            spawner,
            active: None,
            events: EventQueue::new(),
            score: 0,
            lines: 0,
            pieces_spawned: 0,
            gravity_timer_ms: 0,
            soft_drop_timer_ms: 0,
            game_over: false,
        };
        state.spawn_piece();
        Ok(state)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn grid(&self) -> &GridField {
        &self.grid
    }

    pub fn active(&self) -> Option<&PiecePair> {
        self.active.as_ref()
    }

    pub fn validator(&self) -> &MovementValidator {
        self.coordinator.validator()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn pieces_spawned(&self) -> u32 {
        self.pieces_spawned
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Take every event raised since the last call, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain().collect()
    }

    /// Draw the next archetype and place it at the spawn point
    fn spawn_piece(&mut self) {
        let pair = self.spawner.spawn_next(&self.coordinator);
        self.place(pair);
    }

    /// Replace the active piece with one of a chosen archetype.
    ///
    /// The randomizer is not consulted. Returns false once the game is over.
    pub fn spawn_kind(&mut self, kind: PieceKind) -> bool {
        if self.game_over {
            return false;
        }
        let pair = self.spawner.spawn_kind(kind, &self.coordinator);
        self.place(pair);
        true
    }

    fn place(&mut self, pair: PiecePair) {
        let kind = pair.primary.kind();
        self.active = Some(pair);
        self.pieces_spawned = self.pieces_spawned.wrapping_add(1);
        self.gravity_timer_ms = 0;
        self.soft_drop_timer_ms = 0;
        self.events.push(GameEvent::PieceSpawned(kind));
    }

    /// Apply one command to the active piece.
    ///
    /// Returns true when the piece moved or rotated. A fall command that
    /// settles the piece returns false, but the settle still runs its line
    /// clear and spawns the next piece.
    pub fn apply(&mut self, command: Command) -> bool {
        if self.game_over {
            return false;
        }
        let Some(pair) = self.active.as_mut() else {
            return false;
        };

        let coordinator = &self.coordinator;
        let moved = match command {
            Command::MoveLeft => {
                coordinator.propose_move(pair, &mut self.grid, &mut self.events, Displacement::LEFT)
            }
            Command::MoveRight => {
                coordinator.propose_move(pair, &mut self.grid, &mut self.events, Displacement::RIGHT)
            }
            Command::Rotate => coordinator.propose_rotate(pair, &mut self.grid, &mut self.events),
            Command::SoftDropTick | Command::GravityTick => {
                coordinator.propose_move(pair, &mut self.grid, &mut self.events, Displacement::DOWN)
            }
        };

        if pair.is_dropped() {
            self.finish_drop();
        }
        moved
    }

    /// Advance the session by `elapsed_ms`.
    ///
    /// Queued commands are applied first, in order. Then the gravity timer
    /// and, while `soft_drop` is held, the soft-drop timer advance; each
    /// fires a fall and restarts from zero when it reaches its interval.
    /// Releasing soft drop resets its timer.
    ///
    /// Returns true when anything changed.
    pub fn tick(&mut self, elapsed_ms: u32, soft_drop: bool, commands: &[Command]) -> bool {
        if self.game_over {
            return false;
        }

        let before = self.events.len();
        let mut changed = false;

        for &command in commands {
            changed |= self.apply(command);
            if self.game_over {
                return true;
            }
        }

        self.gravity_timer_ms = self.gravity_timer_ms.saturating_add(elapsed_ms);
        if self.gravity_timer_ms >= self.config.drop_time_ms {
            self.gravity_timer_ms = 0;
            changed |= self.apply(Command::GravityTick);
        }

        if soft_drop {
            self.soft_drop_timer_ms = self.soft_drop_timer_ms.saturating_add(elapsed_ms);
            if self.soft_drop_timer_ms >= self.config.extra_drop_time_ms {
                self.soft_drop_timer_ms = 0;
                changed |= self.apply(Command::SoftDropTick);
            }
        } else {
            self.soft_drop_timer_ms = 0;
        }

        changed || self.events.len() != before
    }

    /// Settled pair: clear lines, then end the game or spawn the next piece
    fn finish_drop(&mut self) {
        self.active = None;

        let cleared = self.clear_engine.check_and_clear(&mut self.grid, &mut self.events);
        self.lines += cleared;
        self.score += cleared;

        if self.grid.hidden_filled() {
            self.game_over = true;
            self.events.push(GameEvent::GameOver);
            log::info!(
                "game over: score {}, {} lines, {} pieces",
                self.score,
                self.lines,
                self.pieces_spawned
            );
            return;
        }

        self.spawn_piece();
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        let width = self.grid.cols();
        let height = self.grid.visible_rows();

        out.mode = self.config.mode;
        out.width = width;
        out.height = height;
        out.cells.clear();
        for row in 0..height {
            out.cells.extend_from_slice(self.grid.row(row));
        }

        out.active = self.active.as_ref().map(|pair| {
            let mut cells: Vec<_> = pair.primary.visible_cells(width).into_iter().collect();
            if let Some(clone) = pair.clone.as_ref() {
                cells.extend(clone.visible_cells(width));
            }
            cells.retain(|p| p.row >= 0 && (p.row as usize) < height);
            ActiveSnapshot {
                kind: pair.primary.kind(),
                rotation: pair.primary.rotation(),
                pivot: pair.primary.pivot(),
                cells,
            }
        });

        out.score = self.score;
        out.lines = self.lines;
        out.pieces_spawned = self.pieces_spawned;
        out.game_over = self.game_over;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::GridPos;

    fn narrow() -> GameState {
        GameState::new(GameConfig::narrow().with_seed(5)).unwrap()
    }

    fn fall_until_settled(state: &mut GameState) {
        let spawned = state.pieces_spawned();
        for _ in 0..64 {
            state.apply(Command::GravityTick);
            if state.pieces_spawned() != spawned || state.game_over() {
                return;
            }
        }
        panic!("piece never settled");
    }

    #[test]
    fn test_new_spawns_first_piece() {
        let mut state = narrow();
        let pair = state.active().unwrap();
        assert_eq!(pair.primary.pivot(), GridPos::new(20, 5));
        assert!(!pair.is_linked());
        assert_eq!(state.pieces_spawned(), 1);
        assert_eq!(state.grid().boundary(), Boundary::Blocked);
        assert!(state.grid().is_filled(0, -1));

        let events = state.drain_events();
        assert!(matches!(events.as_slice(), [GameEvent::PieceSpawned(_)]));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = GameConfig::narrow();
        config.probabilities = Some(vec![0.5; 7]);
        assert!(GameState::new(config).is_err());
    }

    #[test]
    fn test_wide_session_links_clone() {
        let state = GameState::new(GameConfig::wide()).unwrap();
        let pair = state.active().unwrap();
        assert_eq!(pair.clone.as_ref().unwrap().pivot(), GridPos::new(20, -6));
        assert_eq!(state.grid().boundary(), Boundary::Open);
        assert!(!state.grid().is_filled(0, -1));
    }

    #[test]
    fn test_move_commands_shift_piece() {
        let mut state = narrow();
        state.spawn_kind(PieceKind::T);
        assert!(state.apply(Command::MoveLeft));
        assert_eq!(state.active().unwrap().primary.pivot(), GridPos::new(20, 4));
        assert!(state.apply(Command::MoveRight));
        assert!(state.apply(Command::GravityTick));
        assert_eq!(state.active().unwrap().primary.pivot(), GridPos::new(19, 5));
    }

    #[test]
    fn test_settle_spawns_next_piece() {
        let mut state = narrow();
        state.spawn_kind(PieceKind::O);
        state.drain_events();

        fall_until_settled(&mut state);

        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::PieceDropped);
        assert!(matches!(events[1], GameEvent::PieceSpawned(_)));
        assert!(state.grid().is_filled(0, 5) && state.grid().is_filled(1, 6));
    }

    #[test]
    fn test_gravity_timer_fires_at_interval() {
        let mut state = narrow();
        state.spawn_kind(PieceKind::I);

        assert!(!state.tick(699, false, &[]));
        assert_eq!(state.active().unwrap().primary.pivot().row, 20);
        assert!(state.tick(1, false, &[]));
        assert_eq!(state.active().unwrap().primary.pivot().row, 19);
        // Timer restarted from zero
        assert!(!state.tick(16, false, &[]));
    }

    #[test]
    fn test_soft_drop_timer_resets_on_release() {
        let mut state = narrow();
        state.spawn_kind(PieceKind::I);

        assert!(!state.tick(60, true, &[]));
        assert!(!state.tick(0, false, &[]));
        assert!(!state.tick(60, true, &[]));
        assert_eq!(state.active().unwrap().primary.pivot().row, 20);
        assert!(state.tick(40, true, &[]));
        assert_eq!(state.active().unwrap().primary.pivot().row, 19);
    }

    #[test]
    fn test_commands_apply_before_timers() {
        let mut state = narrow();
        state.spawn_kind(PieceKind::T);
        assert!(state.tick(700, false, &[Command::MoveLeft, Command::MoveLeft]));
        assert_eq!(state.active().unwrap().primary.pivot(), GridPos::new(19, 3));
    }

    #[test]
    fn test_line_clear_scores() {
        let mut state = narrow();
        for col in 0..8 {
            state.grid.set_filled(0, col);
        }
        state.spawn_kind(PieceKind::D);
        state.drain_events();
        // D spans cols 5..=6; shift right to 8..=9
        for _ in 0..3 {
            assert!(state.apply(Command::MoveRight));
        }
        fall_until_settled(&mut state);

        assert_eq!(state.score(), 1);
        assert_eq!(state.lines(), 1);
        assert_eq!(state.grid().filled_count(), 0);
        let events = state.drain_events();
        assert_eq!(
            &events[..4],
            &[
                GameEvent::PieceDropped,
                GameEvent::LineDestroyed(0),
                GameEvent::LinesShifted(0),
                GameEvent::ScoreChanged(1),
            ]
        );
    }

    #[test]
    fn test_game_over_fires_once_and_freezes() {
        let mut state = narrow();
        // A column reaching the hidden buffer under the spawn point
        for row in 0..20 {
            state.grid.set_filled(row, 5);
        }
        state.spawn_kind(PieceKind::T);
        state.drain_events();

        state.apply(Command::GravityTick);
        assert!(state.game_over());
        assert!(state.active().is_none());

        let events = state.drain_events();
        assert_eq!(events, vec![GameEvent::PieceDropped, GameEvent::GameOver]);

        assert!(!state.apply(Command::MoveLeft));
        assert!(!state.tick(10_000, true, &[Command::GravityTick]));
        assert!(!state.spawn_kind(PieceKind::I));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = narrow();
        let mut b = narrow();
        for _ in 0..500 {
            a.tick(16, true, &[]);
            b.tick(16, true, &[]);
        }
        assert_eq!(a.drain_events(), b.drain_events());
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_snapshot_shows_visible_area_only() {
        let mut state = narrow();
        state.grid.set_filled(0, 0);
        state.grid.set_filled(21, 0);
        state.spawn_kind(PieceKind::I);

        let snap = state.snapshot();
        assert_eq!((snap.width, snap.height), (10, 20));
        assert_eq!(snap.cells.len(), 200);
        assert!(snap.is_filled(0, 0));
        // Spawned on the first hidden row, so nothing is visible yet
        assert!(snap.active.as_ref().unwrap().cells.is_empty());

        state.apply(Command::GravityTick);
        let snap = state.snapshot();
        assert_eq!(snap.active.as_ref().unwrap().cells.len(), 4);
        assert!(snap.is_active(19, 4));
    }
}
