//! Fixed-timestep driver
//!
//! Hosts measure wall-clock time however they like and hand the deltas to a
//! [`Runner`], which turns them into whole `TICK_MS` steps of the session.
//! Commands queued between steps are delivered with the next step.

use std::time::Duration;

use dualfall_core::GameState;
use dualfall_types::{Command, TICK_MS};

/// Steps run by one `advance` call before the backlog is dropped
pub const MAX_CATCH_UP_STEPS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Runner {
    step: Duration,
    accumulator: Duration,
    pending: Vec<Command>,
    ticks: u64,
}

impl Runner {
    pub fn new(step_ms: u32) -> Self {
        Self {
            step: Duration::from_millis(step_ms.max(1) as u64),
            accumulator: Duration::ZERO,
            pending: Vec::with_capacity(8),
            ticks: 0,
        }
    }

    pub fn step_ms(&self) -> u32 {
        self.step.as_millis() as u32
    }

    /// Steps run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn queue(&mut self, command: Command) {
        self.pending.push(command);
    }

    pub fn pending(&self) -> &[Command] {
        &self.pending
    }

    /// Add `elapsed` to the accumulator and run every whole step it holds.
    ///
    /// Returns the number of steps run. A host that stalls for a long time
    /// does not get a burst of catch-up steps: after `MAX_CATCH_UP_STEPS` the
    /// remaining time is discarded.
    pub fn advance(&mut self, state: &mut GameState, elapsed: Duration, soft_drop: bool) -> u32 {
        self.accumulator += elapsed;

        let mut steps = 0;
        while self.accumulator >= self.step {
            if steps == MAX_CATCH_UP_STEPS {
                log::debug!("dropping {:?} of tick backlog", self.accumulator);
                self.accumulator = Duration::ZERO;
                break;
            }
            self.accumulator -= self.step;
            self.step_once(state, soft_drop);
            steps += 1;
        }
        steps
    }

    /// Run exactly one step with the queued commands
    pub fn step_once(&mut self, state: &mut GameState, soft_drop: bool) -> bool {
        let changed = state.tick(self.step_ms(), soft_drop, &self.pending);
        self.pending.clear();
        self.ticks += 1;
        changed
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(TICK_MS)
    }
}
