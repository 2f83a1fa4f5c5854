//! Event queue - FIFO delivery of [`GameEvent`]s to the host
//!
//! Components push events while they run; the host drains them after each
//! command or tick, in the order they were raised.

use std::collections::VecDeque;

use crate::types::GameEvent;

#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        log::trace!("event {}", event.as_str());
        self.pending.push_back(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
