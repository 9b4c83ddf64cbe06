//! Settle timers
//!
//! A commit does not advance the queue immediately; the advance waits for
//! the exit animation. Timers here are plain deadlines checked against an
//! injected clock, so the owner can drop them all when the deck is reset
//! or torn down.

use std::time::{Duration, Instant};

use super::id::ItemId;

/// A scheduled queue advance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettleTimer {
    pub item_id: ItemId,
    pub deadline: Instant,
}

#[derive(Debug, Clone)]
pub struct SettleScheduler {
    delay: Duration,
    /// Kept in deadline order; equal deadlines keep scheduling order
    pending: Vec<SettleTimer>,
}

impl SettleScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Vec::new(),
        }
    }

    /// Schedules an advance for `item_id` one settle delay after `now`
    pub fn schedule(&mut self, item_id: ItemId, now: Instant) {
        let deadline = now + self.delay;
        let pos = self.pending.partition_point(|t| t.deadline <= deadline);
        self.pending.insert(
            pos,
            SettleTimer { item_id, deadline },
        );
    }

    /// Cancels every pending timer, returning how many were dropped
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    /// Removes and returns every timer due at `now`, earliest first
    pub fn pop_due(&mut self, now: Instant) -> Vec<SettleTimer> {
        let split = self.pending.partition_point(|t| t.deadline <= now);
        self.pending.drain(..split).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.first().map(|t| t.deadline)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}
