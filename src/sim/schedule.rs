//! Deferred single-shot actions keyed by simulation step
//!
//! Pacing delays (spawning the next block, finishing the exit transition)
//! are queued here instead of running on timers. Restarting a game clears
//! the queue, so nothing from the previous game can fire into the new one.

use serde::{Deserialize, Serialize};

/// Something the session does later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Spawn the next active block after a committed placement
    SpawnNext,
    /// Exit transition done; the game is over
    FinishExit,
}

#[derive(Debug, Clone)]
struct Pending {
    due: u64,
    action: Action,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to fire once `now + delay` is reached
    pub fn schedule(&mut self, now: u64, delay: u32, action: Action) {
        self.pending.push(Pending {
            due: now + delay as u64,
            action,
        });
    }

    /// Remove and return every action due at `now`, oldest deadline first
    pub fn take_due(&mut self, now: u64) -> Vec<Action> {
        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.due <= now {
                due.push(p.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|p| p.due);
        due.into_iter().map(|p| p.action).collect()
    }

    /// Drop everything queued so far
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
