// src/services/undo.rs
//! One-slot undo ledger.
//!
//! Holds at most one deep snapshot of (habits, user) taken right before the
//! most recent check-in mutated anything. Restoring is a verbatim copy-back,
//! never a reverse computation, so it cannot drift from the forward logic.
//! Expiry is a deadline carried by the pending entry; re-arming replaces it.

use crate::model::{Habit, UserStats};

/// Deep copy of everything a check-in can touch. `Vec<Habit>`/`UserStats`
/// own all of their substructure, so `Clone` shares nothing with live state.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoSnapshot {
    pub habit_id: String,
    pub previous_habits: Vec<Habit>,
    pub previous_user: UserStats,
}

#[derive(Debug, Default)]
pub struct UndoLedger {
    pending: Option<Pending>,
}

#[derive(Debug)]
struct Pending {
    snapshot: UndoSnapshot,
    expires_at_ms: i64,
}

impl UndoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any prior pending snapshot and re-arm the expiry deadline.
    pub fn record(&mut self, snapshot: UndoSnapshot, now_ms: i64, window_ms: i64) {
        self.pending = Some(Pending {
            snapshot,
            expires_at_ms: now_ms + window_ms,
        });
    }

    /// Drop the pending snapshot if its window has elapsed. No state change
    /// beyond forgetting the snapshot; not an error condition.
    pub fn expire_due(&mut self, now_ms: i64) {
        if let Some(p) = &self.pending {
            if now_ms >= p.expires_at_ms {
                self.pending = None;
            }
        }
    }

    pub fn is_pending(&mut self, now_ms: i64) -> bool {
        self.expire_due(now_ms);
        self.pending.is_some()
    }

    /// Hand out the snapshot for restoration and clear the slot. `None` when
    /// nothing valid is pending (including just-expired), which callers
    /// treat as a no-op.
    pub fn take(&mut self, now_ms: i64) -> Option<UndoSnapshot> {
        self.expire_due(now_ms);
        self.pending.take().map(|p| p.snapshot)
    }

    /// Dismiss without restoring (the user waved the toast away).
    pub fn clear(&mut self) {
        self.pending = None;
    }
}
