// src/services/combo.rs
//! Session-global combo tracker.
//!
//! A combo chains whenever two accepted check-ins (for any habits, not the
//! same one) land within the configured window of each other. The count
//! feeds the combo bonus in the progression engine and is reset by undo.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComboTracker {
    count: u32,
    active: bool,
    last_completion_ms: Option<i64>,
}

impl ComboTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an accepted check-in at `now_ms`. Returns whether it chained
    /// the combo. The last-completion instant is updated unconditionally.
    pub fn note_completion(&mut self, now_ms: i64, window_ms: i64) -> bool {
        let chained = self
            .last_completion_ms
            .map_or(false, |last| now_ms - last < window_ms);
        if chained {
            self.count += 1;
        } else {
            self.count = 0;
        }
        self.active = chained;
        self.last_completion_ms = Some(now_ms);
        chained
    }

    /// Undo semantically removes the most recent completion event: the count
    /// and the active flag go back to zero.
    pub fn reset(&mut self) {
        self.count = 0;
        self.active = false;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
