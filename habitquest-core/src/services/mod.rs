// src/services/mod.rs

pub mod audit;
pub mod categories; // category defaults + target-progress aggregation
pub mod clock; // calendar/instant collaborator seam
pub mod combo; // session-global combo window
pub mod progression; // the check-in engine: streaks, XP, leveling
pub mod ranks; // static milestone table, pure lookups
pub mod reports; // trailing daily-XP series (display only)
pub mod store; // the ONLY SQLite writer
pub mod tips; // fire-and-forget motivational text
pub mod undo; // one-slot deep-snapshot ledger

// Public API
pub use clock::{Clock, ManualClock, SystemClock};
pub use combo::ComboTracker;
pub use progression::{Checkin, Skip};
pub use store::StateStore;
pub use tips::{StaticTips, TipSlot, TipSource};
pub use undo::{UndoLedger, UndoSnapshot};
