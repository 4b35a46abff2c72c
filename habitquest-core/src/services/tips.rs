// src/services/tips.rs
//! Motivational tip collaborator.
//!
//! The tip text is pure display: it is fetched fire-and-forget after a
//! check-in has been applied and persisted, and only ever lands in a
//! display slot. A failing source degrades to a fixed fallback line; a
//! stale response merely overwrites the slot.

use anyhow::Result;
use std::sync::{Arc, Mutex};
use std::thread;

/// Shown when the source errors out.
pub const FALLBACK_TIP: &str = "Fate smiles on the persistent. Press on!";

pub trait TipSource: Send + Sync {
    /// One or two motivational sentences for a habit at the given streak.
    fn tip(&self, habit_name: &str, streak: u32) -> Result<String>;
}

/// Offline phrase table standing in for a remote text generator. Picks a
/// line deterministically from the habit name and streak so repeated calls
/// for the same state agree.
pub struct StaticTips;

static LINES: &[&str] = &[
    "Continue your journey, hero! Glory awaits.",
    "Every streak was once a single day. Guard this one.",
    "Discipline is the rarest loot. You just picked some up.",
    "The next rank is closer than it looks. March on.",
    "Small quests, repeated, fell great beasts.",
    "Your future self is already cheering for today's check-in.",
];

impl TipSource for StaticTips {
    fn tip(&self, habit_name: &str, streak: u32) -> Result<String> {
        let idx = (habit_name.len() + streak as usize) % LINES.len();
        Ok(LINES[idx].to_string())
    }
}

/// Where the latest tip lands. Cloneable handle; the mutex only guards the
/// hand-off from the detached fetch thread.
#[derive(Clone, Default)]
pub struct TipSlot(Arc<Mutex<String>>);

impl TipSlot {
    pub fn set(&self, text: String) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = text;
        }
    }

    pub fn get(&self) -> String {
        self.0.lock().map(|slot| slot.clone()).unwrap_or_default()
    }
}

/// Resolve a tip on a detached thread and deliver it into `slot`.
/// Overlapping requests are not de-duplicated; last writer wins.
pub fn fetch_detached(source: Arc<dyn TipSource>, slot: TipSlot, habit_name: String, streak: u32) {
    thread::spawn(move || {
        let text = source
            .tip(&habit_name, streak)
            .unwrap_or_else(|_| FALLBACK_TIP.to_string());
        slot.set(text);
    });
}
