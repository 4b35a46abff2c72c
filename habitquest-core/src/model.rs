// src/model.rs
//! Persisted domain records.
//!
//! Field names serialize in camelCase to stay wire-compatible with the
//! records the original web client wrote under the `habit_quest_*` keys.
//! Fields that were added after the first release carry `#[serde(default)]`
//! so older rows are repaired on load rather than rejected.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One tracked behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Opaque unique id, assigned at creation, never changed.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub icon: String,
    /// Consecutive qualifying calendar days completed.
    pub streak: u32,
    /// Day of the most recent check-in, if any.
    pub last_completed: Option<NaiveDate>,
    /// Every day a check-in was recorded. Append-only; the same-day guard
    /// in the engine makes duplicates impossible.
    #[serde(default)]
    pub history: Vec<NaiveDate>,
    /// Cumulative XP attributed to this habit (independent of user level).
    pub xp: u64,
    /// Optional streak goal; reaching it is derived, never stored.
    #[serde(default)]
    pub target_streak: Option<u32>,
    /// Paused habits cannot be checked in and sort last in listings.
    #[serde(default)]
    pub is_paused: bool,
}

impl Habit {
    pub fn new(
        name: &str,
        description: &str,
        category: &str,
        icon: &str,
        target_streak: Option<u32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            icon: icon.to_string(),
            streak: 0,
            last_completed: None,
            history: Vec::new(),
            xp: 0,
            target_streak,
            is_paused: false,
        }
    }

    /// Whether the declared streak goal (if any) has been met.
    pub fn target_reached(&self) -> bool {
        match self.target_streak {
            Some(t) if t > 0 => self.streak >= t,
            _ => false,
        }
    }
}

/// Per-user progression totals. `xp` is progress within the current level;
/// `total_xp` is an independent lifetime running sum. Both move together on
/// every check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub xp: u64,
    pub level: u32,
    pub total_xp: u64,
    #[serde(default)]
    pub username: String,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            total_xp: 0,
            username: String::new(),
        }
    }
}

/// A display bucket for habits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub icon: String,
}

/// Which screen the client is showing. Not an engine concern, but it shares
/// the persistence boundary with the rest of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Login,
    Dashboard,
    Settings,
}

/// The whole in-memory session: everything the store persists and the
/// engine mutates. Owned by `Commands`; engine functions receive the pieces
/// they need explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub habits: Vec<Habit>,
    pub user: UserStats,
    pub categories: Vec<Category>,
    pub view: View,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            habits: Vec::new(),
            user: UserStats::default(),
            categories: crate::services::categories::defaults(),
            view: View::default(),
        }
    }
}
