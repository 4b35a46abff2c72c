// src/commands/api.rs
use anyhow::{Result, anyhow};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::config::CoreConfig;
use crate::model::{AppState, Category, Habit, View};
use crate::services::audit::record_action;
use crate::services::categories::{self, CategoryProgress};
use crate::services::clock::{Clock, SystemClock};
use crate::services::combo::ComboTracker;
use crate::services::progression::{self, Checkin};
use crate::services::reports::{self, DaySummary};
use crate::services::store::StateStore;
use crate::services::tips::{self, StaticTips, TipSlot, TipSource};
use crate::services::undo::{UndoLedger, UndoSnapshot};

use crate::commands::init::ensure_initialized_once;

/// The engine facade: owns the session state, the store, the combo tracker
/// and the undo ledger, and runs every operation to completion before the
/// next (single logical thread; only tip delivery is detached).
pub struct Commands {
    config: CoreConfig,
    store: StateStore,
    state: AppState,
    combo: ComboTracker,
    undo: UndoLedger,
    clock: Box<dyn Clock>,
    tips: Arc<dyn TipSource>,
    tip_slot: TipSlot,
}

/// What one `complete_habit` call did, shaped for display.
#[derive(Debug, Serialize)]
pub struct CheckinReport {
    pub applied: bool,
    /// Why the attempt was declined (`unknown_habit`, `paused`,
    /// `already_done_today`); absent when applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declined: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Checkin>,
}

impl CheckinReport {
    fn declined(reason: &str) -> Self {
        Self {
            applied: false,
            declined: Some(reason.to_string()),
            outcome: None,
        }
    }
}

/// Inline-edit payload; applied only when the new name is non-empty.
#[derive(Debug, Clone, Default)]
pub struct HabitEdit {
    pub name: String,
    pub description: String,
    pub category: String,
    pub icon: String,
}

/// Listing sort keys. Paused habits sort last regardless of key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Streak,
    Xp,
}

impl Commands {
    pub fn open() -> Result<Self> {
        Self::open_with(Box::new(SystemClock), Arc::new(StaticTips))
    }

    /// Open with explicit collaborators (tests drive the clock manually).
    pub fn open_with(clock: Box<dyn Clock>, tips: Arc<dyn TipSource>) -> Result<Self> {
        let report = ensure_initialized_once()?;
        let config = report.config.clone();

        let store = StateStore::open(
            config
                .storage
                .state_path
                .to_str()
                .ok_or_else(|| anyhow!("invalid UTF-8 state path"))?,
        )?;
        let state = store.load_state()?;

        record_action(
            "commands",
            "engine_opened",
            &json!({"habits": state.habits.len(), "level": state.user.level}),
            "low",
        );

        Ok(Self {
            config,
            store,
            state,
            combo: ComboTracker::new(),
            undo: UndoLedger::new(),
            clock,
            tips,
            tip_slot: TipSlot::default(),
        })
    }

    // ---------- check-in & undo ----------

    /// Apply today's check-in for a habit. Unknown, paused, and already-done
    /// habits decline the attempt; nothing is mutated or persisted for a
    /// declined attempt.
    pub fn complete_habit(&mut self, habit_id: &str) -> Result<CheckinReport> {
        let today = self.clock.today();
        let now_ms = self.clock.now_ms();
        self.undo.expire_due(now_ms);

        let Some(idx) = self.state.habits.iter().position(|h| h.id == habit_id) else {
            record_action(
                "commands",
                "checkin_declined",
                &json!({"habit_id": habit_id, "reason": "unknown_habit"}),
                "low",
            );
            return Ok(CheckinReport::declined("unknown_habit"));
        };

        // Deep copy before any mutation; this becomes the undo snapshot if
        // the check-in goes through.
        let previous_habits = self.state.habits.clone();
        let previous_user = self.state.user.clone();

        let outcome = match progression::complete(
            &mut self.state.habits[idx],
            &mut self.state.user,
            &mut self.combo,
            today,
            now_ms,
            &self.config.progression,
        ) {
            Ok(outcome) => outcome,
            Err(skip) => {
                record_action(
                    "commands",
                    "checkin_declined",
                    &json!({"habit_id": habit_id, "reason": skip.as_str()}),
                    "low",
                );
                return Ok(CheckinReport::declined(skip.as_str()));
            }
        };

        self.undo.record(
            UndoSnapshot {
                habit_id: habit_id.to_string(),
                previous_habits,
                previous_user,
            },
            now_ms,
            self.config.progression.undo_window_ms,
        );
        self.store.save_state(&self.state)?;

        let habit = &self.state.habits[idx];
        record_action(
            "commands",
            "checkin_applied",
            &json!({
                "habit_id": habit.id, "streak": outcome.new_streak,
                "gained": outcome.total_gained, "combo": outcome.combo_count,
            }),
            "low",
        );
        if outcome.leveled_up {
            record_action(
                "commands",
                "level_up",
                &json!({"level": self.state.user.level}),
                "medium",
            );
        }

        // Display-only; runs after the state is safely persisted.
        if self.config.services.tips_enabled {
            tips::fetch_detached(
                Arc::clone(&self.tips),
                self.tip_slot.clone(),
                habit.name.clone(),
                habit.streak,
            );
        }

        Ok(CheckinReport {
            applied: true,
            declined: None,
            outcome: Some(outcome),
        })
    }

    /// Revert the most recent check-in if its window is still open. Restores
    /// the exact prior state and resets the combo. Returns whether anything
    /// was reverted; with nothing pending this is a no-op.
    pub fn undo_last(&mut self) -> Result<bool> {
        let now_ms = self.clock.now_ms();
        let Some(snapshot) = self.undo.take(now_ms) else {
            record_action("commands", "undo_noop", &json!({}), "low");
            return Ok(false);
        };

        self.state.habits = snapshot.previous_habits;
        self.state.user = snapshot.previous_user;
        self.combo.reset();
        self.store.save_state(&self.state)?;

        record_action(
            "commands",
            "undo_applied",
            &json!({"habit_id": snapshot.habit_id}),
            "low",
        );
        Ok(true)
    }

    /// Whether the last check-in is still reversible.
    pub fn undo_pending(&mut self) -> bool {
        self.undo.is_pending(self.clock.now_ms())
    }

    /// Dismiss the pending undo without reverting (toast closed).
    pub fn dismiss_undo(&mut self) {
        self.undo.clear();
    }

    // ---------- habit lifecycle ----------

    /// Create a habit. Declines (returns `None`) on an empty name; that is
    /// the only input rule. Returns the new id otherwise.
    pub fn add_habit(
        &mut self,
        name: &str,
        description: &str,
        category: &str,
        icon: &str,
        target_streak: Option<u32>,
    ) -> Result<Option<String>> {
        if name.trim().is_empty() {
            return Ok(None);
        }
        let icon = if icon.is_empty() {
            self.state
                .categories
                .iter()
                .find(|c| c.name == category)
                .map(|c| c.icon.as_str())
                .unwrap_or("⭐")
        } else {
            icon
        };
        let habit = Habit::new(name.trim(), description, category, icon, target_streak);
        let id = habit.id.clone();
        self.state.habits.push(habit);
        self.store.save_state(&self.state)?;
        record_action(
            "commands",
            "habit_added",
            &json!({"habit_id": id, "category": category}),
            "low",
        );
        Ok(Some(id))
    }

    /// Apply an inline edit. Ignored when the new name is empty or the habit
    /// is unknown; returns whether anything changed.
    pub fn edit_habit(&mut self, habit_id: &str, edit: HabitEdit) -> Result<bool> {
        if edit.name.trim().is_empty() {
            return Ok(false);
        }
        let Some(habit) = self.state.habits.iter_mut().find(|h| h.id == habit_id) else {
            return Ok(false);
        };
        habit.name = edit.name.trim().to_string();
        habit.description = edit.description;
        habit.category = edit.category;
        habit.icon = edit.icon;
        self.store.save_state(&self.state)?;
        record_action("commands", "habit_edited", &json!({"habit_id": habit_id}), "low");
        Ok(true)
    }

    /// Flip a habit's paused flag. Returns the new value, `None` for an
    /// unknown id.
    pub fn toggle_pause(&mut self, habit_id: &str) -> Result<Option<bool>> {
        let Some(habit) = self.state.habits.iter_mut().find(|h| h.id == habit_id) else {
            return Ok(None);
        };
        habit.is_paused = !habit.is_paused;
        let paused = habit.is_paused;
        self.store.save_state(&self.state)?;
        record_action(
            "commands",
            "habit_pause_toggled",
            &json!({"habit_id": habit_id, "paused": paused}),
            "low",
        );
        Ok(Some(paused))
    }

    /// Delete a habit outright; returns whether it existed. A pending undo
    /// snapshot that references older state stays valid — it restores the
    /// full pre-check-in store verbatim.
    pub fn delete_habit(&mut self, habit_id: &str) -> Result<bool> {
        let before = self.state.habits.len();
        self.state.habits.retain(|h| h.id != habit_id);
        if self.state.habits.len() == before {
            return Ok(false);
        }
        self.store.save_state(&self.state)?;
        record_action("commands", "habit_deleted", &json!({"habit_id": habit_id}), "low");
        Ok(true)
    }

    // ---------- categories / user / view ----------

    pub fn add_category(&mut self, name: &str, icon: &str) -> Result<bool> {
        if name.trim().is_empty() {
            return Ok(false);
        }
        self.state.categories.push(Category {
            name: name.trim().to_string(),
            icon: icon.to_string(),
        });
        self.store.save_state(&self.state)?;
        record_action("commands", "category_added", &json!({"name": name.trim()}), "low");
        Ok(true)
    }

    pub fn delete_category(&mut self, name: &str) -> Result<bool> {
        let before = self.state.categories.len();
        self.state.categories.retain(|c| c.name != name);
        if self.state.categories.len() == before {
            return Ok(false);
        }
        self.store.save_state(&self.state)?;
        record_action("commands", "category_deleted", &json!({"name": name}), "low");
        Ok(true)
    }

    pub fn set_username(&mut self, username: &str) -> Result<()> {
        self.state.user.username = username.to_string();
        self.store.save_state(&self.state)
    }

    pub fn set_view(&mut self, view: View) -> Result<()> {
        self.state.view = view;
        self.store.save_state(&self.state)
    }

    // ---------- reads ----------

    pub fn habits(&self) -> &[Habit] {
        &self.state.habits
    }

    pub fn user(&self) -> &crate::model::UserStats {
        &self.state.user
    }

    pub fn categories(&self) -> &[Category] {
        &self.state.categories
    }

    pub fn view(&self) -> View {
        self.state.view
    }

    /// Latest motivational line (empty until the first delivery).
    pub fn current_tip(&self) -> String {
        self.tip_slot.get()
    }

    /// XP needed to advance one level, for progress displays.
    pub fn xp_per_level(&self) -> u64 {
        self.config.progression.xp_per_level
    }

    pub fn combo_count(&self) -> u32 {
        self.combo.count()
    }

    /// Habits for display: optional category filter, chosen sort, paused
    /// habits always last.
    pub fn list(&self, category: Option<&str>, sort: SortKey) -> Vec<&Habit> {
        let mut out: Vec<&Habit> = self
            .state
            .habits
            .iter()
            .filter(|h| category.map_or(true, |c| h.category == c))
            .collect();
        out.sort_by(|a, b| {
            a.is_paused.cmp(&b.is_paused).then_with(|| match sort {
                SortKey::Name => a.name.cmp(&b.name),
                SortKey::Streak => b.streak.cmp(&a.streak),
                SortKey::Xp => b.xp.cmp(&a.xp),
            })
        });
        out
    }

    pub fn category_progress(&self) -> Vec<CategoryProgress> {
        categories::progress(&self.state.categories, &self.state.habits)
    }

    /// Trailing daily XP series ending today (display data for the chart).
    pub fn daily_report(&self, days: u32) -> Vec<DaySummary> {
        reports::daily_xp(
            &self.state.habits,
            self.clock.today(),
            days,
            self.config.progression.xp_per_checkin,
        )
    }
}
