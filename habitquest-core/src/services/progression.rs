// src/services/progression.rs
//! Streak and experience accounting for a single check-in.
//!
//! Pure over its inputs: the caller passes the habit, the user totals, the
//! combo tracker, the day/instant and the tuning, and gets back a typed
//! outcome. Declined attempts (paused, already done today) are ordinary
//! outcomes, not errors — callers invoke this opportunistically.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::ProgressionConfig;
use crate::model::{Habit, UserStats};

use super::combo::ComboTracker;

/// Why a check-in was declined. Unknown habit ids are the caller's concern;
/// by the time the engine runs, a habit is in hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Skip {
    Paused,
    AlreadyDoneToday,
}

impl Skip {
    pub fn as_str(&self) -> &'static str {
        match self {
            Skip::Paused => "paused",
            Skip::AlreadyDoneToday => "already_done_today",
        }
    }
}

/// Everything one accepted check-in produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checkin {
    pub new_streak: u32,
    pub base_xp: u64,
    pub streak_bonus: u64,
    pub combo_bonus: u64,
    pub total_gained: u64,
    pub leveled_up: bool,
    pub combo_active: bool,
    pub combo_count: u32,
}

/// Streak value a check-in on `today` would produce. Continuing means the
/// previous completion was exactly yesterday; a fresh habit starts counting
/// from its first completion; any gap of two or more days resets to 1 (the
/// completion itself is day one of the new streak).
pub fn streak_after(habit: &Habit, today: NaiveDate) -> u32 {
    match habit.last_completed {
        None => habit.streak + 1,
        Some(last) if last.succ_opt() == Some(today) => habit.streak + 1,
        Some(_) => 1,
    }
}

/// Streak bonus for a check-in that lands on `new_streak`. Floored every
/// time; the multiplier never compounds beyond the streak value itself.
pub fn streak_bonus(new_streak: u32, cfg: &ProgressionConfig) -> u64 {
    (new_streak as f64 * cfg.streak_bonus_multiplier).floor() as u64
}

/// Apply one check-in on `today` at instant `now_ms`.
///
/// On success mutates the habit (streak, last_completed, history, xp), the
/// user totals (xp/level with multi-level carry, total_xp), and the combo
/// tracker, in that order of concern. On a declined attempt nothing is
/// touched, including the combo tracker — only *accepted* completions count
/// toward a combo.
pub fn complete(
    habit: &mut Habit,
    user: &mut UserStats,
    combo: &mut ComboTracker,
    today: NaiveDate,
    now_ms: i64,
    cfg: &ProgressionConfig,
) -> Result<Checkin, Skip> {
    if habit.is_paused {
        return Err(Skip::Paused);
    }
    if habit.last_completed == Some(today) {
        return Err(Skip::AlreadyDoneToday);
    }

    let new_streak = streak_after(habit, today);
    let combo_active = combo.note_completion(now_ms, cfg.combo_window_ms);
    let bonus = streak_bonus(new_streak, cfg);
    let combo_bonus = combo.count() as u64 * cfg.combo_unit_bonus;
    let total_gained = cfg.xp_per_checkin + bonus + combo_bonus;

    habit.streak = new_streak;
    habit.last_completed = Some(today);
    // The same-day guard above is what keeps history duplicate-free.
    habit.history.push(today);
    habit.xp += total_gained;

    let mut new_xp = user.xp + total_gained;
    let mut leveled_up = false;
    while new_xp >= cfg.xp_per_level {
        new_xp -= cfg.xp_per_level;
        user.level += 1;
        leveled_up = true;
    }
    user.xp = new_xp;
    user.total_xp += total_gained;

    Ok(Checkin {
        new_streak,
        base_xp: cfg.xp_per_checkin,
        streak_bonus: bonus,
        combo_bonus,
        total_gained,
        leveled_up,
        combo_active,
        combo_count: combo.count(),
    })
}
