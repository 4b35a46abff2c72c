// src/services/reports.rs
//! Display-only derivations over habit history: the trailing daily XP
//! series and its running average. Nothing here mutates state.

use chrono::{Days, NaiveDate};

use crate::model::Habit;

#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Flat check-in XP credited to this day across all habits. History does
    /// not record bonuses, so the series shows the base rate only.
    pub xp: u64,
    /// Whether every active (non-paused) habit was completed that day.
    /// False when there are no active habits.
    pub all_completed: bool,
}

/// Per-day summary for the `days` calendar days ending at `today`,
/// ascending. Paused habits still contribute XP for days they were
/// completed, but are ignored by the all-completed flag.
pub fn daily_xp(habits: &[Habit], today: NaiveDate, days: u32, xp_per_checkin: u64) -> Vec<DaySummary> {
    let active = habits.iter().filter(|h| !h.is_paused).count();
    (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back as u64)))
        .map(|date| {
            let completed = habits.iter().filter(|h| h.history.contains(&date)).count();
            let completed_active = habits
                .iter()
                .filter(|h| !h.is_paused && h.history.contains(&date))
                .count();
            DaySummary {
                date,
                xp: completed as u64 * xp_per_checkin,
                all_completed: active > 0 && completed_active >= active,
            }
        })
        .collect()
}

/// Cumulative mean of the XP series, index-aligned with `daily_xp` output.
pub fn running_average(series: &[DaySummary]) -> Vec<f64> {
    let mut out = Vec::with_capacity(series.len());
    let mut sum = 0u64;
    for (i, day) in series.iter().enumerate() {
        sum += day.xp;
        out.push(sum as f64 / (i + 1) as f64);
    }
    out
}
