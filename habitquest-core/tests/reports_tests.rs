use chrono::NaiveDate;

use habitquest_core::model::{Category, Habit};
use habitquest_core::services::categories;
use habitquest_core::services::reports;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn habit_in(category: &str, target: Option<u32>, streak: u32) -> Habit {
    let mut h = Habit::new("h", "", category, "⭐", target);
    h.streak = streak;
    h
}

#[test]
fn category_with_no_targets_reports_zero_not_nan() {
    let cats = vec![Category {
        name: "Health".to_string(),
        icon: "🍎".to_string(),
    }];
    let habits = vec![habit_in("Health", None, 10)];

    let progress = categories::progress(&cats, &habits);
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].with_target, 0);
    assert_eq!(progress[0].reached, 0);
    assert_eq!(progress[0].progress, 0.0);
}

#[test]
fn untargeted_habits_stay_out_of_numerator_and_denominator() {
    let cats = vec![Category {
        name: "Fitness".to_string(),
        icon: "💪".to_string(),
    }];
    let habits = vec![
        habit_in("Fitness", Some(5), 6),  // reached
        habit_in("Fitness", Some(10), 2), // not reached
        habit_in("Fitness", None, 50),    // no target: excluded from the math
    ];

    let progress = categories::progress(&cats, &habits);
    assert_eq!(progress[0].with_target, 2);
    assert_eq!(progress[0].reached, 1);
    assert_eq!(progress[0].progress, 0.5);
}

#[test]
fn default_category_list_seeds_five_buckets() {
    let defaults = categories::defaults();
    assert_eq!(defaults.len(), 5);
    assert!(defaults.iter().any(|c| c.name == "Health"));
}

#[test]
fn daily_series_counts_flat_checkin_xp_per_day() {
    let today = day(2025, 6, 10);
    let mut read = Habit::new("Read", "", "Learning", "📚", None);
    read.history = vec![day(2025, 6, 8), day(2025, 6, 9), today];
    let mut run = Habit::new("Run", "", "Fitness", "💪", None);
    run.history = vec![day(2025, 6, 9)];

    let series = reports::daily_xp(&[read, run], today, 7, 100);
    assert_eq!(series.len(), 7);
    assert_eq!(series[0].date, day(2025, 6, 4));
    assert_eq!(series[6].date, today);

    assert_eq!(series[4].xp, 100); // June 8: one habit
    assert_eq!(series[5].xp, 200); // June 9: both habits
    assert!(series[5].all_completed);
    assert_eq!(series[6].xp, 100); // today: only Read
    assert!(!series[6].all_completed);
}

#[test]
fn paused_habits_do_not_block_the_all_completed_flag() {
    let today = day(2025, 6, 10);
    let mut active = Habit::new("Read", "", "Learning", "📚", None);
    active.history = vec![today];
    let mut paused = Habit::new("Run", "", "Fitness", "💪", None);
    paused.is_paused = true;

    let series = reports::daily_xp(&[active, paused], today, 1, 100);
    assert!(series[0].all_completed);
}

#[test]
fn no_active_habits_means_never_all_completed() {
    let today = day(2025, 6, 10);
    let mut paused = Habit::new("Run", "", "Fitness", "💪", None);
    paused.is_paused = true;
    paused.history = vec![today];

    let series = reports::daily_xp(&[paused], today, 1, 100);
    // The paused habit still contributes XP for the day it was done...
    assert_eq!(series[0].xp, 100);
    // ...but cannot satisfy "all active habits completed".
    assert!(!series[0].all_completed);
}

#[test]
fn running_average_is_the_cumulative_mean() {
    let today = day(2025, 6, 10);
    let mut h = Habit::new("Read", "", "Learning", "📚", None);
    h.history = vec![day(2025, 6, 9), today];

    let series = reports::daily_xp(&[h], today, 3, 100);
    let avg = reports::running_average(&series);
    assert_eq!(avg, vec![0.0, 50.0, 200.0 / 3.0]);
}
