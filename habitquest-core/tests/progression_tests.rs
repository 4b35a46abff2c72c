use chrono::NaiveDate;

use habitquest_core::config::ProgressionConfig;
use habitquest_core::model::{Habit, UserStats};
use habitquest_core::services::combo::ComboTracker;
use habitquest_core::services::progression::{self, Skip};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn fresh_habit() -> Habit {
    Habit::new("Read", "ten pages", "Learning", "📚", None)
}

fn cfg() -> ProgressionConfig {
    ProgressionConfig::default()
}

#[test]
fn first_checkin_starts_streak_at_one() {
    let mut habit = fresh_habit();
    let mut user = UserStats::default();
    let mut combo = ComboTracker::new();
    let today = day(2025, 6, 10);

    let out = progression::complete(&mut habit, &mut user, &mut combo, today, 0, &cfg())
        .expect("applied");

    assert_eq!(out.new_streak, 1);
    // 100 base + floor(1 * 1.1) = 101, no combo on the first completion
    assert_eq!(out.streak_bonus, 1);
    assert_eq!(out.combo_bonus, 0);
    assert_eq!(out.total_gained, 101);
    assert_eq!(habit.streak, 1);
    assert_eq!(habit.last_completed, Some(today));
    assert_eq!(habit.history, vec![today]);
    assert_eq!(habit.xp, 101);
    assert_eq!(user.xp, 101);
    assert_eq!(user.total_xp, 101);
    assert_eq!(user.level, 1);
}

#[test]
fn consecutive_day_continues_streak() {
    let mut habit = fresh_habit();
    habit.streak = 2;
    habit.last_completed = Some(day(2025, 6, 9));
    habit.history = vec![day(2025, 6, 8), day(2025, 6, 9)];
    let mut user = UserStats::default();
    let mut combo = ComboTracker::new();

    let out = progression::complete(&mut habit, &mut user, &mut combo, day(2025, 6, 10), 0, &cfg())
        .expect("applied");

    assert_eq!(out.new_streak, 3);
    // 100 + floor(3 * 1.1) = 103
    assert_eq!(out.total_gained, 103);
    assert_eq!(habit.history.len(), 3);
}

#[test]
fn gap_of_two_days_resets_streak_to_one() {
    let mut habit = fresh_habit();
    habit.streak = 7;
    habit.last_completed = Some(day(2025, 6, 5));
    let mut user = UserStats::default();
    let mut combo = ComboTracker::new();

    let out = progression::complete(&mut habit, &mut user, &mut combo, day(2025, 6, 8), 0, &cfg())
        .expect("applied");

    // The completion itself still counts as day one of the new streak.
    assert_eq!(out.new_streak, 1);
    assert_eq!(habit.streak, 1);
}

#[test]
fn second_checkin_on_same_day_changes_nothing() {
    let mut habit = fresh_habit();
    let mut user = UserStats::default();
    let mut combo = ComboTracker::new();
    let today = day(2025, 6, 10);

    progression::complete(&mut habit, &mut user, &mut combo, today, 0, &cfg()).expect("applied");
    let habit_after = habit.clone();
    let user_after = user.clone();
    let combo_after = combo.clone();

    let second = progression::complete(&mut habit, &mut user, &mut combo, today, 1, &cfg());
    assert_eq!(second, Err(Skip::AlreadyDoneToday));
    assert_eq!(habit, habit_after);
    assert_eq!(user, user_after);
    assert_eq!(combo, combo_after);
}

#[test]
fn paused_habit_declines_regardless_of_date_logic() {
    let mut habit = fresh_habit();
    habit.is_paused = true;
    habit.streak = 4;
    habit.last_completed = Some(day(2025, 6, 9));
    let mut user = UserStats::default();
    let mut combo = ComboTracker::new();

    let result =
        progression::complete(&mut habit, &mut user, &mut combo, day(2025, 6, 10), 0, &cfg());
    assert_eq!(result, Err(Skip::Paused));
    assert_eq!(habit.streak, 4);
    assert!(habit.history.is_empty());
    assert_eq!(user.total_xp, 0);
    // Declined attempts must not count toward a combo either.
    assert_eq!(combo, ComboTracker::new());
}

#[test]
fn combo_bonus_lands_in_the_total() {
    let mut first = fresh_habit();
    let mut second = Habit::new("Run", "", "Fitness", "💪", None);
    let mut user = UserStats::default();
    let mut combo = ComboTracker::new();
    let today = day(2025, 6, 10);

    progression::complete(&mut first, &mut user, &mut combo, today, 0, &cfg()).expect("applied");
    let out = progression::complete(&mut second, &mut user, &mut combo, today, 30_000, &cfg())
        .expect("applied");

    assert!(out.combo_active);
    assert_eq!(out.combo_count, 1);
    assert_eq!(out.combo_bonus, 25);
    // 100 + floor(1 * 1.1) + 1 * 25
    assert_eq!(out.total_gained, 126);
    assert!(out.total_gained >= cfg().xp_per_checkin);
}

#[test]
fn streak_bonus_uses_floor_not_rounding() {
    let tuning = cfg();
    assert_eq!(progression::streak_bonus(9, &tuning), 9); // floor(9.9)
    assert_eq!(progression::streak_bonus(10, &tuning), 11); // floor(11.0)
    assert_eq!(progression::streak_bonus(19, &tuning), 20); // floor(20.9)
}

#[test]
fn leveling_carries_remainder() {
    let mut habit = fresh_habit();
    let mut user = UserStats {
        xp: 950,
        level: 1,
        total_xp: 950,
        username: String::new(),
    };
    let mut combo = ComboTracker::new();

    let out = progression::complete(&mut habit, &mut user, &mut combo, day(2025, 6, 10), 0, &cfg())
        .expect("applied");

    assert!(out.leveled_up);
    assert_eq!(user.level, 2);
    assert_eq!(user.xp, 51); // 950 + 101 - 1000
    assert_eq!(user.total_xp, 1051);
}

#[test]
fn large_gain_jumps_multiple_levels() {
    let tuning = ProgressionConfig {
        xp_per_level: 50,
        ..ProgressionConfig::default()
    };
    let mut habit = fresh_habit();
    let mut user = UserStats::default();
    let mut combo = ComboTracker::new();

    // gained = 100 + floor(1 * 1.1) = 101 → two full levels of 50, remainder 1
    let out =
        progression::complete(&mut habit, &mut user, &mut combo, day(2025, 6, 10), 0, &tuning)
            .expect("applied");

    assert!(out.leveled_up);
    assert_eq!(user.level, 3);
    assert_eq!(user.xp, 1);
    assert!(user.xp < tuning.xp_per_level);
    assert_eq!(user.total_xp, 101);
}

#[test]
fn streak_rule_matches_last_completed_exactly() {
    let today = day(2025, 6, 10);

    let mut fresh = fresh_habit();
    fresh.streak = 0;
    assert_eq!(progression::streak_after(&fresh, today), 1);

    let mut continuing = fresh_habit();
    continuing.streak = 5;
    continuing.last_completed = Some(day(2025, 6, 9));
    assert_eq!(progression::streak_after(&continuing, today), 6);

    let mut lapsed = fresh_habit();
    lapsed.streak = 5;
    lapsed.last_completed = Some(day(2025, 6, 8));
    assert_eq!(progression::streak_after(&lapsed, today), 1);
}
