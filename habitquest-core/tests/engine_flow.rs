// tests/engine_flow.rs
// End-to-end flow through the Commands facade: init → add → check in →
// combo → undo → persistence reload → streak continuation and expiry.
//
// One test function: the facade reads HABITQUEST_ROOT through a process-wide
// init gate, so the whole flow shares a single isolated root.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;

use habitquest_core::commands::Commands;
use habitquest_core::services::{ManualClock, StaticTips};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn tmp_root() -> PathBuf {
    let ns = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let pid = std::process::id();
    std::env::temp_dir().join(format!("habitquest_e2e_{pid}_{ns}"))
}

#[test]
fn full_session_flow() {
    let root = tmp_root();
    // SAFETY: set before any engine thread could read the environment.
    unsafe { std::env::set_var("HABITQUEST_ROOT", &root) };

    let clock = ManualClock::new(day(2025, 6, 1), 1_000_000);
    let mut cmds =
        Commands::open_with(Box::new(clock.clone()), Arc::new(StaticTips)).expect("open");

    // --- add habits (empty names decline) ---
    assert_eq!(cmds.add_habit("  ", "", "Health", "", None).expect("add"), None);
    let read = cmds
        .add_habit("Read", "ten pages", "Learning", "📚", Some(3))
        .expect("add")
        .expect("id");
    let run = cmds
        .add_habit("Run", "", "Fitness", "💪", None)
        .expect("add")
        .expect("id");
    assert_eq!(cmds.habits().len(), 2);

    // --- unknown ids decline without error ---
    let report = cmds.complete_habit("nope").expect("call");
    assert!(!report.applied);
    assert_eq!(report.declined.as_deref(), Some("unknown_habit"));

    // --- first check-in ---
    let report = cmds.complete_habit(&read).expect("call");
    let outcome = report.outcome.expect("applied");
    assert_eq!(outcome.new_streak, 1);
    assert_eq!(outcome.total_gained, 101);
    assert_eq!(cmds.user().total_xp, 101);

    // Same-day retry is a no-op.
    let retry = cmds.complete_habit(&read).expect("call");
    assert_eq!(retry.declined.as_deref(), Some("already_done_today"));
    assert_eq!(cmds.user().total_xp, 101);

    // --- combo across different habits inside the window ---
    let habits_after_first = cmds.habits().to_vec();
    let user_after_first = cmds.user().clone();

    clock.advance_ms(10_000);
    let report = cmds.complete_habit(&run).expect("call");
    let outcome = report.outcome.expect("applied");
    assert!(outcome.combo_active);
    assert_eq!(outcome.combo_count, 1);
    assert_eq!(outcome.total_gained, 126); // 100 + 1 + 25
    assert_eq!(cmds.combo_count(), 1);

    // --- undo inside the window restores the exact prior state ---
    clock.advance_ms(5_000);
    assert!(cmds.undo_pending());
    assert!(cmds.undo_last().expect("undo"));
    assert_eq!(cmds.habits(), &habits_after_first[..]);
    assert_eq!(cmds.user(), &user_after_first);
    assert_eq!(cmds.combo_count(), 0);

    // Nothing pending anymore.
    assert!(!cmds.undo_last().expect("undo"));

    // --- state survives a reopen (whole-record persistence) ---
    drop(cmds);
    let mut cmds =
        Commands::open_with(Box::new(clock.clone()), Arc::new(StaticTips)).expect("reopen");
    assert_eq!(cmds.habits(), &habits_after_first[..]);
    assert_eq!(cmds.user(), &user_after_first);

    // --- next day continues the streak ---
    clock.set_today(day(2025, 6, 2));
    let outcome = cmds
        .complete_habit(&read)
        .expect("call")
        .outcome
        .expect("applied");
    assert_eq!(outcome.new_streak, 2);

    // --- a multi-day gap resets to 1 ---
    clock.set_today(day(2025, 6, 5));
    let outcome = cmds
        .complete_habit(&read)
        .expect("call")
        .outcome
        .expect("applied");
    assert_eq!(outcome.new_streak, 1);

    // --- the undo window expires quietly ---
    clock.advance_ms(10_000);
    assert!(!cmds.undo_pending());
    let user_now = cmds.user().clone();
    assert!(!cmds.undo_last().expect("undo"));
    assert_eq!(cmds.user(), &user_now);

    // --- paused habits decline until resumed ---
    assert_eq!(cmds.toggle_pause(&run).expect("pause"), Some(true));
    let report = cmds.complete_habit(&run).expect("call");
    assert_eq!(report.declined.as_deref(), Some("paused"));
    assert_eq!(cmds.toggle_pause(&run).expect("resume"), Some(false));

    // Paused-last listing.
    assert_eq!(cmds.toggle_pause(&read).expect("pause"), Some(true));
    let listed = cmds.list(None, habitquest_core::commands::SortKey::Name);
    assert_eq!(listed.last().expect("some").id, read);

    let _ = std::fs::remove_dir_all(&root);
}
