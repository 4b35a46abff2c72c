use habitquest_core::services::combo::ComboTracker;

const WINDOW_MS: i64 = 60_000;

#[test]
fn escalates_inside_the_window_and_resets_outside() {
    let mut combo = ComboTracker::new();

    // First completion never chains.
    assert!(!combo.note_completion(0, WINDOW_MS));
    assert_eq!(combo.count(), 0);

    // 30 s later: inside the window, chains.
    assert!(combo.note_completion(30_000, WINDOW_MS));
    assert_eq!(combo.count(), 1);
    assert!(combo.is_active());

    // 65 s after the previous completion: outside the sliding window, resets.
    assert!(!combo.note_completion(95_000, WINDOW_MS));
    assert_eq!(combo.count(), 0);
    assert!(!combo.is_active());
}

#[test]
fn window_is_strict_less_than() {
    let mut combo = ComboTracker::new();
    combo.note_completion(0, WINDOW_MS);
    // A gap of exactly the window does not chain.
    assert!(!combo.note_completion(WINDOW_MS, WINDOW_MS));
    assert_eq!(combo.count(), 0);
}

#[test]
fn chains_keep_escalating_while_completions_stay_close() {
    let mut combo = ComboTracker::new();
    combo.note_completion(0, WINDOW_MS);
    for i in 1..=4 {
        assert!(combo.note_completion(i * 10_000, WINDOW_MS));
    }
    assert_eq!(combo.count(), 4);
}

#[test]
fn reset_clears_count_and_active_flag() {
    let mut combo = ComboTracker::new();
    combo.note_completion(0, WINDOW_MS);
    combo.note_completion(10_000, WINDOW_MS);
    assert_eq!(combo.count(), 1);

    combo.reset();
    assert_eq!(combo.count(), 0);
    assert!(!combo.is_active());
}
