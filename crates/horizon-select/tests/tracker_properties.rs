//! Selection-set behaviour that must hold for any sequence of operations.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use horizon_select::model::Polarity;
use horizon_select::prelude::*;

use common::{FakeGridHost, Pointer, engine, provider, provisional, selected};

fn tracker(count: u64) -> SelectionTracker<u64> {
    SelectionTracker::new(provider(count), Arc::new(select_anything()), SelectionMode::Multi)
}

#[test]
fn test_repeated_operations_are_idempotent() {
    let mut tracker = tracker(20);
    let changes = Arc::new(AtomicUsize::new(0));
    let counter = changes.clone();
    let _guard = tracker.observe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(tracker.select(&3));
    assert!(!tracker.select(&3));
    assert!(tracker.deselect(&3));
    assert!(!tracker.deselect(&3));
    assert!(!tracker.clear_selection());
    assert_eq!(changes.load(Ordering::SeqCst), 2);

    for key in 0..20 {
        let before = tracker.is_selected(&key);
        tracker.toggle(&key);
        tracker.toggle(&key);
        assert_eq!(tracker.is_selected(&key), before);
        tracker.toggle(&key);
        if key % 3 == 0 {
            tracker.toggle(&key);
        }
    }
    let expected: Vec<u64> = (0..20).filter(|k| k % 3 != 0).collect();
    let mut keys: Vec<u64> = tracker.selection().iter().copied().collect();
    keys.sort_unstable();
    assert_eq!(keys, expected);
}

#[test]
fn test_provisional_never_touches_committed() {
    let mut tracker = tracker(20);
    tracker.set_items_selected([1, 2, 3], true);

    for window in [0..5u64, 4..9, 10..12, 2..3] {
        tracker.set_provisional_selection(window.clone());
        for key in window {
            assert!(tracker.is_selected(&key));
        }
        assert!(tracker.clear_provisional_selection());
        let committed: Vec<u64> = tracker.selection().selected().iter().copied().collect();
        assert_eq!(committed, vec![1, 2, 3]);
    }

    // Deselect polarity hides committed items without removing them.
    tracker.set_provisional_selection_with([2, 3], Polarity::Deselect);
    assert!(!tracker.is_selected(&2));
    assert!(tracker.selection().is_committed(&2));
    tracker.clear_provisional_selection();
    assert!(tracker.is_selected(&2));
}

#[test]
fn test_merge_commits_exactly_the_provisional_set() {
    let mut tracker = tracker(20);
    tracker.set_items_selected([0, 19], true);
    tracker.set_provisional_selection([5, 6, 7]);
    assert!(tracker.merge_provisional_selection());

    let mut keys: Vec<u64> = tracker.selection().iter().copied().collect();
    keys.sort_unstable();
    assert_eq!(keys, vec![0, 5, 6, 7, 19]);
    assert!(!tracker.selection().has_provisional());
    assert!(!tracker.merge_provisional_selection());
}

#[test]
fn test_snapshot_survives_json_and_restore() {
    let (mut engine, _) = engine(30);
    let mut host = FakeGridHost::standard(30);
    engine.tracker_mut().set_items_selected([4, 9, 17], true);

    let json = engine.snapshot().to_json().unwrap();
    let restored_count = Arc::new(AtomicUsize::new(0));
    let counter = restored_count.clone();
    let _guard = engine.tracker().selection_restored.connect_scoped(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    engine.tracker_mut().clear_selection();
    engine.tracker_mut().set_provisional_selection([1, 2]);
    let snapshot = SelectionSnapshot::<u64>::from_json(&json).unwrap();
    engine.restore(snapshot, &mut host);

    assert_eq!(selected(&engine), vec![4, 9, 17]);
    assert!(provisional(&engine).is_empty());
    assert_eq!(restored_count.load(Ordering::SeqCst), 1);
    assert!(host.invalidations > 0);
    assert!(SelectionSnapshot::<u64>::from_json("[1, 2").is_err());
}

#[test]
fn test_restore_cancels_gesture_in_progress() {
    let (mut engine, _) = engine(40);
    let mut host = FakeGridHost::standard(40);
    let saved = engine.snapshot();
    let mut mouse = Pointer::new(ToolType::Mouse);

    engine.handle_pointer_event(&mouse.down(450.0, 10.0), &mut host);
    engine.handle_pointer_event(&mouse.moved(150.0, 120.0), &mut host);
    assert!(engine.is_gesture_active());

    engine.restore(saved, &mut host);
    assert!(!engine.is_gesture_active());
    assert!(!engine.content_lock().is_locked());
    assert!(selected(&engine).is_empty());

    // The rest of the stroke is ignored.
    engine.handle_pointer_event(&mouse.up(150.0, 120.0), &mut host);
    assert!(selected(&engine).is_empty());
}

#[test]
fn test_data_change_prunes_missing_keys() {
    let keys = Arc::new(ListKeyProvider::new((0..10u64).collect()));
    let mut engine = SelectionEngine::builder(keys.clone()).build().unwrap();
    let mut host = FakeGridHost::standard(10);
    engine.tracker_mut().set_items_selected([1, 4, 8], true);
    engine.tracker_mut().start_range(4);

    keys.set_keys(vec![0, 1, 2, 3, 5, 6, 7, 8]);
    host.items = 8;
    engine.notify_data_changed(&mut host);

    assert_eq!(selected(&engine), vec![1, 8]);
    assert!(!engine.tracker().is_range_active());
    // Operations on the removed key are absorbed.
    assert!(!engine.tracker_mut().select(&4));
    assert_eq!(selected(&engine), vec![1, 8]);
}
