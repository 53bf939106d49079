//! Long-press paint selection driven through the full engine.

mod common;

use horizon_select::config::HandlerKind;
use horizon_select::gesture_selection::PaintState;
use horizon_select::prelude::*;

use common::{FakeGridHost, Pointer, engine, provider, provisional, selected};

/// Press on `position` and hold until the long-press timer fires.
fn long_press(engine: &mut SelectionEngine<u64>, host: &mut FakeGridHost, finger: &mut Pointer, position: usize) {
    let at = host.center_of(position);
    engine.handle_pointer_event(&finger.down(at.x, at.y), host);
    let now = finger.advance(500);
    assert_eq!(engine.pump_timers(now, host), 1);
}

#[test]
fn test_paint_selects_contiguous_run() {
    common::init_tracing();
    let (mut engine, recorded) = engine(40);
    let mut host = FakeGridHost::standard(40);
    let mut finger = Pointer::new(ToolType::Finger);

    long_press(&mut engine, &mut host, &mut finger, 1);
    assert!(engine.is_gesture_active());
    assert_eq!(provisional(&engine), vec![1]);
    assert_eq!(recorded.lock().haptics, 1);

    // A fast sweep straight to position 6 still paints 2 through 5.
    let to = host.center_of(6);
    assert!(engine.handle_pointer_event(&finger.moved(to.x, to.y), &mut host));
    assert_eq!(provisional(&engine), vec![1, 2, 3, 4, 5, 6]);
    assert!(selected(&engine).is_empty());

    // Sweeping back un-paints.
    let back = host.center_of(3);
    engine.handle_pointer_event(&finger.moved(back.x, back.y), &mut host);
    assert_eq!(provisional(&engine), vec![1, 2, 3]);

    assert!(engine.handle_pointer_event(&finger.up(back.x, back.y), &mut host));
    assert_eq!(selected(&engine), vec![1, 2, 3]);
    assert!(!engine.is_gesture_active());
    assert!(!engine.content_lock().is_locked());
}

#[test]
fn test_cancel_restores_pre_gesture_selection() {
    let (mut engine, _) = engine(40);
    let mut host = FakeGridHost::standard(40);
    engine.tracker_mut().select(&20);
    let mut finger = Pointer::new(ToolType::Finger);

    long_press(&mut engine, &mut host, &mut finger, 1);
    let to = host.center_of(3);
    engine.handle_pointer_event(&finger.moved(to.x, to.y), &mut host);
    assert_eq!(provisional(&engine), vec![1, 2, 3]);

    engine.handle_pointer_event(&finger.cancel(to.x, to.y), &mut host);
    assert_eq!(selected(&engine), vec![20]);
    assert!(provisional(&engine).is_empty());
    assert!(!engine.content_lock().is_locked());
}

#[test]
fn test_long_press_detected_without_timer() {
    let (mut engine, _) = engine(40);
    let mut host = FakeGridHost::standard(40);
    let mut finger = Pointer::new(ToolType::Finger);

    let at = host.center_of(8);
    engine.handle_pointer_event(&finger.down(at.x, at.y), &mut host);
    finger.advance(600);
    // The host never pumped timers; the next event notices the long press.
    engine.handle_pointer_event(&finger.moved(at.x + 2.0, at.y), &mut host);
    assert!(engine.is_gesture_active());

    let to = host.center_of(10);
    engine.handle_pointer_event(&finger.moved(to.x, to.y), &mut host);
    engine.handle_pointer_event(&finger.up(to.x, to.y), &mut host);
    assert_eq!(selected(&engine), vec![8, 9, 10]);
}

#[test]
fn test_paint_from_selected_anchor_deselects() {
    let (mut engine, _) = engine(40);
    let mut host = FakeGridHost::standard(40);
    engine.tracker_mut().set_items_selected(0..8, true);
    let mut finger = Pointer::new(ToolType::Finger);

    long_press(&mut engine, &mut host, &mut finger, 2);
    let to = host.center_of(6);
    engine.handle_pointer_event(&finger.moved(to.x, to.y), &mut host);

    // Items under the stroke render as deselected before commit.
    assert!(!engine.tracker().is_selected(&4));
    assert!(engine.tracker().selection().is_committed(&4));

    engine.handle_pointer_event(&finger.up(to.x, to.y), &mut host);
    assert_eq!(selected(&engine), vec![0, 1, 7]);
}

#[test]
fn test_release_without_moving_selects_anchor() {
    let (mut engine, _) = engine(40);
    let mut host = FakeGridHost::standard(40);
    let mut finger = Pointer::new(ToolType::Finger);

    long_press(&mut engine, &mut host, &mut finger, 5);
    let at = host.center_of(5);
    engine.handle_pointer_event(&finger.up(at.x, at.y), &mut host);
    assert_eq!(selected(&engine), vec![5]);
}

#[test]
fn test_paint_auto_scrolls() {
    let (mut engine, _) = engine(40);
    let mut host = FakeGridHost::new(40, 4, Size::new(100.0, 50.0), Size::new(400.0, 150.0));
    let mut finger = Pointer::new(ToolType::Finger);

    long_press(&mut engine, &mut host, &mut finger, 0);
    // Into the bottom margin, over position 8.
    engine.handle_pointer_event(&finger.moved(50.0, 140.0), &mut host);
    assert_eq!(provisional(&engine), (0..=8).collect::<Vec<_>>());

    for _ in 0..4 {
        let now = finger.advance(16);
        engine.pump_timers(now, &mut host);
    }
    assert!(host.scroll.y > 0.0);
    let under = host.details_at(Point::new(50.0, 140.0)).unwrap().position as u64;
    assert!(under > 8);
    assert_eq!(provisional(&engine), (0..=under).collect::<Vec<_>>());

    engine.handle_pointer_event(&finger.up(50.0, 140.0), &mut host);
    assert_eq!(engine.timers().active_count(), 0);
    assert_eq!(selected(&engine), (0..=under).collect::<Vec<_>>());
}

#[test]
fn test_single_mode_long_press_just_selects() {
    let mut engine = SelectionEngine::builder(provider(40))
        .mode(SelectionMode::Single)
        .build()
        .unwrap();
    let mut host = FakeGridHost::standard(40);
    engine.tracker_mut().select(&9);
    let mut finger = Pointer::new(ToolType::Finger);

    long_press(&mut engine, &mut host, &mut finger, 4);
    assert!(!engine.is_gesture_active());
    assert_eq!(selected(&engine), vec![4]);
}

#[test]
fn test_finger_routed_to_band_does_not_paint() {
    let mut config = SelectionConfig::default();
    config.routing.set_handler(ToolType::Finger, HandlerKind::Band);
    let mut engine = SelectionEngine::builder(provider(40)).config(config).build().unwrap();
    let mut host = FakeGridHost::standard(40);
    let mut finger = Pointer::new(ToolType::Finger);

    long_press(&mut engine, &mut host, &mut finger, 1);
    assert!(!engine.is_gesture_active());
    assert_eq!(selected(&engine), vec![1]);
}

#[test]
fn test_paint_state_is_observable() {
    let (mut engine, _) = engine(40);
    let mut host = FakeGridHost::standard(40);
    let mut finger = Pointer::new(ToolType::Finger);

    assert_eq!(engine.paint_state(), PaintState::Idle);
    long_press(&mut engine, &mut host, &mut finger, 1);
    assert_eq!(engine.paint_state(), PaintState::Armed);

    // Jitter within the touch slop does not start painting.
    let at = host.center_of(1);
    engine.handle_pointer_event(&finger.moved(at.x + 3.0, at.y), &mut host);
    assert_eq!(engine.paint_state(), PaintState::Armed);

    let to = host.center_of(2);
    engine.handle_pointer_event(&finger.moved(to.x, to.y), &mut host);
    assert_eq!(engine.paint_state(), PaintState::Painting);

    engine.handle_pointer_event(&finger.up(to.x, to.y), &mut host);
    assert_eq!(engine.paint_state(), PaintState::Idle);
}
