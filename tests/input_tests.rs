// Host-side tests for the pure input mapping.

use globe_fx::constants::*;
use globe_fx::effects::WaveKind;
use globe_fx::input::{action_for_key, Command, InputEvent, PointerTracker};
use glam::Vec2;

#[test]
fn keys_map_to_commands() {
    assert_eq!(action_for_key('e'), Some(Command::Trigger(WaveKind::Emp)));
    assert_eq!(action_for_key('S'), Some(Command::Trigger(WaveKind::Sound)));
    assert_eq!(action_for_key(' '), Some(Command::ToggleAutoRotate));
    assert_eq!(action_for_key('\n'), Some(Command::ToggleFullscreen));
    assert_eq!(action_for_key('x'), None);
}

#[test]
fn wheel_down_zooms_out() {
    let mut t = PointerTracker::default();
    match t.map(InputEvent::Wheel(100.0)) {
        Some(Command::Zoom(d)) => assert!(d < 0.0),
        other => panic!("unexpected {other:?}"),
    }
    match t.map(InputEvent::Pinch(20.0)) {
        Some(Command::Zoom(d)) => assert!((d - 20.0 * PINCH_ZOOM_PER_PX).abs() < 1e-6),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn moves_without_press_are_ignored() {
    let mut t = PointerTracker::default();
    assert_eq!(t.map(InputEvent::PointerMove(Vec2::new(5.0, 5.0))), None);
    assert_eq!(t.map(InputEvent::PointerUp(Vec2::ZERO)), None);
}

#[test]
fn click_after_drag_is_suppressed() {
    let mut t = PointerTracker::default();
    t.map(InputEvent::PointerDown(Vec2::ZERO));
    assert_eq!(
        t.map(InputEvent::PointerMove(Vec2::new(40.0, 0.0))),
        Some(Command::Drag(Vec2::new(40.0, 0.0)))
    );
    assert_eq!(t.map(InputEvent::PointerUp(Vec2::new(40.0, 0.0))), Some(Command::EndDrag));
    assert_eq!(t.map(InputEvent::Click), None);
    // only the click right after the drag is eaten
    assert_eq!(t.map(InputEvent::Click), Some(Command::ToggleAutoRotate));
}

#[test]
fn small_jitter_still_clicks() {
    let mut t = PointerTracker::default();
    t.map(InputEvent::PointerDown(Vec2::ZERO));
    t.map(InputEvent::PointerMove(Vec2::new(1.0, 1.0)));
    t.map(InputEvent::PointerUp(Vec2::new(1.0, 1.0)));
    assert_eq!(t.map(InputEvent::Click), Some(Command::ToggleAutoRotate));
    assert_eq!(t.map(InputEvent::DoubleClick), Some(Command::ToggleFullscreen));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_consistent() {
    assert!(GLOBE_RADIUS < DRONE_ORBIT_RADIUS);
    assert!(DRONE_SPEED_MIN > 0.0 && DRONE_SPEED_MIN <= DRONE_SPEED_MAX);
    assert!(MIN_ZOOM > 0.0 && MIN_ZOOM < MAX_ZOOM);
    assert!(PITCH_LIMIT < std::f32::consts::FRAC_PI_2);
    assert!(MARKER_DECAY > 0.0 && MARKER_DECAY < 1.0);
    assert!(EXPLOSION_SHRINK > 0.0 && EXPLOSION_SHRINK < 1.0);
    // every wave must be able to sweep through the drone shell
    assert!(EMP_MAX_SCALE * WAVE_BASE_RADIUS > DRONE_ORBIT_RADIUS + COLLISION_TOLERANCE);
    assert!(SOUND_MAX_SCALE * WAVE_BASE_RADIUS > DRONE_ORBIT_RADIUS + COLLISION_TOLERANCE);
}
