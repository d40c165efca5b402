// Host-side tests driving a whole globe through the headless renderer.

use globe_fx::constants::*;
use globe_fx::effects::{HitKind, WaveKind};
use globe_fx::input::Command;
use globe_fx::render::{HeadlessRenderer, Shape};
use globe_fx::{FrameDriver, SceneConfig};
use glam::{Vec2, Vec3};
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

fn driver() -> FrameDriver<HeadlessRenderer> {
    FrameDriver::new(SceneConfig::default(), HeadlessRenderer::new(), 7)
}

fn run(d: &mut FrameDriver<HeadlessRenderer>, frames: usize, dt: Duration) {
    for _ in 0..frames {
        d.frame_with(dt);
    }
}

#[test]
fn drone_population_stops_at_cap() {
    let mut d = driver();
    run(&mut d, 1250, FRAME);
    assert_eq!(d.sim.drones.len(), DRONE_CAP);
    assert_eq!(
        d.renderer.count_where(|o| o.shape == Shape::Drone),
        DRONE_CAP
    );
    assert_eq!(d.sim.elapsed(), Duration::from_millis(20_000));
}

#[test]
fn first_drone_appears_on_first_frame() {
    let mut d = driver();
    d.frame_with(FRAME);
    assert_eq!(d.sim.drones.len(), 1);
    run(&mut d, 124, FRAME);
    assert_eq!(d.sim.drones.len(), 1);
    d.frame_with(FRAME);
    assert_eq!(d.sim.drones.len(), 2);
}

#[test]
fn drones_stay_on_their_shell() {
    let mut d = driver();
    for _ in 0..2000 {
        d.frame_with(FRAME);
        for drone in d.sim.drones.iter() {
            assert!((drone.position.length() - DRONE_ORBIT_RADIUS).abs() < 1e-4);
        }
    }
}

#[test]
fn emp_grows_then_disappears_cleanly() {
    let mut config = SceneConfig::default();
    config.drone_cap = 0;
    let mut d = FrameDriver::new(config, HeadlessRenderer::new(), 1);
    assert!(d.apply(Command::Trigger(WaveKind::Emp)));
    assert_eq!(d.sim.emp.len(), 1);

    run(&mut d, 125, Duration::from_millis(8));
    let wave = d.sim.emp.iter().next().expect("wave alive at half time");
    assert!((wave.scale() - 5.5).abs() < 1e-3, "scale {}", wave.scale());

    let before = d.renderer.disposed;
    run(&mut d, 125, Duration::from_millis(8));
    assert!(d.sim.emp.is_empty());
    assert_eq!(d.renderer.disposed, before + 1);
    assert_eq!(d.renderer.invalid_ops, 0);
    assert_eq!(d.renderer.count_where(|o| matches!(o.shape, Shape::Wave { .. })), 0);
}

#[test]
fn trigger_is_gated_by_cooldown() {
    let mut d = driver();
    assert!(d.sim.trigger(WaveKind::Sound, &mut d.renderer).is_some());
    assert!(d.sim.trigger(WaveKind::Sound, &mut d.renderer).is_none());
    assert_eq!(d.sim.sound.len(), 1);

    // other kind has its own gate
    assert!(d.sim.trigger(WaveKind::Emp, &mut d.renderer).is_some());

    d.frame_with(Duration::from_millis(ACTION_COOLDOWN_MS / 2));
    assert!(d.sim.trigger(WaveKind::Sound, &mut d.renderer).is_none());
    d.frame_with(Duration::from_millis(ACTION_COOLDOWN_MS));
    assert!(d.sim.trigger(WaveKind::Sound, &mut d.renderer).is_some());
    assert_eq!(d.sim.sound.len(), 2);
}

#[test]
fn drone_hit_by_both_waves_explodes_once() {
    let mut config = SceneConfig::default();
    config.drone_cap = 1;
    let mut d = FrameDriver::new(config, HeadlessRenderer::new(), 99);
    d.frame_with(FRAME);
    assert_eq!(d.sim.drones.len(), 1);

    d.apply(Command::Trigger(WaveKind::Emp));
    d.apply(Command::Trigger(WaveKind::Sound));

    let mut last_age: Option<Duration> = None;
    let mut explosions_seen = 0;
    for _ in 0..80 {
        d.frame_with(FRAME);
        let Some(drone) = d.sim.drones.iter().next() else {
            break;
        };
        match (last_age, drone.explosion_age()) {
            (None, Some(_)) => explosions_seen += 1,
            (Some(prev), Some(now)) => assert!(now >= prev, "explosion timer restarted"),
            (Some(_), None) => panic!("explosion vanished"),
            (None, None) => {}
        }
        last_age = drone.explosion_age();
    }
    assert_eq!(explosions_seen, 1);
    assert!(d.sim.drones.is_empty());
    assert_eq!(
        d.renderer.count_where(|o| matches!(o.shape, Shape::Drone | Shape::Particle)),
        0
    );
    assert_eq!(d.renderer.invalid_ops, 0);
}

#[test]
fn hit_at_origin_lands_on_negative_x() {
    let mut d = driver();
    d.visualize_hit(0.0, 0.0, HitKind::Read);
    let marker = d.sim.markers.iter().next().expect("marker spawned");
    assert!(marker.position().distance(Vec3::new(-GLOBE_RADIUS, 0.0, 0.0)) < 1e-5);
    assert_eq!(marker.color(), MARKER_READ_COLOR);
    assert_eq!(
        d.renderer.count_where(|o| matches!(o.shape, Shape::Spike { .. })),
        1
    );
}

#[test]
fn markers_decay_away() {
    let mut d = driver();
    d.visualize_hit(45.0, 90.0, HitKind::Other);
    run(&mut d, 100, FRAME);
    assert!(d.sim.markers.is_empty());
    assert_eq!(
        d.renderer.count_where(|o| matches!(o.shape, Shape::Spike { .. })),
        0
    );
}

#[test]
fn pitch_never_leaves_limits() {
    let mut d = driver();
    d.apply(Command::BeginDrag(Vec2::ZERO));
    d.apply(Command::Drag(Vec2::new(0.0, 1.0e6)));
    assert!(d.sim.camera.pitch <= PITCH_LIMIT);
    d.apply(Command::Drag(Vec2::new(0.0, -1.0e6)));
    assert!(d.sim.camera.pitch >= -PITCH_LIMIT);
    d.apply(Command::EndDrag);
    d.frame_with(FRAME);
    let pose = d.renderer.camera.expect("camera pushed every frame");
    assert!(pose.eye.is_finite());
}

#[test]
fn zoom_is_clamped() {
    let mut d = driver();
    d.apply(Command::Zoom(1000.0));
    assert_eq!(d.sim.camera.zoom_level(), MAX_ZOOM);
    d.apply(Command::Zoom(-1000.0));
    assert_eq!(d.sim.camera.zoom_level(), MIN_ZOOM);
}

#[test]
fn fullscreen_is_left_to_the_page() {
    let mut d = driver();
    assert!(!d.apply(Command::ToggleFullscreen));
    assert!(d.apply(Command::ToggleAutoRotate));
}

#[test]
fn teardown_releases_everything_once() {
    let mut d = driver();
    run(&mut d, 600, FRAME);
    d.apply(Command::Trigger(WaveKind::Emp));
    d.visualize_hit(10.0, 20.0, HitKind::Read);
    run(&mut d, 10, FRAME);
    assert!(d.shutdown());
    assert!(!d.shutdown());
    assert_eq!(d.renderer.live(), 0);
    assert_eq!(d.renderer.created, d.renderer.disposed);
    assert_eq!(d.renderer.invalid_ops, 0);
    assert!(!d.apply(Command::Trigger(WaveKind::Sound)));
}
