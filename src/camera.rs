use crate::constants::*;
use crate::render::CameraPose;
use glam::{Mat4, Vec2, Vec3};
use std::time::Duration;

// keeps pitch strictly inside the open limit
const PITCH_MAX: f32 = PITCH_LIMIT - 1e-4;

/// Orbit camera around the globe.
///
/// State is just two angles and a zoom factor; the eye position is derived
/// every frame by `derive_pose`. Pitch never leaves
/// `(-PITCH_LIMIT, PITCH_LIMIT)` so the view cannot flip over the poles.
#[derive(Clone, Debug)]
pub struct CameraRig {
    pub pitch: f32,
    pub yaw: f32,
    zoom: f32,
    pub auto_rotate: bool,
    min_zoom: f32,
    max_zoom: f32,
    base_distance: f32,
    drag_anchor: Option<Vec2>,
    pub aspect: f32,
}

impl CameraRig {
    pub fn new(min_zoom: f32, max_zoom: f32, base_distance: f32, auto_rotate: bool) -> Self {
        Self {
            pitch: 0.0,
            yaw: 0.0,
            zoom: 1.0_f32.clamp(min_zoom, max_zoom),
            auto_rotate,
            min_zoom,
            max_zoom,
            base_distance,
            drag_anchor: None,
            aspect: 1.0,
        }
    }

    #[inline]
    pub fn zoom_level(&self) -> f32 {
        self.zoom
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    pub fn begin_drag(&mut self, point: Vec2) {
        self.drag_anchor = Some(point);
    }

    /// Rotate by the pointer delta since the last drag point. Ignored when no
    /// drag is in progress.
    pub fn drag(&mut self, point: Vec2) {
        let Some(anchor) = self.drag_anchor else {
            return;
        };
        let delta = point - anchor;
        self.yaw -= delta.x * DRAG_RADIANS_PER_PX;
        self.pitch = (self.pitch + delta.y * DRAG_RADIANS_PER_PX).clamp(-PITCH_MAX, PITCH_MAX);
        self.drag_anchor = Some(point);
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    pub fn zoom(&mut self, delta: f32) {
        if delta.is_finite() {
            self.zoom = (self.zoom + delta).clamp(self.min_zoom, self.max_zoom);
        }
    }

    pub fn toggle_auto_rotate(&mut self) -> bool {
        self.auto_rotate = !self.auto_rotate;
        log::info!("[camera] auto-rotate={}", self.auto_rotate);
        self.auto_rotate
    }

    pub fn tick(&mut self, dt: Duration) {
        if self.auto_rotate && !self.is_dragging() {
            self.yaw = (self.yaw + AUTO_ROTATE_RADIANS_PER_SEC * dt.as_secs_f32())
                % std::f32::consts::TAU;
        }
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.base_distance / self.zoom
    }

    /// Eye position on the orbit sphere, looking at the origin with +Y up.
    pub fn derive_pose(&self) -> CameraPose {
        let r = self.distance();
        let eye = Vec3::new(
            r * self.pitch.cos() * self.yaw.sin(),
            r * self.pitch.sin(),
            r * self.pitch.cos() * self.yaw.cos(),
        );
        let target = Vec3::ZERO;
        let up = Vec3::Y;
        CameraPose {
            eye,
            target,
            up,
            view: Mat4::look_at_rh(eye, target, up),
            proj: Mat4::perspective_rh(CAMERA_FOVY, self.aspect.max(1e-3), 0.01, 100.0),
        }
    }
}
