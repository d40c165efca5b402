use super::{Effect, EffectId, Lifecycle};
use crate::constants::*;
use crate::render::{ObjectDescriptor, Renderer, Shape, Visual};
use glam::{Quat, Vec3};
use std::time::Duration;

/// Two-valued category of an inbound hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind {
    Read,
    Other,
}

impl HitKind {
    pub fn from_label(kind: &str) -> Self {
        if kind.eq_ignore_ascii_case("read") {
            HitKind::Read
        } else {
            HitKind::Other
        }
    }

    pub fn color(self) -> [f32; 4] {
        match self {
            HitKind::Read => MARKER_READ_COLOR,
            HitKind::Other => MARKER_OTHER_COLOR,
        }
    }
}

/// Latitude/longitude in degrees to a point on a sphere of `radius`.
///
/// phi = (90 - lat)°, theta = (long + 180)°, so (0, 0) maps to (-r, 0, 0).
pub fn geo_to_globe(lat: f32, long: f32, radius: f32) -> Vec3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (long + 180.0).to_radians();
    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Spike standing on the globe surface, shrinking a little every frame.
pub struct ImpactMarker {
    id: EffectId,
    kind: HitKind,
    position: Vec3,
    scale: f32,
    age: Duration,
    state: Lifecycle,
    visual: Visual,
}

impl ImpactMarker {
    pub fn spawn(
        id: EffectId,
        lat: f32,
        long: f32,
        kind: HitKind,
        renderer: &mut dyn Renderer,
    ) -> Self {
        let position = geo_to_globe(lat, long, GLOBE_RADIUS);
        let visual = Visual::spawn(
            renderer,
            &ObjectDescriptor {
                shape: Shape::Spike {
                    length: MARKER_LENGTH,
                },
                color: kind.color(),
                position,
                scale: 1.0,
            },
        );
        let outward = position.normalize_or_zero();
        if outward != Vec3::ZERO {
            renderer.set_orientation(visual.handle(), Quat::from_rotation_arc(Vec3::Y, outward));
        }
        Self {
            id,
            kind,
            position,
            scale: 1.0,
            age: Duration::ZERO,
            state: Lifecycle::Active,
            visual,
        }
    }

    pub fn kind(&self) -> HitKind {
        self.kind
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn color(&self) -> [f32; 4] {
        self.kind.color()
    }
}

impl Effect for ImpactMarker {
    fn id(&self) -> EffectId {
        self.id
    }

    fn lifecycle(&self) -> Lifecycle {
        self.state
    }

    fn age(&self) -> Duration {
        self.age
    }

    fn advance(&mut self, dt: Duration, renderer: &mut dyn Renderer) -> Lifecycle {
        if self.state == Lifecycle::Done {
            return Lifecycle::Done;
        }
        self.age += dt;
        self.scale *= MARKER_DECAY;
        if self.scale < MARKER_MIN_SCALE {
            self.state = Lifecycle::Done;
        } else {
            renderer.set_scale(self.visual.handle(), self.scale);
        }
        self.state
    }

    fn release(self, renderer: &mut dyn Renderer) {
        self.visual.release(renderer);
    }
}
