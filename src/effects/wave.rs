use super::{Effect, EffectId, Lifecycle};
use crate::config::WaveConfig;
use crate::constants::WAVE_BASE_RADIUS;
use crate::render::{ObjectDescriptor, Renderer, Shape, Visual};
use glam::Vec3;
use std::time::Duration;

/// The two triggerable pulse actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WaveKind {
    Emp,
    Sound,
}

impl WaveKind {
    pub const ALL: [WaveKind; 2] = [WaveKind::Emp, WaveKind::Sound];

    pub fn label(self) -> &'static str {
        match self {
            WaveKind::Emp => "EMP",
            WaveKind::Sound => "SOUND",
        }
    }
}

/// Radially expanding shell that lives for a fixed duration.
///
/// `progress` only ever grows; once it reaches 1 the wave reports `Done`
/// and is not touched again.
pub struct ExpandingWave {
    id: EffectId,
    kind: WaveKind,
    age: Duration,
    duration: Duration,
    max_scale: f32,
    scale: f32,
    progress: f32,
    state: Lifecycle,
    visual: Visual,
}

impl ExpandingWave {
    pub fn spawn(
        id: EffectId,
        kind: WaveKind,
        cfg: &WaveConfig,
        renderer: &mut dyn Renderer,
    ) -> Self {
        let visual = Visual::spawn(
            renderer,
            &ObjectDescriptor {
                shape: Shape::Wave {
                    rim_power: cfg.rim_power,
                    intensity: cfg.intensity,
                },
                color: cfg.color,
                position: Vec3::ZERO,
                scale: 1.0,
            },
        );
        renderer.set_progress(visual.handle(), 0.0);
        Self {
            id,
            kind,
            age: Duration::ZERO,
            duration: cfg.duration(),
            max_scale: cfg.max_scale,
            scale: 1.0,
            progress: 0.0,
            state: Lifecycle::Active,
            visual,
        }
    }

    #[inline]
    pub fn kind(&self) -> WaveKind {
        self.kind
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// World-space radius of the wave front.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.scale * WAVE_BASE_RADIUS
    }
}

impl Effect for ExpandingWave {
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
        let progress = self.age.as_secs_f32() / self.duration.as_secs_f32();
        if progress >= 1.0 {
            self.progress = 1.0;
            self.state = Lifecycle::Done;
            return Lifecycle::Done;
        }
        self.progress = progress.max(self.progress);
        self.scale = 1.0 + (self.max_scale - 1.0) * self.progress;
        renderer.set_scale(self.visual.handle(), self.scale);
        renderer.set_progress(self.visual.handle(), self.progress);
        Lifecycle::Active
    }

    fn release(self, renderer: &mut dyn Renderer) {
        self.visual.release(renderer);
    }
}
