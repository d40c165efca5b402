//! Time-bounded visual effects and the registry that owns them.
//!
//! Every effect owns its renderer objects, reports its lifecycle from
//! `advance`, and gives its objects back through `release` when the registry
//! reaps it.

use crate::render::Renderer;
use std::time::Duration;

mod drone;
mod marker;
mod registry;
mod wave;

pub use drone::{sample_sphere_point, Drone, Particle};
pub use marker::{geo_to_globe, HitKind, ImpactMarker};
pub use registry::{EffectId, EffectRegistry};
pub use wave::{ExpandingWave, WaveKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Retiring,
    Done,
}

pub trait Effect {
    fn id(&self) -> EffectId;
    fn lifecycle(&self) -> Lifecycle;
    /// Time since creation.
    fn age(&self) -> Duration;
    /// Step the effect and report its lifecycle afterwards. `Done` means the
    /// owner must `release` it and never advance it again.
    fn advance(&mut self, dt: Duration, renderer: &mut dyn Renderer) -> Lifecycle;
    /// Give every owned renderer object back.
    fn release(self, renderer: &mut dyn Renderer);
}
