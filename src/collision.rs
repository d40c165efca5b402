use crate::constants::COLLISION_TOLERANCE;
use crate::effects::{Drone, EffectRegistry, ExpandingWave};
use crate::render::Renderer;

/// Drone-vs-wave-front test run once per tick.
///
/// A drone is hit when its distance from the origin is within `tolerance`
/// of a wave's current radius. Retiring drones are skipped, so a drone caught
/// by several fronts in one tick explodes exactly once.
pub struct CollisionProbe {
    pub tolerance: f32,
}

impl Default for CollisionProbe {
    fn default() -> Self {
        Self {
            tolerance: COLLISION_TOLERANCE,
        }
    }
}

impl CollisionProbe {
    #[inline]
    pub fn touches(&self, distance_from_center: f32, wave_radius: f32) -> bool {
        (distance_from_center - wave_radius).abs() < self.tolerance
    }

    /// Retire every active drone touching any front. Returns the number of
    /// drones that started exploding.
    pub fn sweep(
        &self,
        drones: &mut EffectRegistry<Drone>,
        waves: &[&EffectRegistry<ExpandingWave>],
        renderer: &mut dyn Renderer,
    ) -> usize {
        if waves.iter().all(|w| w.is_empty()) {
            return 0;
        }
        let mut hits = 0;
        for drone in drones.iter_mut() {
            if !drone.is_active() {
                continue;
            }
            let distance = drone.position.length();
            let touched = waves
                .iter()
                .flat_map(|reg| reg.iter())
                .any(|w| self.touches(distance, w.radius()));
            if touched && drone.begin_retiring(renderer) {
                hits += 1;
            }
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_is_open_on_both_sides() {
        let probe = CollisionProbe::default();
        assert!(probe.touches(0.8, 0.8));
        assert!(probe.touches(0.8, 0.76));
        assert!(probe.touches(0.8, 0.84));
        assert!(!probe.touches(0.8, 0.7));
        assert!(!probe.touches(0.8, 0.9));
    }
}
