use super::{Effect, Lifecycle};
use crate::render::Renderer;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(pub u64);

/// Ordered collection of one effect class.
///
/// The registry is the only place effects are created and destroyed: `spawn`
/// appends (subject to the optional cap), `advance_and_reap` steps every
/// effect in insertion order and releases the ones that report `Done`.
pub struct EffectRegistry<E: Effect> {
    items: Vec<E>,
    capacity: Option<usize>,
    next_id: u64,
}

impl<E: Effect> EffectRegistry<E> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            capacity: None,
            next_id: 0,
        }
    }

    pub fn with_capacity_limit(cap: usize) -> Self {
        Self {
            items: Vec::with_capacity(cap),
            capacity: Some(cap),
            next_id: 0,
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.items.len() >= cap)
    }

    /// Build and append an effect; returns `None` without calling `make` when
    /// the registry is at its cap.
    pub fn spawn_with(&mut self, make: impl FnOnce(EffectId) -> E) -> Option<EffectId> {
        if self.is_full() {
            return None;
        }
        let id = EffectId(self.next_id);
        self.next_id += 1;
        self.items.push(make(id));
        Some(id)
    }

    /// Advance every effect by `dt` and release those that finish.
    /// Cheap no-op when empty. Returns how many were reaped.
    pub fn advance_and_reap(&mut self, dt: Duration, renderer: &mut dyn Renderer) -> usize {
        if self.items.is_empty() {
            return 0;
        }
        let mut kept = Vec::with_capacity(self.items.len());
        let mut reaped = 0;
        for mut effect in self.items.drain(..) {
            if effect.advance(dt, renderer) == Lifecycle::Done {
                effect.release(renderer);
                reaped += 1;
            } else {
                kept.push(effect);
            }
        }
        self.items = kept;
        reaped
    }

    /// Release everything, e.g. on teardown.
    pub fn clear(&mut self, renderer: &mut dyn Renderer) {
        for effect in self.items.drain(..) {
            effect.release(renderer);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity_limit(&self) -> Option<usize> {
        self.capacity
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, E> {
        self.items.iter_mut()
    }

    pub fn get(&self, id: EffectId) -> Option<&E> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn count_in(&self, state: Lifecycle) -> usize {
        self.items.iter().filter(|e| e.lifecycle() == state).count()
    }
}

impl<E: Effect> Default for EffectRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessRenderer;

    // Minimal effect that finishes after a fixed number of ticks.
    struct Countdown {
        id: EffectId,
        left: u32,
        released: std::rc::Rc<std::cell::Cell<u32>>,
    }

    impl Effect for Countdown {
        fn id(&self) -> EffectId {
            self.id
        }
        fn lifecycle(&self) -> Lifecycle {
            if self.left == 0 {
                Lifecycle::Done
            } else {
                Lifecycle::Active
            }
        }
        fn age(&self) -> Duration {
            Duration::ZERO
        }
        fn advance(&mut self, _dt: Duration, _r: &mut dyn Renderer) -> Lifecycle {
            self.left = self.left.saturating_sub(1);
            self.lifecycle()
        }
        fn release(self, _r: &mut dyn Renderer) {
            self.released.set(self.released.get() + 1);
        }
    }

    #[test]
    fn cap_rejects_spawn_without_building() {
        let mut reg = EffectRegistry::with_capacity_limit(2);
        let released = std::rc::Rc::new(std::cell::Cell::new(0));
        for _ in 0..2 {
            let r = released.clone();
            assert!(reg
                .spawn_with(|id| Countdown { id, left: 3, released: r })
                .is_some());
        }
        let mut built = false;
        let out = reg.spawn_with(|id| {
            built = true;
            Countdown {
                id,
                left: 1,
                released: released.clone(),
            }
        });
        assert!(out.is_none());
        assert!(!built);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn reap_preserves_order_and_releases_once() {
        let mut reg = EffectRegistry::new();
        let mut renderer = HeadlessRenderer::new();
        let released = std::rc::Rc::new(std::cell::Cell::new(0));
        for left in [3, 1, 2] {
            let r = released.clone();
            reg.spawn_with(|id| Countdown { id, left, released: r });
        }
        let dt = Duration::from_millis(16);
        assert_eq!(reg.advance_and_reap(dt, &mut renderer), 1);
        let ids: Vec<u64> = reg.iter().map(|e| e.id().0).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(reg.advance_and_reap(dt, &mut renderer), 1);
        assert_eq!(reg.advance_and_reap(dt, &mut renderer), 1);
        assert!(reg.is_empty());
        assert_eq!(reg.advance_and_reap(dt, &mut renderer), 0);
        assert_eq!(released.get(), 3);
    }
}
