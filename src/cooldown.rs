use crate::effects::WaveKind;
use std::time::Duration;

/// Rate-limit gate for one action.
#[derive(Clone, Copy, Debug)]
pub struct Cooldown {
    window: Duration,
    remaining: Duration,
}

impl Cooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            remaining: Duration::ZERO,
        }
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        !self.remaining.is_zero()
    }

    /// Close the gate for one full window.
    pub fn arm(&mut self) {
        self.remaining = self.window;
    }

    pub fn tick(&mut self, dt: Duration) {
        self.remaining = self.remaining.saturating_sub(dt);
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}

/// One gate per action kind.
#[derive(Clone, Debug)]
pub struct Cooldowns {
    emp: Cooldown,
    sound: Cooldown,
}

impl Cooldowns {
    pub fn new(window: Duration) -> Self {
        Self {
            emp: Cooldown::new(window),
            sound: Cooldown::new(window),
        }
    }

    pub fn get(&self, kind: WaveKind) -> &Cooldown {
        match kind {
            WaveKind::Emp => &self.emp,
            WaveKind::Sound => &self.sound,
        }
    }

    pub fn get_mut(&mut self, kind: WaveKind) -> &mut Cooldown {
        match kind {
            WaveKind::Emp => &mut self.emp,
            WaveKind::Sound => &mut self.sound,
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.emp.tick(dt);
        self.sound.tick(dt);
    }
}
