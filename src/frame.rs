use crate::config::SceneConfig;
use crate::effects::HitKind;
use crate::feed::HitRecord;
use crate::input::Command;
use crate::render::Renderer;
use crate::scene::Simulation;
use instant::Instant;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Monotonic frame clock. The first tick yields zero so startup never jumps.
#[derive(Default, Clone, Copy, Debug)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let dt = match self.last {
            Some(prev) if now > prev => now - prev,
            _ => Duration::ZERO,
        };
        self.last = Some(now);
        dt
    }
}

/// Per-refresh driver: clock → simulation → renderer.
///
/// Owns the renderer and the simulation of one globe instance. `shutdown`
/// releases every renderer object exactly once; later frames and later
/// shutdowns are no-ops.
pub struct FrameDriver<R: Renderer> {
    pub sim: Simulation,
    pub renderer: R,
    clock: FrameClock,
    released: bool,
}

impl<R: Renderer> FrameDriver<R> {
    pub fn new(config: SceneConfig, mut renderer: R, seed: u64) -> Self {
        let sim = Simulation::new(config, seed, &mut renderer);
        Self {
            sim,
            renderer,
            clock: FrameClock::new(),
            released: false,
        }
    }

    pub fn frame(&mut self) {
        let dt = self.clock.tick();
        self.frame_with(dt);
    }

    /// One frame with an explicit delta.
    pub fn frame_with(&mut self, dt: Duration) {
        if self.released {
            return;
        }
        self.sim.tick(dt, &mut self.renderer);
        let pose = self.sim.camera.derive_pose();
        self.renderer.set_camera(&pose);
        if let Err(e) = self.renderer.render_frame() {
            log::error!("render error: {:?}", e);
        }
    }

    pub fn apply(&mut self, cmd: Command) -> bool {
        if self.released {
            return false;
        }
        self.sim.apply(cmd, &mut self.renderer)
    }

    pub fn visualize_hit(&mut self, lat: f32, long: f32, kind: HitKind) {
        if !self.released {
            self.sim.visualize_hit(lat, long, kind, &mut self.renderer);
        }
    }

    pub fn ingest(&mut self, record: &HitRecord) {
        if !self.released {
            self.sim.ingest(record, &mut self.renderer);
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.sim.camera.aspect = aspect;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Returns true only for the call that actually released.
    pub fn shutdown(&mut self) -> bool {
        if std::mem::replace(&mut self.released, true) {
            return false;
        }
        self.sim.teardown(&mut self.renderer);
        log::info!("[frame] scene released");
        true
    }
}

/// Cancellation flag shared between a running loop and its owner.
///
/// `cancel` reports true exactly once; the loop checks `is_cancelled` before
/// scheduling its next frame.
#[derive(Clone, Default, Debug)]
pub struct LoopGuard {
    cancelled: Rc<Cell<bool>>,
}

impl LoopGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    pub fn cancel(&self) -> bool {
        !self.cancelled.replace(true)
    }
}

/// Cancel the loop and release the scene, paired so neither happens without
/// the other and both happen at most once.
pub fn teardown<R: Renderer>(guard: &LoopGuard, driver: &mut FrameDriver<R>) -> bool {
    if guard.cancel() {
        driver.shutdown()
    } else {
        false
    }
}

#[cfg(target_arch = "wasm32")]
pub use self::web_loop::{start_loop, RunningLoop, WebDriver};

#[cfg(target_arch = "wasm32")]
mod web_loop {
    use super::{FrameDriver, LoopGuard};
    use crate::render::Renderer;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;
    use web_sys as web;

    type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

    /// Driver over whichever renderer the page could get.
    pub type WebDriver = FrameDriver<Box<dyn Renderer>>;

    /// Handle to a requestAnimationFrame loop.
    pub struct RunningLoop {
        pub guard: LoopGuard,
        raf_id: Rc<Cell<Option<i32>>>,
        tick: Tick,
    }

    impl RunningLoop {
        /// Stop scheduling frames and drop the frame closure. Idempotent.
        pub fn cancel(&self) -> bool {
            if !self.guard.cancel() {
                return false;
            }
            if let (Some(id), Some(w)) = (self.raf_id.take(), web::window()) {
                _ = w.cancel_animation_frame(id);
            }
            // breaks the closure's self-reference
            self.tick.borrow_mut().take();
            true
        }
    }

    fn request(tick: &Tick) -> Option<i32> {
        let w = web::window()?;
        let t = tick.borrow();
        let cb = t.as_ref()?;
        w.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
    }

    pub fn start_loop(driver: Rc<RefCell<WebDriver>>) -> RunningLoop {
        let guard = LoopGuard::new();
        let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let tick: Tick = Rc::new(RefCell::new(None));

        let guard_tick = guard.clone();
        let raf_tick = raf_id.clone();
        let tick_clone = tick.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if guard_tick.is_cancelled() {
                return;
            }
            driver.borrow_mut().frame();
            raf_tick.set(request(&tick_clone));
        }) as Box<dyn FnMut()>));
        raf_id.set(request(&tick));

        RunningLoop {
            guard,
            raf_id,
            tick,
        }
    }
}
