use crate::camera::CameraRig;
use crate::collision::CollisionProbe;
use crate::config::SceneConfig;
use crate::constants::*;
use crate::cooldown::Cooldowns;
use crate::effects::{
    Drone, EffectId, EffectRegistry, ExpandingWave, HitKind, ImpactMarker, WaveKind,
};
use crate::feed::{FeedLog, HitRecord};
use crate::input::Command;
use crate::render::{ObjectDescriptor, Renderer, Shape, Visual};
use glam::Vec3;
use rand::prelude::*;
use std::time::Duration;

/// All state of one globe instance.
///
/// Created when the globe is built and torn down when it is rebuilt; nothing
/// survives a rebuild. The frame driver calls `tick` once per display refresh,
/// input and feed handlers call `apply`, `trigger` and `visualize_hit` between
/// ticks.
pub struct Simulation {
    pub config: SceneConfig,
    pub drones: EffectRegistry<Drone>,
    pub emp: EffectRegistry<ExpandingWave>,
    pub sound: EffectRegistry<ExpandingWave>,
    pub markers: EffectRegistry<ImpactMarker>,
    pub camera: CameraRig,
    pub cooldowns: Cooldowns,
    pub feed_log: FeedLog,
    probe: CollisionProbe,
    since_spawn: Duration,
    elapsed: Duration,
    seed: u64,
    rng: StdRng,
    globe: Option<Visual>,
}

impl Simulation {
    pub fn new(config: SceneConfig, seed: u64, renderer: &mut dyn Renderer) -> Self {
        let globe = Visual::spawn(
            renderer,
            &ObjectDescriptor {
                shape: Shape::Globe,
                color: GLOBE_COLOR,
                position: Vec3::ZERO,
                scale: GLOBE_RADIUS,
            },
        );
        let camera = CameraRig::new(
            config.min_zoom,
            config.max_zoom,
            config.base_distance,
            config.auto_rotate,
        );
        log::info!(
            "[scene] built: drone_cap={} spawn_every={}ms cooldown={}ms",
            config.drone_cap,
            config.drone_spawn_interval_ms,
            config.cooldown_ms
        );
        Self {
            drones: EffectRegistry::with_capacity_limit(config.drone_cap),
            emp: EffectRegistry::new(),
            sound: EffectRegistry::new(),
            markers: EffectRegistry::new(),
            camera,
            cooldowns: Cooldowns::new(config.cooldown()),
            feed_log: FeedLog::default(),
            probe: CollisionProbe::default(),
            // first frame may spawn straight away
            since_spawn: config.spawn_interval(),
            elapsed: Duration::ZERO,
            seed,
            rng: StdRng::seed_from_u64(seed),
            globe: Some(globe),
            config,
        }
    }

    pub fn waves(&self, kind: WaveKind) -> &EffectRegistry<ExpandingWave> {
        match kind {
            WaveKind::Emp => &self.emp,
            WaveKind::Sound => &self.sound,
        }
    }

    fn waves_mut(&mut self, kind: WaveKind) -> &mut EffectRegistry<ExpandingWave> {
        match kind {
            WaveKind::Emp => &mut self.emp,
            WaveKind::Sound => &mut self.sound,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Fire a wave unless the kind is cooling down. Returns the new wave's id.
    pub fn trigger(&mut self, kind: WaveKind, renderer: &mut dyn Renderer) -> Option<EffectId> {
        if self.cooldowns.get(kind).is_armed() {
            log::debug!("[waves] {} ignored, cooling down", kind.label());
            return None;
        }
        let cfg = match kind {
            WaveKind::Emp => self.config.emp.clone(),
            WaveKind::Sound => self.config.sound.clone(),
        };
        let id = self
            .waves_mut(kind)
            .spawn_with(|id| ExpandingWave::spawn(id, kind, &cfg, renderer))?;
        self.cooldowns.get_mut(kind).arm();
        log::info!("[waves] {} fired ({} active)", kind.label(), self.waves(kind).len());
        Some(id)
    }

    /// Place a spike at a geographic coordinate.
    pub fn visualize_hit(
        &mut self,
        lat: f32,
        long: f32,
        kind: HitKind,
        renderer: &mut dyn Renderer,
    ) -> Option<EffectId> {
        self.markers
            .spawn_with(|id| ImpactMarker::spawn(id, lat, long, kind, renderer))
    }

    /// Render an accepted feed record and log it.
    pub fn ingest(&mut self, record: &HitRecord, renderer: &mut dyn Renderer) {
        self.visualize_hit(record.lat, record.long, record.kind, renderer);
        let line = record.log_line();
        log::info!("[feed] {line}");
        self.feed_log.push(line);
    }

    /// Apply one input command. `ToggleFullscreen` belongs to the page and is
    /// not handled here; returns whether the simulation consumed the command.
    pub fn apply(&mut self, cmd: Command, renderer: &mut dyn Renderer) -> bool {
        match cmd {
            Command::BeginDrag(p) => self.camera.begin_drag(p),
            Command::Drag(p) => self.camera.drag(p),
            Command::EndDrag => self.camera.end_drag(),
            Command::Zoom(d) => self.camera.zoom(d),
            Command::Trigger(kind) => {
                self.trigger(kind, renderer);
            }
            Command::ToggleAutoRotate => {
                self.camera.toggle_auto_rotate();
            }
            Command::ToggleFullscreen => return false,
        }
        true
    }

    fn spawn_drone(&mut self, renderer: &mut dyn Renderer) -> Option<EffectId> {
        // independent stream per drone, reproducible from the scene seed
        let mix = self.seed ^ self.rng.gen::<u64>().wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let rng = StdRng::seed_from_u64(mix);
        self.drones.spawn_with(|id| Drone::spawn(id, rng, renderer))
    }

    /// One frame of simulation.
    pub fn tick(&mut self, dt: Duration, renderer: &mut dyn Renderer) {
        self.elapsed += dt;

        self.emp.advance_and_reap(dt, renderer);
        self.sound.advance_and_reap(dt, renderer);
        self.probe
            .sweep(&mut self.drones, &[&self.emp, &self.sound], renderer);

        self.since_spawn += dt;
        if !self.drones.is_full() && self.since_spawn >= self.config.spawn_interval() {
            if self.spawn_drone(renderer).is_some() {
                self.since_spawn = Duration::ZERO;
            }
        }
        self.drones.advance_and_reap(dt, renderer);

        self.camera.tick(dt);
        self.cooldowns.tick(dt);
        self.markers.advance_and_reap(dt, renderer);
    }

    /// Release every renderer object this simulation owns.
    pub fn teardown(&mut self, renderer: &mut dyn Renderer) {
        self.drones.clear(renderer);
        self.emp.clear(renderer);
        self.sound.clear(renderer);
        self.markers.clear(renderer);
        if let Some(globe) = self.globe.take() {
            globe.release(renderer);
        }
    }
}
