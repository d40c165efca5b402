/// Simulation and interaction tuning constants.
///
/// These constants express intended behavior (e.g., lifetimes, decay factors,
/// clamp limits) and keep magic numbers out of the code. `SceneConfig` takes
/// its defaults from here.
// Globe geometry
pub const GLOBE_RADIUS: f32 = 0.5;
pub const DRONE_ORBIT_RADIUS: f32 = 0.8;

// Drones
pub const DRONE_CAP: usize = 10;
pub const DRONE_SPAWN_INTERVAL_MS: u64 = 2000;
pub const DRONE_SPEED_MIN: f32 = 0.10; // world units per second
pub const DRONE_SPEED_MAX: f32 = 0.25;
pub const DRONE_RETARGET_DISTANCE: f32 = 0.1;
pub const DRONE_SCALE: f32 = 0.03;
pub const DRONE_COLOR: [f32; 4] = [0.85, 0.9, 1.0, 1.0];

// Explosion (per-frame, not dt-scaled)
pub const EXPLOSION_DURATION_MS: u64 = 1000;
pub const EXPLOSION_PARTICLES: usize = 12;
pub const EXPLOSION_PARTICLE_SPEED: f32 = 0.01; // max per-axis step per frame
pub const EXPLOSION_PARTICLE_SCALE: f32 = 0.015;
pub const EXPLOSION_SHRINK: f32 = 0.95;
pub const EXPLOSION_COLOR: [f32; 4] = [1.0, 0.55, 0.15, 1.0];

// Waves
pub const WAVE_DURATION_MS: u64 = 2000;
pub const EMP_MAX_SCALE: f32 = 10.0;
pub const SOUND_MAX_SCALE: f32 = 8.0;
pub const WAVE_BASE_RADIUS: f32 = 0.5; // world radius of a wave at scale 1
pub const EMP_COLOR: [f32; 4] = [0.3, 0.6, 1.0, 1.0];
pub const SOUND_COLOR: [f32; 4] = [1.0, 0.8, 0.2, 1.0];
pub const EMP_RIM_POWER: f32 = 3.0;
pub const SOUND_RIM_POWER: f32 = 2.0;
pub const EMP_INTENSITY: f32 = 1.2;
pub const SOUND_INTENSITY: f32 = 0.9;

// Collision band around a wave front
pub const COLLISION_TOLERANCE: f32 = 0.05;

// Action rate limit; the window is 20ms even though it reads like a 300ms gate
pub const ACTION_COOLDOWN_MS: u64 = 20;

// Impact markers
pub const MARKER_DECAY: f32 = 0.95;
pub const MARKER_MIN_SCALE: f32 = 0.01;
pub const MARKER_LENGTH: f32 = 0.2;
pub const MARKER_READ_COLOR: [f32; 4] = [0.3, 0.95, 0.5, 1.0];
pub const MARKER_OTHER_COLOR: [f32; 4] = [1.0, 0.3, 0.3, 1.0];

// Camera
pub const CAMERA_BASE_DISTANCE: f32 = 3.0;
pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 4.0;
pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.1;
pub const DRAG_RADIANS_PER_PX: f32 = 0.005;
pub const AUTO_ROTATE_RADIANS_PER_SEC: f32 = 0.12;
pub const WHEEL_ZOOM_PER_UNIT: f32 = 0.001;
pub const PINCH_ZOOM_PER_PX: f32 = 0.01;
pub const CLICK_MAX_TRAVEL_PX: f32 = 4.0;
pub const CAMERA_FOVY: f32 = std::f32::consts::FRAC_PI_4;

// Feed
pub const FEED_LOG_CAPACITY: usize = 50;
pub const DEFAULT_FEED_URL: &str = "/events";

// Scene colors
pub const GLOBE_COLOR: [f32; 4] = [0.08, 0.2, 0.35, 1.0];
