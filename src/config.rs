use crate::constants::*;
use crate::error::ConfigError;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Per-kind wave parameters. Color, rim and intensity are cosmetic.
#[derive(Clone, Debug)]
pub struct WaveConfig {
    pub duration_ms: u64,
    pub max_scale: f32,
    pub color: [f32; 4],
    pub rim_power: f32,
    pub intensity: f32,
}

impl WaveConfig {
    pub fn emp() -> Self {
        Self {
            duration_ms: WAVE_DURATION_MS,
            max_scale: EMP_MAX_SCALE,
            color: EMP_COLOR,
            rim_power: EMP_RIM_POWER,
            intensity: EMP_INTENSITY,
        }
    }

    pub fn sound() -> Self {
        Self {
            duration_ms: WAVE_DURATION_MS,
            max_scale: SOUND_MAX_SCALE,
            color: SOUND_COLOR,
            rim_power: SOUND_RIM_POWER,
            intensity: SOUND_INTENSITY,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

// Partial wave override; absent fields keep the kind's defaults.
#[derive(Deserialize)]
struct WaveOverride {
    duration_ms: Option<u64>,
    max_scale: Option<f32>,
    color: Option<[f32; 4]>,
    rim_power: Option<f32>,
    intensity: Option<f32>,
}

impl WaveOverride {
    fn apply(self, base: WaveConfig) -> WaveConfig {
        WaveConfig {
            duration_ms: self.duration_ms.unwrap_or(base.duration_ms),
            max_scale: self.max_scale.unwrap_or(base.max_scale),
            color: self.color.unwrap_or(base.color),
            rim_power: self.rim_power.unwrap_or(base.rim_power),
            intensity: self.intensity.unwrap_or(base.intensity),
        }
    }
}

fn emp_wave<'de, D: Deserializer<'de>>(d: D) -> Result<WaveConfig, D::Error> {
    WaveOverride::deserialize(d).map(|o| o.apply(WaveConfig::emp()))
}

fn sound_wave<'de, D: Deserializer<'de>>(d: D) -> Result<WaveConfig, D::Error> {
    WaveOverride::deserialize(d).map(|o| o.apply(WaveConfig::sound()))
}

/// Everything a globe instance is built from.
///
/// Read from the canvas `data-config` attribute as JSON; every field is
/// optional and falls back to the constants in `constants.rs`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub drone_cap: usize,
    pub drone_spawn_interval_ms: u64,
    pub cooldown_ms: u64,
    #[serde(deserialize_with = "emp_wave")]
    pub emp: WaveConfig,
    #[serde(deserialize_with = "sound_wave")]
    pub sound: WaveConfig,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub base_distance: f32,
    pub auto_rotate: bool,
    pub feed_url: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            drone_cap: DRONE_CAP,
            drone_spawn_interval_ms: DRONE_SPAWN_INTERVAL_MS,
            cooldown_ms: ACTION_COOLDOWN_MS,
            emp: WaveConfig::emp(),
            sound: WaveConfig::sound(),
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            base_distance: CAMERA_BASE_DISTANCE,
            auto_rotate: true,
            feed_url: DEFAULT_FEED_URL.to_string(),
        }
    }
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: SceneConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_zoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.base_distance > 0.0) {
            return Err(ConfigError::Invalid("base_distance must be positive".into()));
        }
        for (name, w) in [("emp", &self.emp), ("sound", &self.sound)] {
            if !(w.max_scale >= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name}.max_scale must be at least 1, got {}",
                    w.max_scale
                )));
            }
            if w.duration_ms == 0 {
                return Err(ConfigError::Invalid(format!("{name}.duration_ms must be > 0")));
            }
        }
        Ok(())
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.drone_spawn_interval_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = SceneConfig::from_json("{}").unwrap();
        assert_eq!(cfg.drone_cap, DRONE_CAP);
        assert_eq!(cfg.emp.max_scale, EMP_MAX_SCALE);
        assert_eq!(cfg.sound.max_scale, SOUND_MAX_SCALE);
        assert_eq!(cfg.cooldown(), Duration::from_millis(20));
    }

    #[test]
    fn partial_override_keeps_other_fields() {
        let cfg = SceneConfig::from_json(r#"{"drone_cap": 3, "sound": {"max_scale": 4.0}}"#)
            .unwrap();
        assert_eq!(cfg.drone_cap, 3);
        assert_eq!(cfg.sound.max_scale, 4.0);
        assert_eq!(cfg.sound.duration_ms, WAVE_DURATION_MS);
        assert_eq!(cfg.sound.color, SOUND_COLOR);
        assert_eq!(cfg.max_zoom, MAX_ZOOM);
    }

    #[test]
    fn inverted_zoom_range_is_rejected() {
        let err = SceneConfig::from_json(r#"{"min_zoom": 3.0, "max_zoom": 1.0}"#);
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(
            SceneConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
