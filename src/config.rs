//! Game configuration, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::curve::CurveKind;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    pub timers: TimerConfig,
    pub player: PlayerConfig,
    pub scoring: ScoringConfig,
    pub waves: WaveConfig,
    pub collision: CollisionConfig,
    pub motion: MotionConfig,
}

/// Spawn cadence, all in milliseconds of game time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub bullet_interval_ms: f64,
    pub background_interval_ms: f64,
    pub coin_interval_ms: f64,
    pub wave_interval_ms: f64,
    pub wave_jitter_ms: f64,
    pub enemy_fire_interval_ms: f64,
    pub enemy_fire_jitter_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start_health: i32,
    /// World units per millisecond.
    pub speed: f32,
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    /// Bank angle in radians while moving sideways.
    pub tilt: f32,
    pub depth: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub coin: u32,
    pub enemy: u32,
    pub bullet_damage: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveWeight {
    pub kind: String,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub size: usize,
    pub stagger: f32,
    pub curves: Vec<CurveWeight>,
}

/// Distance thresholds, in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub enemy_bullet_vs_player: f32,
    pub enemy_bullet_vs_bullet: f32,
    pub plane_vs_enemy: f32,
    pub bullet_vs_enemy: f32,
    pub player_vs_coin: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Player bullet travel per millisecond.
    pub bullet_factor: f32,
    /// Scenery and coin travel per millisecond, before the enemy divisor.
    pub scenery_factor: f32,
    pub enemy_divisor: f32,
    /// Enemy bullets fall this many times faster than enemies advance.
    pub enemy_bullet_multiplier: f32,
    /// Simulation slows down by this factor while no direction key is held.
    pub slow_motion_divisor: f64,
    pub frame_bound: f32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            bullet_interval_ms: 1000.0,
            background_interval_ms: 1000.0,
            coin_interval_ms: 1000.0,
            wave_interval_ms: 4000.0,
            wave_jitter_ms: 1500.0,
            enemy_fire_interval_ms: 1800.0,
            enemy_fire_jitter_ms: 900.0,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_health: 100,
            speed: 0.001,
            min_x: -0.9,
            max_x: 0.9,
            min_y: -0.9,
            max_y: 0.9,
            tilt: 0.4,
            depth: 1.0,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            coin: 10,
            enemy: 20,
            bullet_damage: 10,
        }
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            size: 5,
            stagger: 0.04,
            curves: vec![
                CurveWeight { kind: "circle".into(), weight: 35 },
                CurveWeight { kind: "ellipse".into(), weight: 35 },
                CurveWeight { kind: "line".into(), weight: 30 },
            ],
        }
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            enemy_bullet_vs_player: 0.1,
            enemy_bullet_vs_bullet: 0.05,
            plane_vs_enemy: 0.1,
            bullet_vs_enemy: 0.1,
            player_vs_coin: 0.2,
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            bullet_factor: 0.001,
            scenery_factor: 0.0005,
            enemy_divisor: 3.0,
            enemy_bullet_multiplier: 5.0,
            slow_motion_divisor: 3.0,
            frame_bound: 2.0,
        }
    }
}

impl GameConfig {
    /// Load from a `.toml` file and validate.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.extension().and_then(|e| e.to_str()) != Some("toml") {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Resolve the weighted curve table.  Unknown names are fatal.
    pub fn curve_weights(&self) -> Result<Vec<(CurveKind, u32)>, ConfigError> {
        self.waves
            .curves
            .iter()
            .map(|w| {
                w.kind
                    .parse::<CurveKind>()
                    .map(|kind| (kind, w.weight))
                    .map_err(|_| ConfigError::UnknownCurve(w.kind.clone()))
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = self.curve_weights()?;
        if weights.iter().all(|&(_, w)| w == 0) {
            return Err(ConfigError::Invalid("curve weights must not all be zero".into()));
        }
        if self.waves.size == 0 {
            return Err(ConfigError::Invalid("wave size must be at least 1".into()));
        }
        let p = &self.player;
        if p.min_x >= p.max_x || p.min_y >= p.max_y {
            return Err(ConfigError::Invalid("player bounds are empty".into()));
        }
        if self.motion.slow_motion_divisor <= 0.0 || self.motion.enemy_divisor <= 0.0 {
            return Err(ConfigError::Invalid("motion divisors must be positive".into()));
        }
        Ok(())
    }
}
