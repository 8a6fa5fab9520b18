//! Game tuning and scene naming
//!
//! Everything that shapes a session but is not per-session state lives here.
//! Loaded from JSON; any field left out falls back to the built-in default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Timing for one difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// How long a donut takes to fall from top to bottom
    pub animation_time_ms: u32,
    /// Delay between spawn ticks
    pub spawn_delay_ms: u32,
}

impl Default for Level {
    fn default() -> Self {
        Self {
            animation_time_ms: LEVEL1_ANIMATION_MS,
            spawn_delay_ms: LEVEL1_SPAWN_DELAY_MS,
        }
    }
}

/// Names the controller looks up in the host scene graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneNames {
    /// Parent of all donut elements
    pub donut_container: String,
    /// Donut element prefix; slot `i` is `{prefix}{i + 1}`
    pub donut_prefix: String,
    pub score_text: String,
    pub score_pulse: String,
    /// Playback controller for the bite sound
    pub chomp_audio: String,
}

impl Default for SceneNames {
    fn default() -> Self {
        Self {
            donut_container: "Donuts".to_string(),
            donut_prefix: "Donut_".to_string(),
            score_text: "ScoreText".to_string(),
            score_pulse: "scorePlusContainer".to_string(),
            chomp_audio: "chomp".to_string(),
        }
    }
}

impl SceneNames {
    /// Scene name of the donut in `slot` (1-based in the scene)
    pub fn donut(&self, slot: usize) -> String {
        format!("{}{}", self.donut_prefix, slot + 1)
    }
}

/// Full game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub pool_size: usize,
    pub collision_distance: f32,
    pub score_increment: u64,
    pub mouth_open_threshold: f32,
    pub start_delay_ms: u32,

    // === Fall motion ===
    pub donut_y_start: f32,
    pub donut_y_end: f32,
    pub spawn_min_x: f32,
    pub spawn_max_x: f32,
    pub rotation_end: f32,

    /// Level table, indexed by the session's current level
    pub levels: Vec<Level>,
    pub scene: SceneNames,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pool_size: POOL_SIZE,
            collision_distance: COLLISION_DISTANCE,
            score_increment: SCORE_INCREMENT,
            mouth_open_threshold: MOUTH_OPEN_THRESHOLD,
            start_delay_ms: START_DELAY_MS,

            donut_y_start: DONUT_Y_START,
            donut_y_end: DONUT_Y_END,
            spawn_min_x: SPAWN_MIN_X,
            spawn_max_x: SPAWN_MAX_X,
            rotation_end: DONUT_ROTATION_END,

            levels: vec![Level::default()],
            scene: SceneNames::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load a config file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using default config");
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check invariants the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::Invalid("pool_size must be at least 1".into()));
        }
        if self.levels.is_empty() {
            return Err(ConfigError::Invalid("at least one level is required".into()));
        }
        if let Some(i) = self
            .levels
            .iter()
            .position(|l| l.animation_time_ms == 0 || l.spawn_delay_ms == 0)
        {
            return Err(ConfigError::Invalid(format!("level {i} has a zero duration")));
        }
        if !(self.collision_distance.is_finite() && self.collision_distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "collision_distance must be positive, got {}",
                self.collision_distance
            )));
        }
        if !(0.0..=1.0).contains(&self.mouth_open_threshold) {
            return Err(ConfigError::Invalid(format!(
                "mouth_open_threshold must be within [0, 1], got {}",
                self.mouth_open_threshold
            )));
        }
        if !(self.spawn_min_x <= self.spawn_max_x) {
            return Err(ConfigError::Invalid(format!(
                "spawn x range is empty: [{}, {}]",
                self.spawn_min_x, self.spawn_max_x
            )));
        }
        Ok(())
    }

    /// Level for an index, clamped to the last configured level
    pub fn level(&self, index: usize) -> Level {
        self.levels
            .get(index)
            .or_else(|| self.levels.last())
            .copied()
            .unwrap_or_default()
    }
}
