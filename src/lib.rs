//! Donut Chomp - a face-tracking donut eating game
//!
//! Core modules:
//! - `sim`: Deterministic game logic (spawning, collisions, game state)
//! - `host`: Collaborator traits for the AR runtime and the controller that drives them
//! - `settings`: Data-driven game tuning (levels, distances, scene names)

pub mod host;
pub mod settings;
pub mod sim;

pub use host::{Controller, HeadlessHost, SetupError};
pub use settings::{ConfigError, GameConfig, Level};

/// Game configuration constants
pub mod consts {
    /// Number of donut slots in the pool
    pub const POOL_SIZE: usize = 8;
    /// Mouth-to-donut radius that counts as a bite (normalized scene units)
    pub const COLLISION_DISTANCE: f32 = 0.15;
    /// Points per eaten donut
    pub const SCORE_INCREMENT: u64 = 100;
    /// Openness above which the mouth counts as open
    pub const MOUTH_OPEN_THRESHOLD: f32 = 0.3;
    /// Delay between the first face detection and game start
    pub const START_DELAY_MS: u32 = 1000;

    /// Fall path (top to bottom of the screen)
    pub const DONUT_Y_START: f32 = 0.5;
    pub const DONUT_Y_END: f32 = -0.5;
    /// Horizontal spawn bounds; the drawn offset also gets a random sign
    pub const SPAWN_MIN_X: f32 = -0.15;
    pub const SPAWN_MAX_X: f32 = 0.15;
    /// Final x-rotation of a falling donut
    pub const DONUT_ROTATION_END: f32 = 20.0;

    /// Level 1 timings
    pub const LEVEL1_ANIMATION_MS: u32 = 3000;
    pub const LEVEL1_SPAWN_DELAY_MS: u32 = 1000;
}
