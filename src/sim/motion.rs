//! Fall motion requests handed to the host's animation driver
//!
//! The simulation never animates anything itself. It decides *that* a donut
//! falls, from where, for how long, and along which curves; the host's
//! driver turns that into continuously updating transforms.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Interpolation curve mapping normalized progress to a value between two endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sampler {
    #[default]
    Linear,
    EaseInQuad,
    EaseInCubic,
}

impl Sampler {
    /// Eased progress for `t` (clamped to [0, 1])
    pub fn ease(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Sampler::Linear => t,
            Sampler::EaseInQuad => t * t,
            Sampler::EaseInCubic => t * t * t,
        }
    }

    /// Value between `from` and `to` at progress `t`
    #[inline]
    pub fn sample(&self, from: f32, to: f32, t: f32) -> f32 {
        from + (to - from) * self.ease(t)
    }
}

/// Everything a driver needs to animate one donut fall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallRequest {
    /// Pool slot being animated
    pub slot: usize,
    /// Generation of this fall; echoed back on completion
    pub drop_id: u32,
    /// Starting position (random x, top of screen)
    pub start: Vec2,
    /// Final y (bottom of screen)
    pub end_y: f32,
    pub duration_ms: u32,
    /// Final x-rotation; starts at 0
    pub rotation_end: f32,
    pub y_sampler: Sampler,
    pub rotation_sampler: Sampler,
}

impl FallRequest {
    /// Position at normalized progress `t`
    pub fn position_at(&self, t: f32) -> Vec2 {
        Vec2::new(self.start.x, self.y_sampler.sample(self.start.y, self.end_y, t))
    }

    /// X-rotation at normalized progress `t`
    pub fn rotation_at(&self, t: f32) -> f32 {
        self.rotation_sampler.sample(0.0, self.rotation_end, t)
    }

    /// Normalized progress after `elapsed_ms`
    pub fn progress(&self, elapsed_ms: u64) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (elapsed_ms as f32 / self.duration_ms as f32).min(1.0)
    }
}
