//! Mouth-to-donut collision checks
//!
//! Checks run once per mouth-open edge, against the positions snapshotted
//! at that moment. Every falling, uneaten donut within reach is a hit.

use glam::Vec2;

use super::state::DonutPool;

/// True when the donut is within `collision_distance` of the mouth (inclusive)
#[inline]
pub fn mouth_donut_collision(mouth: Vec2, donut: Vec2, collision_distance: f32) -> bool {
    donut.distance(mouth) <= collision_distance
}

/// Slots of every active, uneaten donut in reach of the mouth, in pool order
pub fn find_bites(pool: &DonutPool, mouth: Vec2, collision_distance: f32) -> Vec<usize> {
    pool.active()
        .filter(|d| !d.eaten && mouth_donut_collision(mouth, d.pos, collision_distance))
        .map(|d| d.slot)
        .collect()
}
