//! Spawn timing and donut selection
//!
//! Spawning runs on a self-rescheduling timer: each tick schedules the next
//! one `spawn_delay_ms` later, so drift accumulates. Only one timer is ever
//! pending and it is cancelled explicitly when the phase changes; a tick
//! whose id does not match the pending handle is stale.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::motion::{FallRequest, Sampler};
use super::state::{DonutPool, TimerId, TimerKind};
use crate::settings::{GameConfig, Level};

/// Owner of the single pending host timer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnScheduler {
    pending: Option<(TimerId, TimerKind)>,
    next_id: u64,
}

impl SpawnScheduler {
    /// Allocate a timer for `kind`
    ///
    /// Returns the new id and the id it replaced, which the host must cancel.
    pub fn schedule(&mut self, kind: TimerKind) -> (TimerId, Option<TimerId>) {
        let replaced = self.cancel();
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending = Some((id, kind));
        (id, replaced)
    }

    /// Drop the pending timer, returning its id
    pub fn cancel(&mut self) -> Option<TimerId> {
        self.pending.take().map(|(id, _)| id)
    }

    /// Consume a fired timer
    ///
    /// Returns its kind if `timer` is the pending one, `None` if stale.
    pub fn fire(&mut self, timer: TimerId) -> Option<TimerKind> {
        match self.pending {
            Some((id, kind)) if id == timer => {
                self.pending = None;
                Some(kind)
            }
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<(TimerId, TimerKind)> {
        self.pending
    }
}

/// Uniformly pick one idle slot, `None` when every donut is falling
pub fn pick_idle_slot<R: Rng>(pool: &DonutPool, rng: &mut R) -> Option<usize> {
    let idle = pool.idle_slots();
    if idle.is_empty() {
        return None;
    }
    Some(idle[rng.random_range(0..idle.len())])
}

/// Random horizontal start: a value drawn from `[spawn_min_x, spawn_max_x]`
/// with its sign then flipped at random
///
/// The range's own sign does not matter; only the drawn magnitude survives,
/// so the default `[-0.15, 0.15]` range yields `|x| <= 0.15`.
pub fn random_start_x<R: Rng>(config: &GameConfig, rng: &mut R) -> f32 {
    let x = rng.random_range(config.spawn_min_x..=config.spawn_max_x);
    if rng.random_bool(0.5) { x } else { -x }
}

/// Build the fall for `slot` at the given level
pub fn plan_fall<R: Rng>(
    config: &GameConfig,
    level: Level,
    slot: usize,
    drop_id: u32,
    rng: &mut R,
) -> FallRequest {
    let x = random_start_x(config, rng);
    FallRequest {
        slot,
        drop_id,
        start: Vec2::new(x, config.donut_y_start),
        end_y: config.donut_y_end,
        duration_ms: level.animation_time_ms,
        rotation_end: config.rotation_end,
        y_sampler: Sampler::Linear,
        rotation_sampler: Sampler::EaseInCubic,
    }
}
