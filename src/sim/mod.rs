//! Deterministic simulation module
//!
//! All gameplay decisions live here. This module must be pure and deterministic:
//! - Event driven only (no clocks, the host owns time)
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No scene, audio or tracking dependencies

pub mod collision;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{find_bites, mouth_donut_collision};
pub use motion::{FallRequest, Sampler};
pub use spawn::{SpawnScheduler, pick_idle_slot, plan_fall};
pub use state::{Donut, DonutPool, GameEvent, GamePhase, GameState, TimerId, TimerKind};
pub use tick::{Event, on_pool_exhausted, start, tick};
