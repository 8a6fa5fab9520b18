//! Game state and core simulation types
//!
//! One `GameState` is one play session. Hosts own it (through the
//! controller) and hand it to [`tick`](super::tick::tick) for every event.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::motion::FallRequest;
use super::spawn::SpawnScheduler;
use crate::settings::{GameConfig, Level};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a face (or an explicit start)
    #[default]
    NotStarted,
    /// Donuts are spawning
    Playing,
    /// Pool ran dry; terminal
    Ended,
}

/// A donut slot in the pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donut {
    pub slot: usize,
    /// Last position reported by the host
    pub pos: Vec2,
    /// Currently falling
    pub active: bool,
    /// Bitten during the current fall
    pub eaten: bool,
    /// Generation counter, bumped on every fall
    pub drop_id: u32,
}

impl Donut {
    pub fn new(slot: usize) -> Self {
        Self {
            slot,
            pos: Vec2::ZERO,
            active: false,
            eaten: false,
            drop_id: 0,
        }
    }

    /// Available to be spawned
    #[inline]
    pub fn is_idle(&self) -> bool {
        !self.active
    }
}

/// Fixed-size set of donut slots, iterated in slot order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonutPool {
    donuts: Vec<Donut>,
}

impl DonutPool {
    pub fn new(size: usize) -> Self {
        Self {
            donuts: (0..size).map(Donut::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.donuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.donuts.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&Donut> {
        self.donuts.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Donut> {
        self.donuts.get_mut(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Donut> {
        self.donuts.iter()
    }

    /// Donuts that are not falling
    pub fn all_idle(&self) -> impl Iterator<Item = &Donut> {
        self.donuts.iter().filter(|d| d.is_idle())
    }

    /// Slots of donuts that are not falling
    pub fn idle_slots(&self) -> Vec<usize> {
        self.all_idle().map(|d| d.slot).collect()
    }

    /// Donuts currently falling
    pub fn active(&self) -> impl Iterator<Item = &Donut> {
        self.donuts.iter().filter(|d| d.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Mark a donut as falling
    pub fn activate(&mut self, slot: usize) {
        if let Some(donut) = self.donuts.get_mut(slot) {
            donut.active = true;
        }
    }

    /// Return a donut to the idle set
    pub fn reset(&mut self, slot: usize) {
        if let Some(donut) = self.donuts.get_mut(slot) {
            donut.active = false;
            donut.eaten = false;
        }
    }
}

/// Handle for a pending host timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// What a timer fires into the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Delay between first face detection and game init
    StartDelay,
    /// Next spawn tick
    Spawn,
}

/// Commands for the host, produced by `tick` and drained by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Show or hide the donut container
    ContainerVisible(bool),
    /// Show or hide one donut
    DonutVisible { slot: usize, visible: bool },
    /// Move a donut without animating it
    PlaceDonut { slot: usize, pos: Vec2 },
    /// Start a donut's fall animation
    StartFall(FallRequest),
    /// Stop any in-flight motion on a slot
    ResetMotion { slot: usize },
    /// Fire `kind` with this id after `delay_ms`
    ScheduleTimer {
        timer: TimerId,
        kind: TimerKind,
        delay_ms: u32,
    },
    /// Drop a pending timer
    CancelTimer(TimerId),
    /// Bite sound; `restart` rewinds a sound that has already been started
    PlayChomp { restart: bool },
    /// New score to display
    ScoreChanged(u64),
    /// Emphasis pulse on the score display
    ScorePulse,
    /// Session is over
    GameEnded { score: u64 },
}

/// Complete state of a play session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub config: GameConfig,
    pub phase: GamePhase,
    pub score: u64,
    /// Index into `config.levels`
    pub current_level: usize,
    pub pool: DonutPool,
    pub scheduler: SpawnScheduler,
    /// Set once the first face detection has been handled
    pub face_seen: bool,
    /// Set once the bite sound has been started
    pub chomp_started: bool,
    /// Donuts eaten this session
    pub bites: u32,
    /// Donuts dropped this session
    pub spawned: u32,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the given config and seed
    ///
    /// The donut container starts hidden until the game is initialised.
    /// `config` must pass [`GameConfig::validate`]; `Controller::new` checks it.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let pool = DonutPool::new(config.pool_size);
        let mut state = Self {
            seed,
            config,
            phase: GamePhase::NotStarted,
            score: 0,
            current_level: 0,
            pool,
            scheduler: SpawnScheduler::default(),
            face_seen: false,
            chomp_started: false,
            bites: 0,
            spawned: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };
        state.emit(GameEvent::ContainerVisible(false));
        state
    }

    /// Level currently in effect
    pub fn level(&self) -> Level {
        self.config.level(self.current_level)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events emitted since the last drain, oldest first
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(GameConfig::default(), 7);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.score, 0);
        assert_eq!(state.pool.len(), 8);
        assert_eq!(state.pool.idle_slots(), (0..8).collect::<Vec<_>>());
        assert_eq!(state.pending_events(), &[GameEvent::ContainerVisible(false)]);
    }

    #[test]
    fn test_pool_activate_and_reset() {
        let mut pool = DonutPool::new(3);
        pool.activate(1);
        assert_eq!(pool.idle_slots(), vec![0, 2]);
        assert_eq!(pool.active_count(), 1);

        pool.get_mut(1).unwrap().eaten = true;
        pool.reset(1);
        let donut = pool.get(1).unwrap();
        assert!(!donut.active);
        assert!(!donut.eaten);
        assert_eq!(pool.all_idle().count(), 3);
    }

    #[test]
    fn test_pool_ignores_unknown_slot() {
        let mut pool = DonutPool::new(2);
        pool.activate(5);
        pool.reset(5);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.emit(GameEvent::ScorePulse);
        assert_eq!(state.drain_events().len(), 2);
        assert!(state.pending_events().is_empty());
    }
}
