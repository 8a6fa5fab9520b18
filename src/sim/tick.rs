//! Event dispatch
//!
//! Every input from the host (timers, face/mouth tracking, animation
//! completion) is an [`Event`] applied by [`tick`]. Each call runs to
//! completion and leaves its output in the state's event queue.

use glam::Vec2;

use super::collision::find_bites;
use super::spawn::{pick_idle_slot, plan_fall};
use super::state::{GameEvent, GamePhase, GameState, TimerId, TimerKind};

/// Inputs to the simulation
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A face is being tracked
    FaceDetected,
    /// The post-detection delay elapsed
    StartDelayElapsed(TimerId),
    /// Initialise and start immediately, skipping the face delay
    Start,
    /// Spawn timer fired
    SpawnTick(TimerId),
    /// Mouth crossed the open threshold
    MouthOpened {
        mouth: Vec2,
        /// Last-known positions of donuts, by slot
        positions: Vec<(usize, Vec2)>,
    },
    /// A fall animation ran to the end
    AnimationCompleted { slot: usize, drop_id: u32 },
}

impl TimerKind {
    /// The event this timer delivers when it fires
    pub fn event(self, timer: TimerId) -> Event {
        match self {
            TimerKind::StartDelay => Event::StartDelayElapsed(timer),
            TimerKind::Spawn => Event::SpawnTick(timer),
        }
    }
}

/// Apply one event to the session
pub fn tick(state: &mut GameState, event: Event) {
    match event {
        Event::FaceDetected => on_face_detected(state),
        Event::StartDelayElapsed(timer) => {
            if state.scheduler.fire(timer) == Some(TimerKind::StartDelay) {
                init_game(state);
            } else {
                log::debug!("Ignoring stale start timer {:?}", timer);
            }
        }
        Event::Start => {
            if state.phase != GamePhase::NotStarted {
                log::warn!("Ignoring start while {:?}", state.phase);
                return;
            }
            if let Some(timer) = state.scheduler.cancel() {
                state.emit(GameEvent::CancelTimer(timer));
            }
            init_game(state);
        }
        Event::SpawnTick(timer) => {
            if state.scheduler.fire(timer) == Some(TimerKind::Spawn) {
                spawn_tick(state);
            } else {
                log::debug!("Ignoring stale spawn timer {:?}", timer);
            }
        }
        Event::MouthOpened { mouth, positions } => on_mouth_opened(state, mouth, &positions),
        Event::AnimationCompleted { slot, drop_id } => on_animation_completed(state, slot, drop_id),
    }
}

/// First face detection schedules initialisation; later ones are ignored
fn on_face_detected(state: &mut GameState) {
    if state.face_seen || state.phase != GamePhase::NotStarted {
        return;
    }
    state.face_seen = true;
    let delay_ms = state.config.start_delay_ms;
    schedule(state, TimerKind::StartDelay, delay_ms);
    log::info!("Face found, starting in {} ms", delay_ms);
}

/// Put every donut at the top, show the container, zero the display, then start
fn init_game(state: &mut GameState) {
    if state.phase != GamePhase::NotStarted {
        log::warn!("Game already initialised ({:?}), ignoring", state.phase);
        return;
    }

    let top = state.config.donut_y_start;
    for slot in 0..state.pool.len() {
        let pos = Vec2::new(0.0, top);
        if let Some(donut) = state.pool.get_mut(slot) {
            donut.pos = pos;
        }
        state.emit(GameEvent::PlaceDonut { slot, pos });
        state.emit(GameEvent::DonutVisible { slot, visible: true });
    }
    state.emit(GameEvent::ContainerVisible(true));
    state.current_level = 0;
    state.emit(GameEvent::ScoreChanged(0));

    start(state);
}

/// NotStarted -> Playing; the first spawn happens right away
pub fn start(state: &mut GameState) {
    if state.phase != GamePhase::NotStarted {
        log::warn!("Cannot start from {:?}", state.phase);
        return;
    }
    state.phase = GamePhase::Playing;
    state.score = 0;
    state.bites = 0;
    state.spawned = 0;
    log::info!(
        "Game started (seed {}, level {}, pool {})",
        state.seed,
        state.current_level,
        state.pool.len()
    );
    spawn_tick(state);
}

/// One spawn step: drop a random idle donut, or end the game if none is left
fn spawn_tick(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }

    let Some(slot) = pick_idle_slot(&state.pool, &mut state.rng) else {
        log::info!("No donut to spawn");
        on_pool_exhausted(state);
        return;
    };
    drop_donut(state, slot);

    let delay_ms = state.level().spawn_delay_ms;
    schedule(state, TimerKind::Spawn, delay_ms);
}

/// Playing -> Ended; stops spawning for good
pub fn on_pool_exhausted(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.phase = GamePhase::Ended;
    if let Some(timer) = state.scheduler.cancel() {
        state.emit(GameEvent::CancelTimer(timer));
    }
    log::info!(
        "Game ended: score {} ({} of {} donuts eaten)",
        state.score,
        state.bites,
        state.spawned
    );
    state.emit(GameEvent::GameEnded { score: state.score });
}

fn drop_donut(state: &mut GameState, slot: usize) {
    let level = state.level();
    let Some(drop_id) = state.pool.get_mut(slot).map(|d| {
        d.drop_id = d.drop_id.wrapping_add(1);
        d.drop_id
    }) else {
        return;
    };
    let request = plan_fall(&state.config, level, slot, drop_id, &mut state.rng);
    let start = request.start;
    state.emit(GameEvent::StartFall(request));

    if let Some(donut) = state.pool.get_mut(slot) {
        donut.pos = start;
    }
    state.pool.activate(slot);
    state.spawned += 1;
    state.emit(GameEvent::DonutVisible { slot, visible: true });
}

/// Bites count while donuts are falling, including those still in the air after Ended
fn on_mouth_opened(state: &mut GameState, mouth: Vec2, positions: &[(usize, Vec2)]) {
    if state.phase == GamePhase::NotStarted {
        return;
    }

    for &(slot, pos) in positions {
        if let Some(donut) = state.pool.get_mut(slot) {
            donut.pos = pos;
        }
    }

    for slot in find_bites(&state.pool, mouth, state.config.collision_distance) {
        eat_donut(state, slot);
    }
}

fn eat_donut(state: &mut GameState, slot: usize) {
    let restart = state.chomp_started;
    state.chomp_started = true;
    state.emit(GameEvent::PlayChomp { restart });

    if let Some(donut) = state.pool.get_mut(slot) {
        donut.eaten = true;
    }
    state.emit(GameEvent::DonutVisible { slot, visible: false });
    state.pool.reset(slot);
    state.emit(GameEvent::ResetMotion { slot });

    state.score += state.config.score_increment;
    state.bites += 1;
    log::debug!("Donut {} eaten, score {}", slot, state.score);
    state.emit(GameEvent::ScoreChanged(state.score));
    state.emit(GameEvent::ScorePulse);
}

/// A donut that reached the bottom uneaten expires
fn on_animation_completed(state: &mut GameState, slot: usize, drop_id: u32) {
    let Some(donut) = state.pool.get_mut(slot) else {
        log::warn!("Animation completed for unknown slot {}", slot);
        return;
    };
    if donut.drop_id != drop_id {
        log::debug!("Ignoring stale completion for slot {} (drop {})", slot, drop_id);
        return;
    }
    donut.active = false;
    state.emit(GameEvent::DonutVisible { slot, visible: false });
}

fn schedule(state: &mut GameState, kind: TimerKind, delay_ms: u32) {
    let (timer, replaced) = state.scheduler.schedule(kind);
    if let Some(old) = replaced {
        state.emit(GameEvent::CancelTimer(old));
    }
    state.emit(GameEvent::ScheduleTimer {
        timer,
        kind,
        delay_ms,
    });
}
