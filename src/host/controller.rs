//! Session controller
//!
//! Owns the session and the host, translates host callbacks into simulation
//! events and applies the resulting commands back to the host.

use thiserror::Error;

use super::{BindError, Host, MouthGate, SceneBindings};
use crate::settings::{ConfigError, GameConfig};
use crate::sim::{Event, GameEvent, GamePhase, GameState, TimerId, TimerKind, tick};

/// Reasons a session cannot be set up
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Bind(#[from] BindError),
}

pub struct Controller<H: Host> {
    host: H,
    state: GameState,
    bindings: SceneBindings,
    mouth: MouthGate,
}

impl<H: Host> Controller<H> {
    /// Validate the config, bind the scene and set up a session
    ///
    /// Fails on an invalid config or if any configured scene element or
    /// audio controller is missing.
    pub fn new(host: H, config: GameConfig, seed: u64) -> Result<Self, SetupError> {
        config.validate()?;
        let bindings = SceneBindings::bind(&host, &config.scene, config.pool_size)?;
        let mouth = MouthGate::new(config.mouth_open_threshold);
        let mut controller = Self {
            host,
            state: GameState::new(config, seed),
            bindings,
            mouth,
        };
        controller.flush();
        Ok(controller)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn bindings(&self) -> &SceneBindings {
        &self.bindings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Apply one event and push its commands to the host
    pub fn dispatch(&mut self, event: Event) {
        tick(&mut self.state, event);
        self.flush();
    }

    /// Start without waiting for a face
    pub fn start(&mut self) {
        self.dispatch(Event::Start);
    }

    /// Check face tracking; the first tracked face starts the countdown
    pub fn poll_face(&mut self) {
        if self.host.face_count() >= 1 && !self.state.face_seen {
            self.dispatch(Event::FaceDetected);
        }
    }

    /// Sample mouth openness; on an opening edge, snapshot positions and check bites
    pub fn poll_mouth(&mut self) {
        if !self.mouth.update(self.host.mouth_openness()) {
            return;
        }
        let mouth = self.host.mouth_center();
        let positions = self
            .state
            .pool
            .active()
            .filter_map(|d| {
                self.bindings
                    .donut(d.slot)
                    .map(|e| (d.slot, self.host.position(e)))
            })
            .collect();
        self.dispatch(Event::MouthOpened { mouth, positions });
    }

    /// A host timer fired
    pub fn on_timer(&mut self, timer: TimerId, kind: TimerKind) {
        self.dispatch(kind.event(timer));
    }

    /// A fall animation finished
    pub fn on_animation_completed(&mut self, slot: usize, drop_id: u32) {
        self.dispatch(Event::AnimationCompleted { slot, drop_id });
    }

    fn flush(&mut self) {
        for event in self.state.drain_events() {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: GameEvent) {
        let b = &self.bindings;
        match event {
            GameEvent::ContainerVisible(visible) => self.host.set_hidden(b.container, !visible),
            GameEvent::DonutVisible { slot, visible } => {
                if let Some(e) = b.donut(slot) {
                    self.host.set_hidden(e, !visible);
                }
            }
            GameEvent::PlaceDonut { slot, pos } => {
                if let Some(e) = b.donut(slot) {
                    self.host.set_position(e, pos);
                }
            }
            GameEvent::StartFall(request) => {
                if let Some(e) = b.donut(request.slot) {
                    self.host.start_fall(e, &request);
                }
            }
            GameEvent::ResetMotion { slot } => {
                if let Some(e) = b.donut(slot) {
                    self.host.reset_motion(e);
                }
            }
            GameEvent::ScheduleTimer {
                timer,
                kind,
                delay_ms,
            } => self.host.schedule(timer, kind, delay_ms),
            GameEvent::CancelTimer(timer) => self.host.cancel(timer),
            GameEvent::PlayChomp { restart } => {
                if restart {
                    self.host.reset(b.chomp);
                }
                self.host.set_playing(b.chomp, true);
            }
            GameEvent::ScoreChanged(score) => {
                self.host.set_text(b.score_text, &score.to_string())
            }
            GameEvent::ScorePulse => self.host.pulse(b.score_pulse),
            GameEvent::GameEnded { score } => log::info!("Final score: {}", score),
        }
    }
}
