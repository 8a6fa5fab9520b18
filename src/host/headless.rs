//! Headless reference host
//!
//! A simulated runtime with a manual clock: scene elements are plain
//! records, falls are evaluated with their requested samplers, timers sit in
//! a queue. Used by the demo binary and by tests that drive whole sessions.

use glam::Vec2;

use super::{
    Audio, AudioId, Controller, ElementId, FaceTracker, MotionDriver, Scene, TextDisplay, Timers,
};
use crate::settings::SceneNames;
use crate::sim::{FallRequest, TimerId, TimerKind};

/// A scene element as the headless host sees it
#[derive(Debug, Clone, PartialEq)]
pub struct SceneElement {
    pub name: String,
    pub hidden: bool,
    pub pos: Vec2,
    pub rotation: f32,
    pub text: String,
    /// Emphasis pulses played on this element
    pub pulses: u32,
}

/// An audio playback controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    pub name: String,
    pub playing: bool,
    pub resets: u32,
    /// Times playback was switched on
    pub plays: u32,
}

/// A fall in progress
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFall {
    pub element: ElementId,
    pub request: FallRequest,
    pub started_ms: u64,
}

impl ActiveFall {
    fn ends_ms(&self) -> u64 {
        self.started_ms + self.request.duration_ms as u64
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    due_ms: u64,
    timer: TimerId,
    kind: TimerKind,
}

/// Next thing to happen on the simulated clock
enum Due {
    Fall(u64, ElementId),
    Timer(u64, TimerId, TimerKind),
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    now_ms: u64,
    elements: Vec<SceneElement>,
    playbacks: Vec<Playback>,
    falls: Vec<ActiveFall>,
    timers: Vec<PendingTimer>,
    faces: usize,
    openness: f32,
    mouth: Vec2,
}

impl HeadlessHost {
    /// Empty scene, no faces
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene containing every element and playback named in `names`
    pub fn with_scene(names: &SceneNames, donuts: usize) -> Self {
        let mut host = Self::new();
        host.add_element(&names.donut_container);
        for slot in 0..donuts {
            host.add_element(&names.donut(slot));
        }
        host.add_element(&names.score_text);
        host.add_element(&names.score_pulse);
        host.add_playback(&names.chomp_audio);
        host
    }

    pub fn add_element(&mut self, name: &str) -> ElementId {
        self.elements.push(SceneElement {
            name: name.to_string(),
            hidden: false,
            pos: Vec2::ZERO,
            rotation: 0.0,
            text: String::new(),
            pulses: 0,
        });
        ElementId(self.elements.len() as u32 - 1)
    }

    pub fn add_playback(&mut self, name: &str) -> AudioId {
        self.playbacks.push(Playback {
            name: name.to_string(),
            playing: false,
            resets: 0,
            plays: 0,
        });
        AudioId(self.playbacks.len() as u32 - 1)
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn element(&self, id: ElementId) -> Option<&SceneElement> {
        self.elements.get(id.0 as usize)
    }

    pub fn element_by_name(&self, name: &str) -> Option<&SceneElement> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn playback(&self, name: &str) -> Option<&Playback> {
        self.playbacks.iter().find(|p| p.name == name)
    }

    pub fn falls(&self) -> &[ActiveFall] {
        &self.falls
    }

    /// Number of timers waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn set_faces(&mut self, count: usize) {
        self.faces = count;
    }

    pub fn set_mouth(&mut self, center: Vec2, openness: f32) {
        self.mouth = center;
        self.openness = openness.clamp(0.0, 1.0);
    }

    /// Earliest fall end or timer at or before `until`; falls win ties
    fn next_due(&self, until: u64) -> Option<Due> {
        let fall = self
            .falls
            .iter()
            .map(|f| (f.ends_ms(), f.element))
            .filter(|&(t, _)| t <= until)
            .min_by_key(|&(t, e)| (t, e));
        let timer = self
            .timers
            .iter()
            .filter(|t| t.due_ms <= until)
            .min_by_key(|t| (t.due_ms, t.timer));

        match (fall, timer) {
            (Some((ft, e)), Some(t)) if ft <= t.due_ms => Some(Due::Fall(ft, e)),
            (_, Some(t)) => Some(Due::Timer(t.due_ms, t.timer, t.kind)),
            (Some((ft, e)), None) => Some(Due::Fall(ft, e)),
            (None, None) => None,
        }
    }

    /// Move the clock and re-sample every fall
    fn set_clock(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        for fall in &self.falls {
            let t = fall.request.progress(now_ms.saturating_sub(fall.started_ms));
            if let Some(el) = self.elements.get_mut(fall.element.0 as usize) {
                el.pos = fall.request.position_at(t);
                el.rotation = fall.request.rotation_at(t);
            }
        }
    }

    fn take_timer(&mut self, timer: TimerId) {
        self.timers.retain(|t| t.timer != timer);
    }

    /// Remove a finished fall, returning what it animated
    fn finish_fall(&mut self, element: ElementId) -> Option<FallRequest> {
        let index = self.falls.iter().position(|f| f.element == element)?;
        Some(self.falls.remove(index).request)
    }
}

impl FaceTracker for HeadlessHost {
    fn face_count(&self) -> usize {
        self.faces
    }

    fn mouth_openness(&self) -> f32 {
        self.openness
    }

    fn mouth_center(&self) -> Vec2 {
        self.mouth
    }
}

impl Scene for HeadlessHost {
    fn find(&self, name: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|e| e.name == name)
            .map(|i| ElementId(i as u32))
    }

    fn set_hidden(&mut self, element: ElementId, hidden: bool) {
        if let Some(el) = self.elements.get_mut(element.0 as usize) {
            el.hidden = hidden;
        }
    }

    fn set_position(&mut self, element: ElementId, pos: Vec2) {
        if let Some(el) = self.elements.get_mut(element.0 as usize) {
            el.pos = pos;
        }
    }

    fn pulse(&mut self, element: ElementId) {
        if let Some(el) = self.elements.get_mut(element.0 as usize) {
            el.pulses += 1;
        }
    }
}

impl TextDisplay for HeadlessHost {
    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(el) = self.elements.get_mut(element.0 as usize) {
            el.text = text.to_string();
        }
    }
}

impl Audio for HeadlessHost {
    fn find_playback(&self, name: &str) -> Option<AudioId> {
        self.playbacks
            .iter()
            .position(|p| p.name == name)
            .map(|i| AudioId(i as u32))
    }

    fn reset(&mut self, playback: AudioId) {
        if let Some(p) = self.playbacks.get_mut(playback.0 as usize) {
            p.resets += 1;
        }
    }

    fn set_playing(&mut self, playback: AudioId, playing: bool) {
        if let Some(p) = self.playbacks.get_mut(playback.0 as usize) {
            p.playing = playing;
            if playing {
                p.plays += 1;
            }
        }
    }
}

impl MotionDriver for HeadlessHost {
    fn start_fall(&mut self, element: ElementId, request: &FallRequest) {
        self.falls.retain(|f| f.element != element);
        self.falls.push(ActiveFall {
            element,
            request: request.clone(),
            started_ms: self.now_ms,
        });
        if let Some(el) = self.elements.get_mut(element.0 as usize) {
            el.pos = request.start;
            el.rotation = 0.0;
        }
    }

    fn reset_motion(&mut self, element: ElementId) {
        if let Some(request) = self.finish_fall(element) {
            if let Some(el) = self.elements.get_mut(element.0 as usize) {
                el.pos = request.start;
                el.rotation = 0.0;
            }
        }
    }

    fn position(&self, element: ElementId) -> Vec2 {
        self.element(element).map(|e| e.pos).unwrap_or(Vec2::ZERO)
    }
}

impl Timers for HeadlessHost {
    fn schedule(&mut self, timer: TimerId, kind: TimerKind, delay_ms: u32) {
        self.timers.push(PendingTimer {
            due_ms: self.now_ms + delay_ms as u64,
            timer,
            kind,
        });
    }

    fn cancel(&mut self, timer: TimerId) {
        self.take_timer(timer);
    }
}

impl Controller<HeadlessHost> {
    /// Advance the simulated clock, delivering timers and fall completions in time order
    pub fn advance(&mut self, ms: u64) {
        let target = self.host().now_ms + ms;
        while let Some(due) = self.host().next_due(target) {
            match due {
                Due::Fall(at, element) => {
                    let host = self.host_mut();
                    host.set_clock(at);
                    if let Some(request) = host.finish_fall(element) {
                        if let Some(el) = host.elements.get_mut(element.0 as usize) {
                            el.pos = request.position_at(1.0);
                            el.rotation = request.rotation_at(1.0);
                        }
                        self.on_animation_completed(request.slot, request.drop_id);
                    }
                }
                Due::Timer(at, timer, kind) => {
                    let host = self.host_mut();
                    host.set_clock(at);
                    host.take_timer(timer);
                    self.on_timer(timer, kind);
                }
            }
        }
        self.host_mut().set_clock(target);
    }

    /// Run `frames` frames of `frame_ms`, polling tracking after each
    pub fn run_frames(&mut self, frames: u32, frame_ms: u64) {
        for _ in 0..frames {
            self.advance(frame_ms);
            self.poll_face();
            self.poll_mouth();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;
    use crate::sim::GamePhase;

    fn controller(seed: u64) -> Controller<HeadlessHost> {
        let config = GameConfig::default();
        let host = HeadlessHost::with_scene(&config.scene, config.pool_size);
        Controller::new(host, config, seed).unwrap()
    }

    #[test]
    fn test_container_hidden_until_start() {
        let mut c = controller(1);
        assert!(c.host().element_by_name("Donuts").unwrap().hidden);

        c.host_mut().set_faces(1);
        c.run_frames(1, 16);
        assert_eq!(c.phase(), GamePhase::NotStarted);
        assert_eq!(c.host().pending_timers(), 1);

        c.advance(1000);
        assert_eq!(c.phase(), GamePhase::Playing);
        assert!(!c.host().element_by_name("Donuts").unwrap().hidden);
        assert_eq!(c.host().element_by_name("ScoreText").unwrap().text, "0");
    }

    #[test]
    fn test_fall_expires_uneaten() {
        let mut c = controller(2);
        c.start();
        assert_eq!(c.host().falls().len(), 1);
        let first = c.host().falls()[0].clone();

        // One more spawn per second; the first fall ends at 3000 ms and its
        // slot may be picked again by the spawn due at the same instant
        c.advance(3000);
        assert!(!c.host().falls().contains(&first));
        let donut = c.state().pool.get(first.request.slot).unwrap();
        assert!(!donut.active || donut.drop_id != first.request.drop_id);
        assert_eq!(c.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_falling_position_is_sampled() {
        let mut c = controller(3);
        c.start();
        let fall = c.host().falls()[0].clone();
        c.advance(1500);
        let pos = c.host().element(fall.element).unwrap().pos;
        assert!((pos.x - fall.request.start.x).abs() < 1e-6);
        assert!(pos.y.abs() < 1e-4);
    }

    #[test]
    fn test_bite_updates_scene() {
        let mut c = controller(4);
        c.start();
        let fall = c.host().falls()[0].clone();
        c.advance(500);
        let pos = c.host().element(fall.element).unwrap().pos;

        c.host_mut().set_mouth(pos, 0.8);
        c.poll_mouth();

        assert_eq!(c.score(), 100);
        let host = c.host();
        assert!(host.element(fall.element).unwrap().hidden);
        assert_eq!(host.element_by_name("ScoreText").unwrap().text, "100");
        assert_eq!(host.element_by_name("scorePlusContainer").unwrap().pulses, 1);
        let chomp = host.playback("chomp").unwrap();
        assert!(chomp.playing);
        assert_eq!((chomp.plays, chomp.resets), (1, 0));
        assert!(host.falls().iter().all(|f| f.element != fall.element));
    }

    #[test]
    fn test_mouth_held_open_bites_once() {
        let mut c = controller(5);
        c.start();
        let fall = c.host().falls()[0].clone();
        c.host_mut().set_mouth(fall.request.start, 1.0);
        c.poll_mouth();
        assert_eq!(c.score(), 100);

        // Next spawn lands on the same spot; mouth never closed
        c.advance(1000);
        let next = c.host().falls()[0].request.start;
        c.host_mut().set_mouth(next, 1.0);
        c.poll_mouth();
        assert_eq!(c.score(), 100);
    }
}
