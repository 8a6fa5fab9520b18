//! Host runtime abstraction
//!
//! The AR runtime supplies face tracking, a scene graph, animation drivers,
//! audio and timers. The simulation only talks to them through these traits,
//! wired together by the [`Controller`].

mod bindings;
mod controller;
mod headless;

pub use bindings::{BindError, SceneBindings};
pub use controller::{Controller, SetupError};
pub use headless::{ActiveFall, HeadlessHost, Playback, SceneElement};

use glam::Vec2;

use crate::sim::{FallRequest, TimerId, TimerKind};

/// Handle to a scene element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// Handle to an audio playback controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AudioId(pub u32);

/// Face/mouth tracking provider
pub trait FaceTracker {
    /// Number of faces currently tracked
    fn face_count(&self) -> usize;
    /// Mouth openness in [0, 1]
    fn mouth_openness(&self) -> f32;
    /// Mouth center in scene units
    fn mouth_center(&self) -> Vec2;
}

/// Scene graph lookups and transforms
pub trait Scene {
    fn find(&self, name: &str) -> Option<ElementId>;
    fn set_hidden(&mut self, element: ElementId, hidden: bool);
    fn set_position(&mut self, element: ElementId, pos: Vec2);
    /// Play the host's emphasis pulse on an element
    fn pulse(&mut self, element: ElementId);
}

/// Text rendering
pub trait TextDisplay {
    fn set_text(&mut self, element: ElementId, text: &str);
}

/// Audio playback controllers
pub trait Audio {
    fn find_playback(&self, name: &str) -> Option<AudioId>;
    /// Rewind to the start
    fn reset(&mut self, playback: AudioId);
    fn set_playing(&mut self, playback: AudioId, playing: bool);
}

/// Animation drivers for falling donuts
///
/// A driver must report completion of every fall it finishes through
/// [`Controller::on_animation_completed`], echoing the request's slot and drop id.
pub trait MotionDriver {
    fn start_fall(&mut self, element: ElementId, request: &FallRequest);
    /// Stop the element's fall, if any
    fn reset_motion(&mut self, element: ElementId);
    /// Current animated position of the element
    fn position(&self, element: ElementId) -> Vec2;
}

/// One-shot timers
///
/// A fired timer is delivered through [`Controller::on_timer`].
pub trait Timers {
    fn schedule(&mut self, timer: TimerId, kind: TimerKind, delay_ms: u32);
    fn cancel(&mut self, timer: TimerId);
}

/// Everything the controller needs from the runtime
pub trait Host: FaceTracker + Scene + TextDisplay + Audio + MotionDriver + Timers {}

impl<T> Host for T where T: FaceTracker + Scene + TextDisplay + Audio + MotionDriver + Timers {}

/// Turns the continuous openness signal into closed -> open edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouthGate {
    threshold: f32,
    open: bool,
}

impl MouthGate {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            open: false,
        }
    }

    /// Feed a new openness sample; true only on the sample where the mouth opens
    pub fn update(&mut self, openness: f32) -> bool {
        let was_open = self.open;
        self.open = openness > self.threshold;
        self.open && !was_open
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouth_gate_fires_on_rising_edge_only() {
        let mut gate = MouthGate::new(0.3);
        assert!(!gate.update(0.1));
        assert!(gate.update(0.5));
        // Still open, no retrigger
        assert!(!gate.update(0.9));
        assert!(gate.is_open());
        assert!(!gate.update(0.2));
        assert!(gate.update(0.4));
    }

    #[test]
    fn test_mouth_gate_threshold_is_exclusive() {
        let mut gate = MouthGate::new(0.3);
        assert!(!gate.update(0.3));
        assert!(gate.update(0.31));
    }
}
