//! Scene element lookup
//!
//! All names are resolved once, up front. A missing element is a broken
//! scene, so binding fails and the game never starts.

use thiserror::Error;

use super::{Audio, AudioId, ElementId, Scene};
use crate::settings::SceneNames;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("scene element `{0}` not found")]
    MissingElement(String),
    #[error("audio playback `{0}` not found")]
    MissingAudio(String),
}

/// Resolved handles for everything the game touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneBindings {
    pub container: ElementId,
    /// Indexed by pool slot
    pub donuts: Vec<ElementId>,
    pub score_text: ElementId,
    pub score_pulse: ElementId,
    pub chomp: AudioId,
}

impl SceneBindings {
    pub fn bind<H: Scene + Audio>(
        host: &H,
        names: &SceneNames,
        pool_size: usize,
    ) -> Result<Self, BindError> {
        let element = |name: &str| {
            host.find(name)
                .ok_or_else(|| BindError::MissingElement(name.to_string()))
        };

        let donuts = (0..pool_size)
            .map(|slot| element(&names.donut(slot)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            container: element(&names.donut_container)?,
            donuts,
            score_text: element(&names.score_text)?,
            score_pulse: element(&names.score_pulse)?,
            chomp: host
                .find_playback(&names.chomp_audio)
                .ok_or_else(|| BindError::MissingAudio(names.chomp_audio.clone()))?,
        })
    }

    /// Element for a pool slot
    pub fn donut(&self, slot: usize) -> Option<ElementId> {
        self.donuts.get(slot).copied()
    }

    /// Pool slot for an element
    pub fn slot_of(&self, element: ElementId) -> Option<usize> {
        self.donuts.iter().position(|&e| e == element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessHost;

    #[test]
    fn test_bind_default_scene() {
        let names = SceneNames::default();
        let host = HeadlessHost::with_scene(&names, 8);
        let bindings = SceneBindings::bind(&host, &names, 8).unwrap();
        assert_eq!(bindings.donuts.len(), 8);
        assert_eq!(bindings.slot_of(bindings.donuts[3]), Some(3));
        assert_eq!(bindings.donut(8), None);
    }

    #[test]
    fn test_bind_missing_donut() {
        let names = SceneNames::default();
        // Scene only has 7 donuts
        let host = HeadlessHost::with_scene(&names, 7);
        let err = SceneBindings::bind(&host, &names, 8).unwrap_err();
        assert_eq!(err, BindError::MissingElement("Donut_8".to_string()));
    }

    #[test]
    fn test_bind_missing_audio() {
        let names = SceneNames::default();
        let mut host = HeadlessHost::new();
        for slot in 0..2 {
            host.add_element(&names.donut(slot));
        }
        host.add_element(&names.donut_container);
        host.add_element(&names.score_text);
        host.add_element(&names.score_pulse);
        let err = SceneBindings::bind(&host, &names, 2).unwrap_err();
        assert_eq!(err, BindError::MissingAudio("chomp".to_string()));
    }
}
