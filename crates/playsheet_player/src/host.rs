// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host services for headless play.
//!
//! Side effects requested by walks are queued and serviced by the player
//! after each frame, when the interpreter is no longer mid-walk.

use indexmap::IndexMap;
use parking_lot::Mutex;
use playsheet_graph::Value;
use playsheet_runtime::{AudioService, EntityLookup, HostServices, SceneService, SharedPointer};
use std::sync::Arc;

/// A side effect requested by a walk
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    /// Play a tone
    Beep {
        /// Hz
        frequency: f64,
        /// Seconds
        duration: f64,
        /// Waveform name
        waveform: String,
    },
    /// Switch to another scene
    SwitchScene(String),
    /// Switch the scene's state
    SwitchState(String),
    /// Spawn a copy of a template actor
    Spawn {
        /// Template actor id
        template: String,
        /// X
        x: f64,
        /// Y
        y: f64,
    },
    /// Remove an actor
    Destroy(String),
}

/// Queue and entity table shared between the player and its services
#[derive(Debug, Clone, Default)]
pub struct PlayerHost {
    requests: Arc<Mutex<Vec<HostRequest>>>,
    /// Last mirrored color per live entity
    entities: Arc<Mutex<IndexMap<String, Option<Value>>>>,
}

impl PlayerHost {
    /// Empty queue, no entities
    pub fn new() -> Self {
        Self::default()
    }

    /// Host services for an interpreter, reading input from `pointer`
    pub fn services(&self, pointer: &SharedPointer) -> HostServices {
        HostServices::new()
            .with_input(pointer.clone())
            .with_audio(self.clone())
            .with_scene(self.clone())
            .with_entities(self.clone())
    }

    /// Take every queued request, oldest first
    pub fn drain(&self) -> Vec<HostRequest> {
        std::mem::take(&mut *self.requests.lock())
    }

    /// Number of queued requests
    pub fn pending(&self) -> usize {
        self.requests.lock().len()
    }

    /// Make an entity visible to color mirroring
    pub fn track_entity(&self, entity_id: &str) {
        self.entities.lock().entry(entity_id.to_string()).or_insert(None);
    }

    /// Drop an entity
    pub fn forget_entity(&self, entity_id: &str) {
        self.entities.lock().shift_remove(entity_id);
    }

    /// Forget every entity and pending request
    pub fn clear(&self) {
        self.requests.lock().clear();
        self.entities.lock().clear();
    }

    /// Last color mirrored onto an entity
    pub fn color(&self, entity_id: &str) -> Option<Value> {
        self.entities.lock().get(entity_id).cloned().flatten()
    }

    fn push(&self, request: HostRequest) {
        self.requests.lock().push(request);
    }
}

impl AudioService for PlayerHost {
    fn play_beep(&mut self, frequency: f64, duration: f64, waveform: &str) {
        self.push(HostRequest::Beep {
            frequency,
            duration,
            waveform: waveform.to_string(),
        });
    }
}

impl SceneService for PlayerHost {
    fn switch_to(&mut self, scene: &str) {
        self.push(HostRequest::SwitchScene(scene.to_string()));
    }

    fn switch_state(&mut self, state: &str) {
        self.push(HostRequest::SwitchState(state.to_string()));
    }

    fn spawn_actor(&mut self, template: &str, x: f64, y: f64) {
        self.push(HostRequest::Spawn {
            template: template.to_string(),
            x,
            y,
        });
    }

    fn destroy_actor(&mut self, actor_id: &str) {
        self.push(HostRequest::Destroy(actor_id.to_string()));
    }
}

impl EntityLookup for PlayerHost {
    fn mirror_color(&mut self, entity_id: &str, color: &Value) -> bool {
        match self.entities.lock().get_mut(entity_id) {
            Some(slot) => {
                *slot = Some(color.clone());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_queue_in_order() {
        let mut host = PlayerHost::new();
        host.play_beep(440.0, 0.1, "square");
        host.destroy_actor("gem");
        host.switch_to("menu");
        assert_eq!(host.pending(), 3);

        let drained = host.drain();
        assert_eq!(drained[1], HostRequest::Destroy("gem".into()));
        assert_eq!(drained[2], HostRequest::SwitchScene("menu".into()));
        assert_eq!(host.pending(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let host = PlayerHost::new();
        let mut service = host.clone();
        service.spawn_actor("coin", 1.0, 2.0);
        assert_eq!(host.pending(), 1);
    }

    #[test]
    fn test_mirror_color_needs_tracked_entity() {
        let mut host = PlayerHost::new();
        assert!(!host.mirror_color("hero", &Value::from("#ff0000")));

        host.track_entity("hero");
        assert_eq!(host.color("hero"), None);
        assert!(host.mirror_color("hero", &Value::from("#ff0000")));
        assert_eq!(host.color("hero"), Some(Value::from("#ff0000")));

        host.forget_entity("hero");
        assert!(!host.mirror_color("hero", &Value::from("#00ff00")));
    }
}
