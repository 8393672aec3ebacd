// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host services the interpreter calls out to.
//!
//! Every service is optional. A node whose service is absent does nothing and
//! the walk continues. Services are `Send` so a host can move the interpreter
//! behind a lock on another thread.

use parking_lot::RwLock;
use playsheet_graph::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Pointer (mouse or touch) state in scene coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    /// X
    pub x: f64,
    /// Y
    pub y: f64,
    /// Button or touch is down
    #[serde(default)]
    pub pressed: bool,
}

impl PointerState {
    /// Pointer at a position, not pressed
    pub fn at(x: f64, y: f64) -> Self {
        Self { x, y, pressed: false }
    }
}

/// Source of pointer input, read by `GetInput`
pub trait InputService: Send {
    /// Current pointer state
    fn pointer(&self) -> PointerState;
}

/// Sound output, used by `PlaySound`
pub trait AudioService: Send {
    /// Play a short synthesized tone
    fn play_beep(&mut self, frequency: f64, duration: f64, waveform: &str);
}

/// Scene navigation and actor lifetime
pub trait SceneService: Send {
    /// Switch to another scene
    fn switch_to(&mut self, scene: &str);
    /// Switch the current scene's state
    fn switch_state(&mut self, state: &str);
    /// Spawn an actor from a template at a position
    fn spawn_actor(&mut self, template: &str, x: f64, y: f64);
    /// Destroy an actor
    fn destroy_actor(&mut self, actor_id: &str);
}

/// Access to live scene entities
pub trait EntityLookup: Send {
    /// Copy a color onto the entity. Returns false if no such entity exists.
    fn mirror_color(&mut self, entity_id: &str, color: &Value) -> bool;
}

/// The set of services available to node handlers
#[derive(Default)]
pub struct HostServices {
    /// Pointer input
    pub input: Option<Box<dyn InputService>>,
    /// Audio
    pub audio: Option<Box<dyn AudioService>>,
    /// Scene control
    pub scene: Option<Box<dyn SceneService>>,
    /// Entity lookup
    pub entities: Option<Box<dyn EntityLookup>>,
}

impl HostServices {
    /// No services
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input service
    pub fn with_input(mut self, input: impl InputService + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    /// Set the audio service
    pub fn with_audio(mut self, audio: impl AudioService + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    /// Set the scene service
    pub fn with_scene(mut self, scene: impl SceneService + 'static) -> Self {
        self.scene = Some(Box::new(scene));
        self
    }

    /// Set the entity lookup
    pub fn with_entities(mut self, entities: impl EntityLookup + 'static) -> Self {
        self.entities = Some(Box::new(entities));
        self
    }
}

impl fmt::Debug for HostServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostServices")
            .field("input", &self.input.is_some())
            .field("audio", &self.audio.is_some())
            .field("scene", &self.scene.is_some())
            .field("entities", &self.entities.is_some())
            .finish()
    }
}

/// An [`InputService`] over a shared pointer cell.
///
/// Clones share the same cell, so the host keeps one clone to write into and
/// hands another to the interpreter.
#[derive(Debug, Clone, Default)]
pub struct SharedPointer {
    state: Arc<RwLock<PointerState>>,
}

impl SharedPointer {
    /// Create a cell holding an initial state
    pub fn new(initial: PointerState) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
        }
    }

    /// Replace the pointer state
    pub fn set(&self, state: PointerState) {
        *self.state.write() = state;
    }

    /// Move the pointer, keeping the pressed flag
    pub fn move_to(&self, x: f64, y: f64) {
        let mut state = self.state.write();
        state.x = x;
        state.y = y;
    }

    /// Read the pointer state
    pub fn get(&self) -> PointerState {
        *self.state.read()
    }
}

impl InputService for SharedPointer {
    fn pointer(&self) -> PointerState {
        self.get()
    }
}
