// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame-stepped play of a synthesized scene.
//!
//! This module handles:
//! - Starting, pausing and stopping play
//! - Fixed-timestep frames with a time scale
//! - Replaying scripted input and events
//! - Servicing host requests between frames
//! - Restoring the scene's actors when play stops

use crate::error::PlayerError;
use crate::host::{HostRequest, PlayerHost};
use crate::hot_reload::HotReloader;
use crate::settings::{PlayerSettings, ScheduledEvent, ScriptedEvent, SETTINGS_FORMAT_VERSION};
use indexmap::IndexMap;
use playsheet_graph::{EventKind, Value};
use playsheet_runtime::{
    Actor, EventData, Interpreter, InterpreterConfig, PointerState, SceneConfig, SharedPointer,
    Synthesizer,
};
use std::time::Duration;

/// Upper bound on the time scale
const MAX_TIME_SCALE: f64 = 10.0;

/// Play state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    /// Not running; actors are in their initial state
    #[default]
    Stopped,
    /// Frames advance
    Playing,
    /// Frames advance only by explicit steps
    Paused,
}

impl PlayState {
    /// Check if play has started (playing or paused)
    pub fn is_active(&self) -> bool {
        matches!(self, PlayState::Playing | PlayState::Paused)
    }
}

/// What happened during play, as seen through host requests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayLog {
    /// Tones played
    pub beeps: usize,
    /// Requested scene switches, in order
    pub scene_switches: Vec<String>,
    /// Requested state switches, in order
    pub state_switches: Vec<String>,
    /// Ids of spawned actors
    pub spawned: Vec<String>,
    /// Ids of destroyed actors
    pub destroyed: Vec<String>,
}

/// Headless player for one scene
pub struct Player {
    state: PlayState,
    interpreter: Interpreter,
    host: PlayerHost,
    pointer: SharedPointer,
    /// Actors as synthesized, used to restore on stop and to spawn copies
    templates: IndexMap<String, Actor>,
    config: InterpreterConfig,
    initial_pointer: PointerState,
    script: Vec<ScheduledEvent>,
    fixed_timestep: f64,
    time_scale: f64,
    frame_count: u64,
    elapsed_time: f64,
    spawn_counter: usize,
    log: PlayLog,
}

impl Player {
    /// Build a player for `scene`. Settings are validated first, since a
    /// non-positive timestep cannot drive a frame clock.
    pub fn new(settings: &PlayerSettings, scene: &SceneConfig) -> Result<Self, PlayerError> {
        settings.validate()?;
        let templates = Synthesizer::from_scene(scene)
            .into_actors()
            .into_iter()
            .map(|actor| (actor.id.clone(), actor))
            .collect();

        let host = PlayerHost::new();
        let pointer = SharedPointer::new(settings.pointer);
        let interpreter =
            Interpreter::with_config(host.services(&pointer), settings.interpreter.clone());

        let mut player = Self {
            state: PlayState::Stopped,
            interpreter,
            host,
            pointer,
            templates,
            config: settings.interpreter.clone(),
            initial_pointer: settings.pointer,
            script: settings.events.clone(),
            fixed_timestep: settings.fixed_timestep,
            time_scale: settings.time_scale.clamp(0.0, MAX_TIME_SCALE),
            frame_count: 0,
            elapsed_time: 0.0,
            spawn_counter: 0,
            log: PlayLog::default(),
        };
        player.register_templates();
        Ok(player)
    }

    /// Load the scene named by the settings and build a player for it
    pub fn from_settings(settings: &PlayerSettings) -> Result<Self, PlayerError> {
        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(PlayerError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }
        let scene = SceneConfig::load(&settings.scene)?;
        Self::new(settings, &scene)
    }

    fn register_templates(&mut self) {
        for actor in self.templates.values() {
            self.host.track_entity(&actor.id);
            self.interpreter.register_actor(actor.clone());
        }
    }

    /// Current play state
    pub fn state(&self) -> PlayState {
        self.state
    }

    /// Frames run since play started
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Scaled seconds elapsed since play started
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    /// Simulation speed
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Set time scale (clamped to a reasonable range)
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale.clamp(0.0, MAX_TIME_SCALE);
    }

    /// The running interpreter
    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// The running interpreter, for live edits
    pub fn interpreter_mut(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    /// Host request queue and entity table
    pub fn host(&self) -> &PlayerHost {
        &self.host
    }

    /// Pointer fed to `GetInput`
    pub fn pointer(&self) -> &SharedPointer {
        &self.pointer
    }

    /// Requests serviced so far
    pub fn log(&self) -> &PlayLog {
        &self.log
    }

    /// Start or resume play. Starting fires `OnStart` on every actor.
    /// Returns false if already playing.
    pub fn play(&mut self) -> bool {
        match self.state {
            PlayState::Stopped => {
                self.state = PlayState::Playing;
                self.frame_count = 0;
                self.elapsed_time = 0.0;
                tracing::info!(actors = self.templates.len(), "Started play");

                let ids: Vec<String> = self.interpreter.actor_ids().map(String::from).collect();
                let event = EventData::none();
                for id in &ids {
                    self.interpreter
                        .trigger_event(id, EventKind::OnStart.as_str(), &event);
                }
                self.service_requests();
                true
            }
            PlayState::Paused => {
                self.state = PlayState::Playing;
                tracing::info!("Resumed play");
                true
            }
            PlayState::Playing => false,
        }
    }

    /// Pause play
    pub fn pause(&mut self) -> bool {
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
            tracing::info!("Paused play");
            true
        } else {
            false
        }
    }

    /// Toggle pause/resume
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            PlayState::Playing => self.pause(),
            PlayState::Paused => self.play(),
            PlayState::Stopped => false,
        }
    }

    /// Stop play and restore every actor to its synthesized state
    pub fn stop(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }

        self.state = PlayState::Stopped;
        self.frame_count = 0;
        self.elapsed_time = 0.0;
        self.spawn_counter = 0;
        self.log = PlayLog::default();

        self.host.clear();
        self.pointer.set(self.initial_pointer);
        self.interpreter =
            Interpreter::with_config(self.host.services(&self.pointer), self.config.clone());
        self.register_templates();

        tracing::info!("Stopped play");
        true
    }

    /// Run one frame if playing
    pub fn update(&mut self) -> bool {
        if self.state != PlayState::Playing {
            return false;
        }
        self.advance();
        true
    }

    /// Step forward one frame (while paused)
    pub fn step_frame(&mut self) -> bool {
        if self.state != PlayState::Paused {
            return false;
        }
        self.advance();
        true
    }

    /// Play `frames` frames back to back
    pub fn run(&mut self, frames: u64) {
        self.play();
        for _ in 0..frames {
            if !self.update() {
                break;
            }
        }
    }

    /// Play in real time, applying hot reloads before every frame. Zero
    /// `frames` runs until the process is interrupted.
    pub fn run_watched(&mut self, frames: u64, reloader: &mut HotReloader) {
        let frame_time = Duration::from_secs_f64(self.fixed_timestep);
        self.play();
        while frames == 0 || self.frame_count < frames {
            reloader.poll(&mut self.interpreter);
            if !self.update() {
                break;
            }
            std::thread::sleep(frame_time);
        }
    }

    fn advance(&mut self) {
        let frame = self.frame_count;
        let delta = self.fixed_timestep * self.time_scale;

        let (input, events): (Vec<ScriptedEvent>, Vec<ScriptedEvent>) = self
            .script
            .iter()
            .filter(|scheduled| scheduled.frame == frame)
            .map(|scheduled| scheduled.event.clone())
            .partition(|event| matches!(event, ScriptedEvent::Pointer { .. }));

        for event in input {
            self.dispatch(event);
        }
        self.interpreter.update(delta);
        for event in events {
            self.dispatch(event);
        }
        self.service_requests();

        self.frame_count += 1;
        self.elapsed_time += delta;
        tracing::debug!(frame, elapsed = self.elapsed_time, "Frame finished");
    }

    fn dispatch(&mut self, event: ScriptedEvent) {
        tracing::debug!(frame = self.frame_count, ?event, "Scripted event");
        match event {
            ScriptedEvent::Pointer { x, y, pressed } => {
                self.pointer.set(PointerState { x, y, pressed });
            }
            ScriptedEvent::Collision { a, b } => {
                self.interpreter.process_collision(&a, &b);
            }
            ScriptedEvent::Click { actor } => {
                self.interpreter
                    .trigger_event(&actor, EventKind::OnClick.as_str(), &EventData::none());
            }
            ScriptedEvent::Custom {
                actor,
                event,
                value,
            } => {
                let data = EventData {
                    value,
                    ..EventData::none()
                };
                self.interpreter.trigger_event(&actor, &event, &data);
            }
        }
    }

    /// Act on everything walks asked the host for since the last call
    fn service_requests(&mut self) {
        for request in self.host.drain() {
            match request {
                HostRequest::Beep {
                    frequency,
                    duration,
                    waveform,
                } => {
                    tracing::debug!(frequency, duration, %waveform, "Beep");
                    self.log.beeps += 1;
                }
                HostRequest::SwitchScene(scene) => {
                    tracing::info!(%scene, "Scene switch requested");
                    self.log.scene_switches.push(scene);
                }
                HostRequest::SwitchState(state) => {
                    tracing::info!(%state, "State switch requested");
                    self.log.state_switches.push(state);
                }
                HostRequest::Spawn { template, x, y } => self.spawn(&template, x, y),
                HostRequest::Destroy(actor_id) => {
                    if self.interpreter.unregister_actor(&actor_id) {
                        self.host.forget_entity(&actor_id);
                        self.log.destroyed.push(actor_id);
                    } else {
                        tracing::warn!(actor = %actor_id, "Destroy requested for unknown actor");
                    }
                }
            }
        }
    }

    /// Register a copy of a template actor at a position
    fn spawn(&mut self, template: &str, x: f64, y: f64) {
        let Some(source) = self.templates.get(template) else {
            tracing::warn!(template, "Spawn requested for unknown template");
            return;
        };

        let mut actor = source.clone();
        let id = loop {
            self.spawn_counter += 1;
            let candidate = format!("{template}_{}", self.spawn_counter);
            if !self.interpreter.is_registered(&candidate) {
                break candidate;
            }
        };
        actor.id.clone_from(&id);

        self.interpreter.register_actor(actor);
        self.interpreter.set_variable(&id, "positionX", Value::Number(x));
        self.interpreter.set_variable(&id, "positionY", Value::Number(y));
        self.host.track_entity(&id);
        tracing::info!(actor = %id, template, x, y, "Spawned actor");
        self.log.spawned.push(id);
    }
}
