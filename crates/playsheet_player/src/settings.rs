// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player settings.
//!
//! A settings file names the scene to run and describes the run:
//! - Frame count, fixed timestep and time scale
//! - Initial pointer position
//! - Events to inject on given frames
//! - Interpreter limits
//! - An optional directory to watch for sheet edits

use crate::error::PlayerError;
use playsheet_graph::Value;
use playsheet_runtime::{InterpreterConfig, PointerState};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Log filter used when neither `RUST_LOG` nor the settings name one
pub const DEFAULT_LOG_FILTER: &str = "playsheet=info";

/// Upper bound on the time scale
const MAX_TIME_SCALE: f64 = 10.0;

/// An event injected into the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScriptedEvent {
    /// Move the pointer
    Pointer {
        /// X
        x: f64,
        /// Y
        y: f64,
        /// Button or touch is down
        #[serde(default)]
        pressed: bool,
    },
    /// Two actors touch
    Collision {
        /// First participant
        a: String,
        /// Second participant
        b: String,
    },
    /// An actor is clicked
    Click {
        /// Clicked actor
        actor: String,
    },
    /// A named event on one actor
    Custom {
        /// Target actor
        actor: String,
        /// Event name, matched against event node subtypes
        event: String,
        /// Payload
        #[serde(default)]
        value: Option<Value>,
    },
}

/// An event and the frame it fires on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// Zero-based frame number
    pub frame: u64,
    /// What happens
    pub event: ScriptedEvent,
}

impl ScheduledEvent {
    /// Schedule an event
    pub fn at(frame: u64, event: ScriptedEvent) -> Self {
        Self { frame, event }
    }
}

/// Settings for one player run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Settings format version
    pub version: u32,
    /// Scene file, JSON or RON
    pub scene: PathBuf,
    /// Frames to run. Zero runs until interrupted when watching.
    pub frames: u64,
    /// Seconds per frame before scaling
    pub fixed_timestep: f64,
    /// Simulation speed (1.0 = normal)
    pub time_scale: f64,
    /// Pointer state before any scripted move
    pub pointer: PointerState,
    /// Directory watched for sheet files and edit scripts
    pub watch_dir: Option<PathBuf>,
    /// Injected events
    pub events: Vec<ScheduledEvent>,
    /// Walk limits
    pub interpreter: InterpreterConfig,
    /// `tracing` filter directives
    pub log_filter: Option<String>,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            scene: PathBuf::from("scene.json"),
            frames: 60,
            fixed_timestep: 1.0 / 60.0,
            time_scale: 1.0,
            pointer: PointerState::default(),
            watch_dir: None,
            events: Vec::new(),
            interpreter: InterpreterConfig::default(),
            log_filter: None,
        }
    }
}

impl PlayerSettings {
    /// Parse settings from RON text
    pub fn from_ron(text: &str) -> Result<Self, PlayerError> {
        let settings: Self = ron::from_str(text)?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(PlayerError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file. Relative paths inside are resolved
    /// against the file's directory.
    pub fn load(path: &Path) -> Result<Self, PlayerError> {
        let content = std::fs::read_to_string(path)?;
        let mut settings = Self::from_ron(&content)?;
        if let Some(base) = path.parent() {
            settings.resolve_paths(base);
        }
        Ok(settings)
    }

    /// Save settings as pretty RON
    pub fn save(&self, path: &Path) -> Result<(), PlayerError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), PlayerError> {
        if !self.fixed_timestep.is_finite() || self.fixed_timestep <= 0.0 {
            return Err(PlayerError::Invalid(format!(
                "fixed_timestep must be positive, got {}",
                self.fixed_timestep
            )));
        }
        if !(0.0..=MAX_TIME_SCALE).contains(&self.time_scale) {
            return Err(PlayerError::Invalid(format!(
                "time_scale must be within 0..={MAX_TIME_SCALE}, got {}",
                self.time_scale
            )));
        }
        self.interpreter.validate()?;
        Ok(())
    }

    /// Make the scene and watch paths absolute relative to `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.scene.is_relative() {
            self.scene = base.join(&self.scene);
        }
        if let Some(dir) = self.watch_dir.as_mut().filter(|dir| dir.is_relative()) {
            *dir = base.join(&*dir);
        }
    }

    /// Scaled seconds per frame
    pub fn frame_delta(&self) -> f64 {
        self.fixed_timestep * self.time_scale
    }
}
