// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless player for Playsheet scenes.
//!
//! The `playsheet` binary is a thin shell over this library: settings in,
//! a [`Player`] stepping frames, and a [`HotReloader`] feeding sheet edits
//! into the running interpreter.

pub mod error;
pub mod file_watcher;
pub mod host;
pub mod hot_reload;
pub mod player;
pub mod settings;

pub use error::PlayerError;
pub use host::{HostRequest, PlayerHost};
pub use hot_reload::{reload_path, HotReloader, ReloadOutcome, ReloadTarget};
pub use player::{PlayLog, PlayState, Player};
pub use settings::{PlayerSettings, ScheduledEvent, ScriptedEvent};
