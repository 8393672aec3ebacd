// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player errors.

use playsheet_runtime::synth::SceneError;
use playsheet_runtime::ConfigError;
use thiserror::Error;

/// Error starting or running the player
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid RON
    #[error("Settings parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be serialized
    #[error("Settings serialize error: {0}")]
    Serialize(#[from] ron::Error),

    /// Settings were written by a newer player
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },

    /// Settings values are out of range
    #[error("Invalid settings: {0}")]
    Invalid(String),

    /// Interpreter limits are out of range
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Scene file could not be loaded
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Watch directory could not be watched
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}
