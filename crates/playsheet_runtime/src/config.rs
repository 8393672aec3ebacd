// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interpreter configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default limit on nested nodes in one walk
pub const DEFAULT_MAX_WALK_DEPTH: usize = 256;
/// Default limit on node evaluations in one walk
pub const DEFAULT_MAX_WALK_STEPS: usize = 10_000;
/// Hard ceiling on walk depth. Walks recurse once per nested node, so this
/// bounds stack use whatever the configured depth says.
pub const MAX_WALK_DEPTH_LIMIT: usize = 512;

/// Error loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid RON for this type
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// Serialization failed
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    /// Values are out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Limits that keep a walk over a malformed sheet from running away.
///
/// Cycles are legal in a sheet, so every walk carries a depth and a step
/// budget. Exhausting either aborts the rest of that walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Maximum nesting of node executions
    pub max_walk_depth: usize,
    /// Maximum node evaluations per walk
    pub max_walk_steps: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_walk_depth: DEFAULT_MAX_WALK_DEPTH,
            max_walk_steps: DEFAULT_MAX_WALK_STEPS,
        }
    }
}

impl InterpreterConfig {
    /// Reject limits that would stop every walk before its event node runs,
    /// or a depth past [`MAX_WALK_DEPTH_LIMIT`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_walk_depth == 0 {
            return Err(ConfigError::Invalid("max_walk_depth must be at least 1".into()));
        }
        if self.max_walk_depth > MAX_WALK_DEPTH_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_walk_depth must be at most {MAX_WALK_DEPTH_LIMIT}, got {}",
                self.max_walk_depth
            )));
        }
        if self.max_walk_steps == 0 {
            return Err(ConfigError::Invalid("max_walk_steps must be at least 1".into()));
        }
        Ok(())
    }

    /// Parse from RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    /// Save as pretty RON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let pretty = ron::ser::PrettyConfig::default().struct_names(true);
        let text = ron::ser::to_string_pretty(self, pretty)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
