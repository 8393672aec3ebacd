// SPDX-License-Identifier: MIT OR Apache-2.0
//! Actor records: one per distinct scene entity.

use crate::variables::VariableDefinition;
use indexmap::IndexMap;
use playsheet_graph::LogicSheet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavioral category, which picks the starter graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorCategory {
    /// Moving projectile
    Ball,
    /// Player-controlled paddle
    Paddle,
    /// Opponent
    Enemy,
    /// Collectible
    Powerup,
    /// Score display
    UiScore,
    /// Background art
    Background,
    /// Clickable button
    UiButton,
    /// Text label
    UiText,
    /// Plain shape
    Shape,
    /// Anything else
    Sprite,
}

impl ActorCategory {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ball => "ball",
            Self::Paddle => "paddle",
            Self::Enemy => "enemy",
            Self::Powerup => "powerup",
            Self::UiScore => "ui_score",
            Self::Background => "background",
            Self::UiButton => "ui_button",
            Self::UiText => "ui_text",
            Self::Shape => "shape",
            Self::Sprite => "sprite",
        }
    }
}

impl fmt::Display for ActorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scriptable actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    /// Entity id, also the key of the actor's variable definitions
    pub id: String,
    /// Inferred category
    pub category: ActorCategory,
    /// Raw entity type from the scene
    pub entity_type: String,
    /// Layer the entity was first found on
    pub layer: String,
    /// Sprite asset, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite_ref: Option<String>,
    /// Variable definitions keyed by name
    #[serde(default)]
    pub variables: IndexMap<String, VariableDefinition>,
    /// Behavior graph
    #[serde(default)]
    pub logic_sheet: LogicSheet,
}

impl Actor {
    /// Variable definitions with their names filled in from the map keys
    pub fn variable_definitions(&self) -> impl Iterator<Item = VariableDefinition> + '_ {
        self.variables.iter().map(|(name, def)| VariableDefinition {
            name: name.clone(),
            ..def.clone()
        })
    }
}
