// SPDX-License-Identifier: MIT OR Apache-2.0
//! Raw scene data, as exported by the scene editor.

use crate::variables::VariableDefinition;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error loading a scene
#[derive(Debug, Error)]
pub enum SceneError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid JSON
    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Invalid RON
    #[error("Invalid scene RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A scene: named states, each with named layers of entities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Scene name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// States in declaration order
    #[serde(default)]
    pub states: IndexMap<String, SceneState>,
}

/// One state of a scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneState {
    /// Layers in declaration order
    #[serde(default)]
    pub layers: IndexMap<String, Vec<EntityData>>,
}

/// What a button does when clicked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickAction {
    /// `switchScene`, `switchState`, `playSound`, or anything else
    pub action: String,
    /// Scene, state or sound the action refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// One entity placed in a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityData {
    /// Entity id, unique across the scene
    pub id: String,
    /// Entity type (`sprite`, `text`, `button`, `shape`, ...)
    #[serde(rename = "type")]
    pub entity_type: String,
    /// X position
    #[serde(default)]
    pub x: f64,
    /// Y position
    #[serde(default)]
    pub y: f64,
    /// Width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Sprite asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Font size for text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Button label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Click behavior for buttons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_click: Option<ClickAction>,
    /// Fill or tint color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Designer-declared variables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<IndexMap<String, VariableDefinition>>,
}

impl EntityData {
    /// Minimal entity at a position
    pub fn new(id: impl Into<String>, entity_type: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            entity_type: entity_type.into(),
            x,
            y,
            width: None,
            height: None,
            sprite: None,
            content: None,
            font_size: None,
            text: None,
            on_click: None,
            color: None,
            variables: None,
        }
    }
}

impl SceneConfig {
    /// Parse scene JSON
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a scene file. `.ron` files are RON, anything else JSON.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path)?;
        let is_ron = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ron"));
        let scene = if is_ron {
            ron::from_str(&text)?
        } else {
            Self::from_json(&text)?
        };
        Ok(scene)
    }

    /// Every entity with its layer, in declaration order, duplicates included
    pub fn entities(&self) -> impl Iterator<Item = (&str, &EntityData)> {
        self.states.values().flat_map(|state| {
            state
                .layers
                .iter()
                .flat_map(|(layer, entities)| entities.iter().map(move |e| (layer.as_str(), e)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PONG: &str = r#"{
        "name": "pong",
        "states": {
            "play": {
                "layers": {
                    "BG_FAR": [{ "id": "stars", "type": "sprite", "x": 0, "y": 0, "sprite": "stars.png" }],
                    "SPRITES": [
                        { "id": "ball", "type": "sprite", "x": 160, "y": 120, "width": 8, "height": 8 },
                        { "id": "player_paddle", "type": "sprite", "x": 10, "y": 100 }
                    ]
                }
            },
            "menu": {
                "layers": {
                    "UI_BUTTONS": [{
                        "id": "start", "type": "button", "x": 100, "y": 80, "text": "Start",
                        "onClick": { "action": "switchState", "target": "play" }
                    }]
                }
            }
        }
    }"#;

    #[test]
    fn test_parse_scene_json() {
        let scene = SceneConfig::from_json(PONG).unwrap();
        assert_eq!(scene.name.as_deref(), Some("pong"));

        let order: Vec<_> = scene.entities().map(|(layer, e)| (layer, e.id.as_str())).collect();
        assert_eq!(
            order,
            [
                ("BG_FAR", "stars"),
                ("SPRITES", "ball"),
                ("SPRITES", "player_paddle"),
                ("UI_BUTTONS", "start"),
            ]
        );

        let (_, start) = scene.entities().last().unwrap();
        assert_eq!(start.on_click.as_ref().unwrap().target.as_deref(), Some("play"));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("pong.json");
        std::fs::write(&json_path, PONG).unwrap();
        let scene = SceneConfig::load(&json_path).unwrap();

        let ron_path = dir.path().join("pong.ron");
        std::fs::write(&ron_path, ron::to_string(&scene).unwrap()).unwrap();
        assert_eq!(SceneConfig::load(&ron_path).unwrap(), scene);

        assert!(matches!(
            SceneConfig::load(&dir.path().join("missing.json")),
            Err(SceneError::Io(_))
        ));
    }
}
