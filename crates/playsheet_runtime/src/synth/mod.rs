// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph synthesizer: turns raw scene data into scriptable actors.
//!
//! Each distinct entity id becomes one [`Actor`] with an inferred category,
//! a default variable set and a starter graph for that category. The
//! synthesized actors stay editable through [`SheetEditor`] until they are
//! handed to the interpreter.

mod category;
mod defaults;
mod scene;
mod templates;

pub use category::infer_category;
pub use defaults::{default_variables, merge_custom, VariableMap};
pub use scene::{ClickAction, EntityData, SceneConfig, SceneError, SceneState};
pub use templates::{default_graph, NodeIds};

use crate::actor::Actor;
use crate::commands::{EditError, SheetEditor};
use crate::export::{ActorSummary, LogicSheetView};
use indexmap::IndexMap;
use playsheet_graph::LogicSheet;
use std::collections::HashSet;

/// Build one actor from an entity
pub fn synthesize_entity(entity: &EntityData, layer: &str, ids: &mut NodeIds) -> Actor {
    let category = infer_category(&entity.id, layer, &entity.entity_type);
    let mut variables = default_variables(entity);
    let logic_sheet = default_graph(category, entity, &mut variables, ids);
    merge_custom(&mut variables, entity);

    Actor {
        id: entity.id.clone(),
        category,
        entity_type: entity.entity_type.clone(),
        layer: layer.to_string(),
        sprite_ref: entity.sprite.clone(),
        variables,
        logic_sheet,
    }
}

/// Walk every state and layer in order and build one actor per distinct
/// entity id. The first occurrence of an id wins.
pub fn extract_actors(scene: &SceneConfig) -> Vec<Actor> {
    let mut ids = NodeIds::default();
    let mut seen = HashSet::new();
    let mut actors = Vec::new();

    for (layer, entity) in scene.entities() {
        if !seen.insert(entity.id.as_str()) {
            tracing::debug!(entity = %entity.id, layer, "Skipping repeated entity");
            continue;
        }
        actors.push(synthesize_entity(entity, layer, &mut ids));
    }

    tracing::info!(
        scene = scene.name.as_deref().unwrap_or("<unnamed>"),
        actors = actors.len(),
        "Extracted actors"
    );
    actors
}

/// Editor-side actor set produced from a scene
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    actors: IndexMap<String, Actor>,
}

impl Synthesizer {
    /// Extract every actor of a scene
    pub fn from_scene(scene: &SceneConfig) -> Self {
        Self {
            actors: extract_actors(scene)
                .into_iter()
                .map(|actor| (actor.id.clone(), actor))
                .collect(),
        }
    }

    /// Actors in extraction order
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    /// One actor
    pub fn actor(&self, actor_id: &str) -> Option<&Actor> {
        self.actors.get(actor_id)
    }

    /// Number of actors
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Whether the scene produced no actors
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Hand the actors over, in extraction order
    pub fn into_actors(self) -> Vec<Actor> {
        self.actors.into_values().collect()
    }

    /// Actor list with counts
    pub fn export_actor_list(&self) -> Vec<ActorSummary> {
        self.actors.values().map(ActorSummary::from).collect()
    }

    /// Full graph of one actor
    pub fn export_logic_sheet(&self, actor_id: &str) -> Option<LogicSheetView> {
        self.actor(actor_id).map(LogicSheetView::from)
    }
}

impl SheetEditor for Synthesizer {
    fn sheet_mut(&mut self, actor_id: &str) -> Result<&mut LogicSheet, EditError> {
        self.actors
            .get_mut(actor_id)
            .map(|actor| &mut actor.logic_sheet)
            .ok_or_else(|| EditError::UnknownActor(actor_id.to_string()))
    }
}
