// SPDX-License-Identifier: MIT OR Apache-2.0
//! Read-only views of actors for the editor.

use crate::actor::{Actor, ActorCategory};
use playsheet_graph::{Connection, Node};
use serde::Serialize;

/// One row of the actor list: identity plus counts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorSummary {
    /// Actor id
    pub id: String,
    /// Category
    pub category: ActorCategory,
    /// Raw entity type
    pub entity_type: String,
    /// Layer
    pub layer: String,
    /// Sprite asset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite_ref: Option<String>,
    /// Number of variable definitions
    pub variable_count: usize,
    /// Number of nodes
    pub node_count: usize,
    /// Number of connections
    pub connection_count: usize,
}

impl From<&Actor> for ActorSummary {
    fn from(actor: &Actor) -> Self {
        Self {
            id: actor.id.clone(),
            category: actor.category,
            entity_type: actor.entity_type.clone(),
            layer: actor.layer.clone(),
            sprite_ref: actor.sprite_ref.clone(),
            variable_count: actor.variables.len(),
            node_count: actor.logic_sheet.node_count(),
            connection_count: actor.logic_sheet.connection_count(),
        }
    }
}

/// Full graph of one actor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicSheetView {
    /// Actor id
    pub actor_id: String,
    /// Category
    pub category: ActorCategory,
    /// Nodes in sheet order
    pub nodes: Vec<Node>,
    /// Connections in declaration order
    pub connections: Vec<Connection>,
}

impl From<&Actor> for LogicSheetView {
    fn from(actor: &Actor) -> Self {
        Self {
            actor_id: actor.id.clone(),
            category: actor.category,
            nodes: actor.logic_sheet.nodes().cloned().collect(),
            connections: actor.logic_sheet.connections().cloned().collect(),
        }
    }
}

impl LogicSheetView {
    /// JSON value for the editor
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Summaries for a list of actors, as a JSON array
pub fn actor_list_json<'a>(
    actors: impl IntoIterator<Item = &'a Actor>,
) -> Result<serde_json::Value, serde_json::Error> {
    let summaries: Vec<ActorSummary> = actors.into_iter().map(ActorSummary::from).collect();
    serde_json::to_value(summaries)
}
