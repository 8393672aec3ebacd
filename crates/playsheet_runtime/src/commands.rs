// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor-side sheet edits.
//!
//! The interpreter (live graphs) and the synthesizer (editor-side actors) both
//! own logic sheets keyed by actor id. [`SheetEditor`] gives them one edit
//! surface, and [`SheetCommand`] is that surface as serializable data so
//! edits can arrive from files or a socket.

use playsheet_graph::{Connection, ConnectionId, LogicSheet, Node, NodeId, Properties, SheetError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error from an editor-facing mutation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    /// No actor with this id
    #[error("Unknown actor: {0}")]
    UnknownActor(String),
    /// The sheet rejected the edit
    #[error(transparent)]
    Sheet(#[from] SheetError),
}

/// Edit operations over per-actor logic sheets.
///
/// Implementors only provide sheet lookup; every edit is defined on top of it.
pub trait SheetEditor {
    /// Mutable access to an actor's sheet
    fn sheet_mut(&mut self, actor_id: &str) -> Result<&mut LogicSheet, EditError>;

    /// Replace an actor's whole sheet
    fn update_logic_sheet(&mut self, actor_id: &str, sheet: LogicSheet) -> Result<(), EditError> {
        let slot = self.sheet_mut(actor_id)?;
        if let Some(node) = sheet.find_execution_cycle() {
            tracing::warn!(actor_id, node = %node, "Replacement sheet has an execution cycle");
        }
        tracing::info!(
            actor_id,
            nodes = sheet.node_count(),
            connections = sheet.connection_count(),
            "Replaced logic sheet"
        );
        *slot = sheet;
        Ok(())
    }

    /// Add a node, returning its id
    fn add_node(&mut self, actor_id: &str, node: Node) -> Result<NodeId, EditError> {
        let id = self.sheet_mut(actor_id)?.add_node(node)?;
        tracing::debug!(actor_id, node = %id, "Added node");
        Ok(id)
    }

    /// Remove a node and every connection touching it
    fn remove_node(&mut self, actor_id: &str, node_id: &str) -> Result<Node, EditError> {
        let node = self
            .sheet_mut(actor_id)?
            .remove_node(node_id)
            .ok_or_else(|| SheetError::NodeNotFound(NodeId::from(node_id)))?;
        tracing::debug!(actor_id, node_id, "Removed node");
        Ok(node)
    }

    /// Add a validated connection
    fn add_connection(
        &mut self,
        actor_id: &str,
        connection: Connection,
    ) -> Result<ConnectionId, EditError> {
        let id = self.sheet_mut(actor_id)?.connect(connection)?;
        tracing::debug!(actor_id, connection = %id, "Added connection");
        Ok(id)
    }

    /// Remove a connection
    fn remove_connection(
        &mut self,
        actor_id: &str,
        connection_id: &str,
    ) -> Result<Connection, EditError> {
        let connection = self
            .sheet_mut(actor_id)?
            .disconnect(connection_id)
            .ok_or_else(|| SheetError::ConnectionNotFound(ConnectionId::new(connection_id)))?;
        tracing::debug!(actor_id, connection_id, "Removed connection");
        Ok(connection)
    }

    /// Shallow-merge properties into a node
    fn update_node_properties(
        &mut self,
        actor_id: &str,
        node_id: &str,
        properties: Properties,
    ) -> Result<(), EditError> {
        self.sheet_mut(actor_id)?
            .update_node_properties(node_id, properties)?;
        Ok(())
    }
}

/// One edit, as data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SheetCommand {
    /// Replace the whole sheet
    ReplaceSheet {
        /// Target actor
        actor_id: String,
        /// New sheet
        sheet: LogicSheet,
    },
    /// Add a node
    AddNode {
        /// Target actor
        actor_id: String,
        /// Node to add
        node: Node,
    },
    /// Remove a node
    RemoveNode {
        /// Target actor
        actor_id: String,
        /// Node to remove
        node_id: String,
    },
    /// Add a connection
    AddConnection {
        /// Target actor
        actor_id: String,
        /// Connection to add
        connection: Connection,
    },
    /// Remove a connection
    RemoveConnection {
        /// Target actor
        actor_id: String,
        /// Connection to remove
        connection_id: String,
    },
    /// Merge node properties
    UpdateNodeProperties {
        /// Target actor
        actor_id: String,
        /// Node to update
        node_id: String,
        /// Properties to merge
        properties: Properties,
    },
}

impl SheetCommand {
    /// Actor this command targets
    pub fn actor_id(&self) -> &str {
        match self {
            Self::ReplaceSheet { actor_id, .. }
            | Self::AddNode { actor_id, .. }
            | Self::RemoveNode { actor_id, .. }
            | Self::AddConnection { actor_id, .. }
            | Self::RemoveConnection { actor_id, .. }
            | Self::UpdateNodeProperties { actor_id, .. } => actor_id,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReplaceSheet { .. } => "replaceSheet",
            Self::AddNode { .. } => "addNode",
            Self::RemoveNode { .. } => "removeNode",
            Self::AddConnection { .. } => "addConnection",
            Self::RemoveConnection { .. } => "removeConnection",
            Self::UpdateNodeProperties { .. } => "updateNodeProperties",
        }
    }

    /// Apply this command to an editor
    pub fn apply(self, editor: &mut impl SheetEditor) -> Result<(), EditError> {
        match self {
            Self::ReplaceSheet { actor_id, sheet } => editor.update_logic_sheet(&actor_id, sheet),
            Self::AddNode { actor_id, node } => editor.add_node(&actor_id, node).map(|_| ()),
            Self::RemoveNode { actor_id, node_id } => {
                editor.remove_node(&actor_id, &node_id).map(|_| ())
            }
            Self::AddConnection {
                actor_id,
                connection,
            } => editor.add_connection(&actor_id, connection).map(|_| ()),
            Self::RemoveConnection {
                actor_id,
                connection_id,
            } => editor
                .remove_connection(&actor_id, &connection_id)
                .map(|_| ()),
            Self::UpdateNodeProperties {
                actor_id,
                node_id,
                properties,
            } => editor.update_node_properties(&actor_id, &node_id, properties),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use playsheet_graph::{ActionKind, EventKind, NodeKind};

    #[derive(Default)]
    struct Sheets(IndexMap<String, LogicSheet>);

    impl SheetEditor for Sheets {
        fn sheet_mut(&mut self, actor_id: &str) -> Result<&mut LogicSheet, EditError> {
            self.0
                .get_mut(actor_id)
                .ok_or_else(|| EditError::UnknownActor(actor_id.to_string()))
        }
    }

    fn editor() -> Sheets {
        let mut sheet = LogicSheet::new();
        sheet
            .add_node(Node::new("start", NodeKind::Event(EventKind::OnStart)))
            .unwrap();
        let mut sheets = Sheets::default();
        sheets.0.insert("hero".into(), sheet);
        sheets
    }

    #[test]
    fn test_commands_from_json() {
        let json = r#"[
            { "command": "addNode", "actorId": "hero",
              "node": { "id": "beep", "type": "Action", "subtype": "PlaySound",
                        "inputs": [{ "id": "exec", "kind": "Execution" }],
                        "outputs": [{ "id": "exec", "kind": "Execution" }] } },
            { "command": "addConnection", "actorId": "hero",
              "connection": { "from": { "nodeId": "start", "outputId": "exec" },
                              "to": { "nodeId": "beep", "inputId": "exec" } } },
            { "command": "updateNodeProperties", "actorId": "hero", "nodeId": "beep",
              "properties": { "frequency": 660 } }
        ]"#;
        let commands: Vec<SheetCommand> = serde_json::from_str(json).unwrap();
        assert_eq!(commands[1].name(), "addConnection");

        let mut sheets = editor();
        for command in commands {
            command.apply(&mut sheets).unwrap();
        }
        let sheet = &sheets.0["hero"];
        assert_eq!(sheet.connection_count(), 1);
        assert_eq!(sheet.connection("conn_0").unwrap().to.node_id.as_str(), "beep");
        assert_eq!(sheet.node("beep").unwrap().property_f64("frequency"), Some(660.0));
    }

    #[test]
    fn test_command_json_round_trip() {
        let command = SheetCommand::RemoveConnection {
            actor_id: "hero".into(),
            connection_id: "conn_4".into(),
        };
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["command"], "removeConnection");
        assert_eq!(json["connectionId"], "conn_4");
        let back: SheetCommand = serde_json::from_value(json).unwrap();
        assert_eq!(back, command);
    }

    #[test]
    fn test_unknown_actor_and_missing_targets() {
        let mut sheets = editor();
        assert_eq!(
            sheets.remove_node("ghost", "start"),
            Err(EditError::UnknownActor("ghost".into()))
        );
        assert_eq!(
            sheets.remove_node("hero", "nope").unwrap_err(),
            EditError::Sheet(SheetError::NodeNotFound(NodeId::from("nope")))
        );
        assert!(matches!(
            sheets.remove_connection("hero", "conn_9"),
            Err(EditError::Sheet(SheetError::ConnectionNotFound(_)))
        ));
    }

    #[test]
    fn test_replace_sheet_keeps_old_on_unknown_actor() {
        let mut sheets = editor();
        let replacement = LogicSheet::from_parts(
            vec![Node::new("x", NodeKind::Action(ActionKind::Custom))],
            vec![],
        )
        .unwrap();
        assert!(sheets.update_logic_sheet("ghost", replacement.clone()).is_err());
        assert!(sheets.0["hero"].node("start").is_some());

        // A cyclic sheet for an unknown actor fails on the lookup alone
        let mut cyclic = LogicSheet::from_parts(
            vec![
                Node::new("a", NodeKind::Action(ActionKind::Custom)),
                Node::new("b", NodeKind::Action(ActionKind::Custom)),
            ],
            vec![],
        )
        .unwrap();
        cyclic.connect_ports("a", "exec", "b", "exec").unwrap();
        cyclic.connect_ports("b", "exec", "a", "exec").unwrap();
        assert!(cyclic.find_execution_cycle().is_some());
        assert_eq!(
            sheets.update_logic_sheet("ghost", cyclic),
            Err(EditError::UnknownActor("ghost".into()))
        );

        sheets.update_logic_sheet("hero", replacement).unwrap();
        assert!(sheets.0["hero"].node("start").is_none());
    }
}
