// SPDX-License-Identifier: MIT OR Apache-2.0
//! Logic sheet: the nodes and connections that define one actor's behavior.

use crate::connection::{Connection, ConnectionId};
use crate::node::{Node, NodeId, Properties};
use crate::port::PortKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A logic sheet.
///
/// Nodes live in an insertion-ordered arena keyed by id, so every node also
/// has a dense index (`node_index`) that walks use instead of string lookups.
/// Connections are kept in declaration order, which decides which edge wins
/// when several feed the same input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SheetRecord", into = "SheetRecord")]
pub struct LogicSheet {
    nodes: IndexMap<NodeId, Node>,
    connections: Vec<Connection>,
}

impl LogicSheet {
    /// Create a new empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sheet from node and connection lists.
    ///
    /// Connections are taken as-is; ones whose endpoints are missing are
    /// tolerated here and skipped by the interpreter.
    pub fn from_parts(nodes: Vec<Node>, connections: Vec<Connection>) -> Result<Self, SheetError> {
        let mut sheet = Self::new();
        for node in nodes {
            sheet.add_node(node)?;
        }
        sheet.connections = connections;
        Ok(sheet)
    }

    /// Add a node to the sheet. A node with an empty id gets a fresh one.
    pub fn add_node(&mut self, mut node: Node) -> Result<NodeId, SheetError> {
        if node.id.is_empty() {
            node.id = NodeId::generate();
        }
        if self.nodes.contains_key(&node.id) {
            return Err(SheetError::DuplicateNode(node.id));
        }
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        Ok(id)
    }

    /// Remove a node and every connection that references it
    pub fn remove_node(&mut self, node_id: &str) -> Option<Node> {
        let node = self.nodes.shift_remove(node_id)?;
        self.connections.retain(|c| !c.involves_node(node_id));
        Some(node)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(node_id)
    }

    /// Arena index of a node
    pub fn node_index(&self, node_id: &str) -> Option<usize> {
        self.nodes.get_index_of(node_id)
    }

    /// Node at an arena index
    pub fn node_at(&self, index: usize) -> Option<&Node> {
        self.nodes.get_index(index).map(|(_, node)| node)
    }

    /// Get all nodes, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add a connection after validating both endpoints.
    ///
    /// The source port must be one of the source node's outputs and the target
    /// port one of the target node's inputs. An empty id is replaced with the
    /// next positional one.
    pub fn connect(&mut self, mut connection: Connection) -> Result<ConnectionId, SheetError> {
        if connection.id.is_empty() {
            connection.id = self.next_connection_id();
        }
        if self.connection(connection.id.as_str()).is_some() {
            return Err(SheetError::DuplicateConnection(connection.id));
        }

        let from_node = &connection.from.node_id;
        let to_node = &connection.to.node_id;

        let source = self
            .nodes
            .get(from_node)
            .ok_or_else(|| SheetError::NodeNotFound(from_node.clone()))?;
        let target = self
            .nodes
            .get(to_node)
            .ok_or_else(|| SheetError::NodeNotFound(to_node.clone()))?;

        if source.output(connection.from.output_id.as_str()).is_none() {
            return Err(SheetError::PortNotFound {
                node: from_node.clone(),
                port: connection.from.output_id.to_string(),
            });
        }
        if target.input(connection.to.input_id.as_str()).is_none() {
            return Err(SheetError::PortNotFound {
                node: to_node.clone(),
                port: connection.to.input_id.to_string(),
            });
        }

        if from_node == to_node {
            return Err(SheetError::SelfLoop(from_node.clone()));
        }

        let id = connection.id.clone();
        self.connections.push(connection);
        Ok(id)
    }

    /// Connect two ports under the next free positional id
    pub fn connect_ports(
        &mut self,
        from_node: &str,
        from_port: &str,
        to_node: &str,
        to_port: &str,
    ) -> Result<ConnectionId, SheetError> {
        let id = self.next_connection_id();
        self.connect(Connection::new(id, from_node, from_port, to_node, to_port))
    }

    /// Next unused positional connection id
    pub fn next_connection_id(&self) -> ConnectionId {
        let mut n = self.connections.len();
        loop {
            let id = ConnectionId::positional(n);
            if self.connection(id.as_str()).is_none() {
                return id;
            }
            n += 1;
        }
    }

    /// Remove a connection
    pub fn disconnect(&mut self, connection_id: &str) -> Option<Connection> {
        let position = self
            .connections
            .iter()
            .position(|c| c.id.as_str() == connection_id)?;
        Some(self.connections.remove(position))
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id.as_str() == connection_id)
    }

    /// Get all connections, in declaration order
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    /// Get connections arriving at an input port, in declaration order
    pub fn connections_to<'a>(
        &'a self,
        node_id: &'a str,
        input_id: &'a str,
    ) -> impl Iterator<Item = &'a Connection> {
        self.connections
            .iter()
            .filter(move |c| c.targets(node_id, input_id))
    }

    /// Connections with at least one endpoint node missing
    pub fn dangling_connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(|c| {
            !self.nodes.contains_key(&c.from.node_id) || !self.nodes.contains_key(&c.to.node_id)
        })
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Merge properties into a node (shallow, last write wins)
    pub fn update_node_properties(
        &mut self,
        node_id: &str,
        properties: Properties,
    ) -> Result<(), SheetError> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| SheetError::NodeNotFound(NodeId::from(node_id)))?;
        node.properties.extend(properties);
        Ok(())
    }

    /// Find a node that sits on a cycle of execution edges, if any
    pub fn find_execution_cycle(&self) -> Option<&NodeId> {
        let mut visited = HashSet::new();
        let mut temp_mark = HashSet::new();

        for index in 0..self.nodes.len() {
            if !visited.contains(&index) {
                if let Err(index) = self.visit(index, &mut visited, &mut temp_mark) {
                    return self.nodes.get_index(index).map(|(id, _)| id);
                }
            }
        }
        None
    }

    fn visit(
        &self,
        index: usize,
        visited: &mut HashSet<usize>,
        temp_mark: &mut HashSet<usize>,
    ) -> Result<(), usize> {
        if temp_mark.contains(&index) {
            return Err(index);
        }
        if visited.contains(&index) {
            return Ok(());
        }

        temp_mark.insert(index);

        let Some((node_id, node)) = self.nodes.get_index(index) else {
            return Ok(());
        };
        for connection in self.connections.iter().filter(|c| &c.from.node_id == node_id) {
            let is_execution = node
                .output(connection.from.output_id.as_str())
                .is_some_and(|p| p.kind == PortKind::Execution);
            if !is_execution {
                continue;
            }
            if let Some(next) = self.nodes.get_index_of(&connection.to.node_id) {
                self.visit(next, visited, temp_mark)?;
            }
        }

        temp_mark.remove(&index);
        visited.insert(index);
        Ok(())
    }
}

/// Wire shape of a sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SheetRecord {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    connections: Vec<Connection>,
}

impl TryFrom<SheetRecord> for LogicSheet {
    type Error = SheetError;

    fn try_from(record: SheetRecord) -> Result<Self, Self::Error> {
        Self::from_parts(record.nodes, record.connections)
    }
}

impl From<LogicSheet> for SheetRecord {
    fn from(sheet: LogicSheet) -> Self {
        Self {
            nodes: sheet.nodes.into_values().collect(),
            connections: sheet.connections,
        }
    }
}

/// Error when editing a sheet
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SheetError {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Port not found on a node
    #[error("Port not found: {node}.{port}")]
    PortNotFound {
        /// Node that was searched
        node: NodeId,
        /// Missing port
        port: String,
    },

    /// A node with this id already exists
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// A connection with this id already exists
    #[error("Duplicate connection id: {0}")]
    DuplicateConnection(ConnectionId),

    /// Connection not found
    #[error("Connection not found: {0}")]
    ConnectionNotFound(ConnectionId),

    /// Self-loop not allowed
    #[error("Self-loop not allowed on node {0}")]
    SelfLoop(NodeId),
}
