// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for logic sheets.

use crate::node::NodeId;
use crate::port::PortId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a connection within a logic sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub String);

impl ConnectionId {
    /// Create a connection id from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Positional id (`conn_<n>`)
    pub fn positional(n: usize) -> Self {
        Self(format!("conn_{n}"))
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty id, used on the wire for "assign one for me"
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source end of a connection: a node's output port
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRef {
    /// Source node
    pub node_id: NodeId,
    /// Output port on the source node
    pub output_id: PortId,
}

/// Target end of a connection: a node's input port
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputRef {
    /// Target node
    pub node_id: NodeId,
    /// Input port on the target node
    pub input_id: PortId,
}

/// A directed edge from an output port to an input port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Connection id. May be empty on the wire; the sheet assigns one.
    #[serde(default)]
    pub id: ConnectionId,
    /// Source end
    pub from: OutputRef,
    /// Target end
    pub to: InputRef,
}

impl Connection {
    /// Create a new connection
    pub fn new(
        id: ConnectionId,
        from_node: impl Into<NodeId>,
        from_port: &str,
        to_node: impl Into<NodeId>,
        to_port: &str,
    ) -> Self {
        Self {
            id,
            from: OutputRef {
                node_id: from_node.into(),
                output_id: PortId::from(from_port),
            },
            to: InputRef {
                node_id: to_node.into(),
                input_id: PortId::from(to_port),
            },
        }
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: &str) -> bool {
        self.from.node_id.as_str() == node_id || self.to.node_id.as_str() == node_id
    }

    /// Check if this connection targets a specific input port
    pub fn targets(&self, node_id: &str, input_id: &str) -> bool {
        self.to.node_id.as_str() == node_id && self.to.input_id.as_str() == input_id
    }
}
