// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of a port, unique within one side (inputs or outputs) of a node.
///
/// Ports are addressed by short well-known names (`exec`, `true`, `value`,
/// `condition`, ...), so the id is a plain string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortId(pub String);

impl PortId {
    /// Create a port id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PortId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for PortId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// What flows through a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortKind {
    /// Control flow. Following an execution edge runs the target node.
    Execution,
    /// Value flow. Data edges feed inputs of nodes that run later.
    Data,
}

/// A port on a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Port id
    pub id: PortId,
    /// Execution or data
    pub kind: PortKind,
    /// Display label
    #[serde(default)]
    pub label: String,
}

impl Port {
    /// Well-known id of the execution input every executable node carries
    pub const EXEC: &'static str = "exec";

    /// Create a new port
    pub fn new(id: impl Into<String>, kind: PortKind, label: impl Into<String>) -> Self {
        Self {
            id: PortId::new(id),
            kind,
            label: label.into(),
        }
    }

    /// The standard execution input (`exec`)
    pub fn exec_in() -> Self {
        Self::new(Self::EXEC, PortKind::Execution, "Exec")
    }

    /// An execution output
    pub fn exec_out(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, PortKind::Execution, label)
    }

    /// A data port (input or output depending on which list it lands in)
    pub fn data(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, PortKind::Data, label)
    }

    /// Check if this is an execution port
    pub fn is_execution(&self) -> bool {
        self.kind == PortKind::Execution
    }
}
