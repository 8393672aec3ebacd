// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for logic sheets.
//!
//! On the wire a node names its behavior with two strings, `type` and
//! `subtype`. In memory that pair is parsed once into [`NodeKind`], a closed
//! enum per node type, so the interpreter can match exhaustively. Pairs that
//! do not parse are kept verbatim in [`NodeKind::Unrecognized`].

use crate::library;
use crate::port::{Port, PortId};
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Static node configuration (`targetTag`, `variable`, `a`, `b`, ...)
pub type Properties = IndexMap<String, Value>;

/// Unique identifier for a node within a logic sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a node id from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh random id (`node_<uuid>`), for nodes created outside the
    /// synthesizer's counter
    pub fn generate() -> Self {
        Self(format!("node_{}", Uuid::new_v4().simple()))
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

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Node type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Entry points triggered by the host
    Event,
    /// Variable access and host input
    Variable,
    /// Pure logic and arithmetic
    Logic,
    /// Flow control
    Flow,
    /// Side effects
    Action,
}

impl NodeType {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "Event",
            Self::Variable => "Variable",
            Self::Logic => "Logic",
            Self::Flow => "Flow",
            Self::Action => "Action",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        [Self::Event, Self::Variable, Self::Logic, Self::Flow, Self::Action]
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
    }
}

/// Event subtypes. Event names are open: anything the host triggers is valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Every frame
    OnUpdate,
    /// Collision with another actor, filtered by `targetTag`
    OnCollision,
    /// Pointer click on the actor
    OnClick,
    /// Scene start
    OnStart,
    /// Host-defined event name
    Custom(String),
}

impl EventKind {
    /// Event name as triggered by the host
    pub fn as_str(&self) -> &str {
        match self {
            Self::OnUpdate => "OnUpdate",
            Self::OnCollision => "OnCollision",
            Self::OnClick => "OnClick",
            Self::OnStart => "OnStart",
            Self::Custom(name) => name,
        }
    }

    /// Parse an event name. Never fails.
    pub fn parse(s: &str) -> Self {
        match s {
            "OnUpdate" => Self::OnUpdate,
            "OnCollision" => Self::OnCollision,
            "OnClick" => Self::OnClick,
            "OnStart" => Self::OnStart,
            other => Self::Custom(other.to_string()),
        }
    }
}

/// Variable subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableOp {
    /// Read a variable named by the `variable` property
    GetVariable,
    /// Write a variable named by the `variable` property
    SetVariable,
    /// Read the host pointer
    GetInput,
}

impl VariableOp {
    const ALL: [Self; 3] = [Self::GetVariable, Self::SetVariable, Self::GetInput];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetVariable => "GetVariable",
            Self::SetVariable => "SetVariable",
            Self::GetInput => "GetInput",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str().eq_ignore_ascii_case(s))
    }
}

/// Logic subtypes, all pure over inputs `a` and `b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicOp {
    /// `!a`
    Not,
    /// `a && b`
    And,
    /// `a || b`
    Or,
    /// `a > b`
    GreaterThan,
    /// `a < b`
    LessThan,
    /// `a == b`
    Equal,
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`, zero when `b` is zero
    Divide,
}

impl LogicOp {
    const ALL: [Self; 10] = [
        Self::Not,
        Self::And,
        Self::Or,
        Self::GreaterThan,
        Self::LessThan,
        Self::Equal,
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Not => "NOT",
            Self::And => "AND",
            Self::Or => "OR",
            Self::GreaterThan => "GreaterThan",
            Self::LessThan => "LessThan",
            Self::Equal => "Equal",
            Self::Add => "Add",
            Self::Subtract => "Subtract",
            Self::Multiply => "Multiply",
            Self::Divide => "Divide",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str().eq_ignore_ascii_case(s))
    }
}

/// Flow subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowOp {
    /// Follow `true` or `false`
    Branch,
    /// Pass-through; no timing
    Delay,
    /// Pass-through; outputs run in declaration order
    Sequence,
}

impl FlowOp {
    const ALL: [Self; 3] = [Self::Branch, Self::Delay, Self::Sequence];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Branch => "Branch",
            Self::Delay => "Delay",
            Self::Sequence => "Sequence",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str().eq_ignore_ascii_case(s))
    }
}

/// Action subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Negate a number or invert a boolean variable
    FlipVariable,
    /// Write a variable
    SetVariable,
    /// Ask the audio service for a beep
    PlaySound,
    /// Ask the scene service to switch scenes
    SwitchScene,
    /// Ask the scene service to switch the current scene's state
    SwitchState,
    /// Ask the scene service to spawn an actor
    SpawnActor,
    /// Ask the scene service to destroy an actor
    DestroyActor,
    /// Accumulate into `positionX`/`positionY`
    Move,
    /// Accumulate into `width`/`height`
    Scale,
    /// Write `color` and mirror it onto the live entity
    SetColor,
    /// Designer-named action without built-in semantics
    Custom,
}

impl ActionKind {
    const ALL: [Self; 11] = [
        Self::FlipVariable,
        Self::SetVariable,
        Self::PlaySound,
        Self::SwitchScene,
        Self::SwitchState,
        Self::SpawnActor,
        Self::DestroyActor,
        Self::Move,
        Self::Scale,
        Self::SetColor,
        Self::Custom,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlipVariable => "FlipVariable",
            Self::SetVariable => "SetVariable",
            Self::PlaySound => "PlaySound",
            Self::SwitchScene => "SwitchScene",
            Self::SwitchState => "SwitchState",
            Self::SpawnActor => "SpawnActor",
            Self::DestroyActor => "DestroyActor",
            Self::Move => "Move",
            Self::Scale => "Scale",
            Self::SetColor => "SetColor",
            Self::Custom => "Custom",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str().eq_ignore_ascii_case(s))
    }
}

/// Parsed `(type, subtype)` of a node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Event entry point
    Event(EventKind),
    /// Variable access
    Variable(VariableOp),
    /// Logic/arithmetic
    Logic(LogicOp),
    /// Flow control
    Flow(FlowOp),
    /// Side effect
    Action(ActionKind),
    /// Type or subtype this runtime does not know. Executes as a no-op.
    Unrecognized {
        /// Raw `type`
        node_type: String,
        /// Raw `subtype`
        subtype: String,
    },
}

impl NodeKind {
    /// Parse a wire `(type, subtype)` pair. Never fails.
    pub fn parse(node_type: &str, subtype: &str) -> Self {
        let parsed = match NodeType::parse(node_type) {
            Some(NodeType::Event) => Some(Self::Event(EventKind::parse(subtype))),
            Some(NodeType::Variable) => VariableOp::parse(subtype).map(Self::Variable),
            Some(NodeType::Logic) => LogicOp::parse(subtype).map(Self::Logic),
            Some(NodeType::Flow) => FlowOp::parse(subtype).map(Self::Flow),
            Some(NodeType::Action) => ActionKind::parse(subtype).map(Self::Action),
            None => None,
        };
        parsed.unwrap_or_else(|| Self::Unrecognized {
            node_type: node_type.to_string(),
            subtype: subtype.to_string(),
        })
    }

    /// Node type, if recognized
    pub fn node_type(&self) -> Option<NodeType> {
        match self {
            Self::Event(_) => Some(NodeType::Event),
            Self::Variable(_) => Some(NodeType::Variable),
            Self::Logic(_) => Some(NodeType::Logic),
            Self::Flow(_) => Some(NodeType::Flow),
            Self::Action(_) => Some(NodeType::Action),
            Self::Unrecognized { .. } => None,
        }
    }

    /// Wire `type` string
    pub fn type_name(&self) -> &str {
        match self {
            Self::Unrecognized { node_type, .. } => node_type,
            other => other.node_type().map_or("", |t| t.as_str()),
        }
    }

    /// Wire `subtype` string
    pub fn subtype_name(&self) -> &str {
        match self {
            Self::Event(kind) => kind.as_str(),
            Self::Variable(op) => op.as_str(),
            Self::Logic(op) => op.as_str(),
            Self::Flow(op) => op.as_str(),
            Self::Action(kind) => kind.as_str(),
            Self::Unrecognized { subtype, .. } => subtype,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_name(), self.subtype_name())
    }
}

/// Position in the editor canvas. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X
    pub x: f32,
    /// Y
    pub y: f32,
}

/// A node instance in a logic sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NodeRecord", into = "NodeRecord")]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Parsed type and subtype
    pub kind: NodeKind,
    /// Position in the editor canvas
    pub position: Position,
    /// Input ports
    pub inputs: Vec<Port>,
    /// Output ports
    pub outputs: Vec<Port>,
    /// Static configuration
    pub properties: Properties,
}

impl Node {
    /// Create a node with the default ports for its kind
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        let (inputs, outputs) = library::default_ports(&kind);
        Self {
            id: id.into(),
            kind,
            position: Position::default(),
            inputs,
            outputs,
            properties: Properties::new(),
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Position { x, y };
        self
    }

    /// Set a property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Get an input port by ID
    pub fn input(&self, port_id: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.id.as_str() == port_id)
    }

    /// Get an output port by ID
    pub fn output(&self, port_id: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.id.as_str() == port_id)
    }

    /// Output ports of kind Execution, in declaration order
    pub fn execution_outputs(&self) -> impl Iterator<Item = &PortId> {
        self.outputs.iter().filter(|p| p.is_execution()).map(|p| &p.id)
    }

    /// Get a property
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Get a string property
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(Value::as_str)
    }

    /// Get a numeric property, coercing numeric strings
    pub fn property_f64(&self, key: &str) -> Option<f64> {
        self.property(key).and_then(Value::to_number)
    }

    /// Whether this is an event node for the given event name
    pub fn is_event(&self, event_type: &str) -> bool {
        matches!(&self.kind, NodeKind::Event(kind) if kind.as_str() == event_type)
    }
}

/// Wire shape of a node
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeRecord {
    #[serde(default)]
    id: NodeId,
    #[serde(rename = "type")]
    node_type: String,
    subtype: String,
    #[serde(default)]
    position: Position,
    /// Absent on both sides means "use the kind's default layout"
    #[serde(default)]
    inputs: Option<Vec<Port>>,
    #[serde(default)]
    outputs: Option<Vec<Port>>,
    #[serde(default)]
    properties: Properties,
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        let kind = NodeKind::parse(&record.node_type, &record.subtype);
        let (inputs, outputs) = match (record.inputs, record.outputs) {
            (None, None) => library::default_ports(&kind),
            (inputs, outputs) => (inputs.unwrap_or_default(), outputs.unwrap_or_default()),
        };
        Self {
            id: record.id,
            kind,
            position: record.position,
            inputs,
            outputs,
            properties: record.properties,
        }
    }
}

impl From<Node> for NodeRecord {
    fn from(node: Node) -> Self {
        Self {
            id: node.id,
            node_type: node.kind.type_name().to_string(),
            subtype: node.kind.subtype_name().to_string(),
            position: node.position,
            inputs: Some(node.inputs),
            outputs: Some(node.outputs),
            properties: node.properties,
        }
    }
}
