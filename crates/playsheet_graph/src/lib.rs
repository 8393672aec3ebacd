// SPDX-License-Identifier: MIT OR Apache-2.0
//! Logic sheet data model for Playsheet.
//!
//! A logic sheet is the directed graph that defines one actor's behavior:
//! - Typed nodes (events, variable access, logic, flow control, actions)
//! - Execution and data ports
//! - Connections from output ports to input ports
//!
//! ## Architecture
//!
//! The model is plain data with serde support. The wire shape (field names
//! and nesting) is the contract with the editor; in memory, node behavior is
//! parsed into closed enums so the interpreter can match exhaustively.

pub mod connection;
pub mod library;
pub mod node;
pub mod port;
pub mod sheet;
pub mod value;

pub use connection::{Connection, ConnectionId, InputRef, OutputRef};
pub use node::{
    ActionKind, EventKind, FlowOp, LogicOp, Node, NodeId, NodeKind, NodeType, Position,
    Properties, VariableOp,
};
pub use port::{Port, PortId, PortKind};
pub use sheet::{LogicSheet, SheetError};
pub use value::Value;
