// SPDX-License-Identifier: MIT OR Apache-2.0
//! Default port layouts for the built-in node kinds.
//!
//! Nodes that arrive from the editor carry their own ports; these layouts
//! are used when a node is created in code (the synthesizer, tests).

use crate::node::{ActionKind, EventKind, FlowOp, LogicOp, NodeKind, VariableOp};
use crate::port::Port;

/// Output port id of a branch's true path
pub const BRANCH_TRUE: &str = "true";
/// Output port id of a branch's false path
pub const BRANCH_FALSE: &str = "false";

/// Build the default `(inputs, outputs)` for a node kind
pub fn default_ports(kind: &NodeKind) -> (Vec<Port>, Vec<Port>) {
    match kind {
        NodeKind::Event(event) => {
            let mut outputs = vec![Port::exec_out(Port::EXEC, "Exec")];
            match event {
                EventKind::OnUpdate => outputs.push(Port::data("deltaTime", "Delta Time")),
                EventKind::OnCollision => outputs.push(Port::data("otherActor", "Other Actor")),
                EventKind::OnClick | EventKind::OnStart | EventKind::Custom(_) => {}
            }
            (vec![], outputs)
        }
        NodeKind::Variable(VariableOp::GetVariable) => (vec![], vec![Port::data("value", "Value")]),
        NodeKind::Variable(VariableOp::SetVariable) | NodeKind::Action(ActionKind::SetVariable) => (
            vec![Port::exec_in(), Port::data("value", "Value")],
            vec![Port::exec_out(Port::EXEC, "Exec")],
        ),
        NodeKind::Variable(VariableOp::GetInput) => (
            vec![Port::exec_in()],
            vec![
                Port::exec_out(Port::EXEC, "Exec"),
                Port::data("x", "X"),
                Port::data("y", "Y"),
                Port::data("pressed", "Pressed"),
            ],
        ),
        NodeKind::Logic(LogicOp::Not) => (
            vec![Port::data("a", "A")],
            vec![Port::data("value", "Result")],
        ),
        NodeKind::Logic(_) => (
            vec![Port::data("a", "A"), Port::data("b", "B")],
            vec![Port::data("value", "Result")],
        ),
        NodeKind::Flow(FlowOp::Branch) => (
            vec![Port::exec_in(), Port::data("condition", "Condition")],
            vec![
                Port::exec_out(BRANCH_TRUE, "True"),
                Port::exec_out(BRANCH_FALSE, "False"),
            ],
        ),
        NodeKind::Flow(FlowOp::Sequence) => (
            vec![Port::exec_in()],
            vec![
                Port::exec_out("then_0", "Then 0"),
                Port::exec_out("then_1", "Then 1"),
            ],
        ),
        NodeKind::Flow(FlowOp::Delay) | NodeKind::Action(_) => (
            vec![Port::exec_in()],
            vec![Port::exec_out(Port::EXEC, "Exec")],
        ),
        NodeKind::Unrecognized { .. } => (vec![], vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortKind;

    #[test]
    fn test_branch_layout() {
        let (inputs, outputs) = default_ports(&NodeKind::Flow(FlowOp::Branch));
        assert_eq!(inputs[1].id.as_str(), "condition");
        assert_eq!(inputs[1].kind, PortKind::Data);
        assert!(outputs.iter().all(Port::is_execution));
        assert_eq!(outputs[0].id.as_str(), BRANCH_TRUE);
        assert_eq!(outputs[1].id.as_str(), BRANCH_FALSE);
    }

    #[test]
    fn test_get_input_exposes_pointer() {
        let (_, outputs) = default_ports(&NodeKind::Variable(VariableOp::GetInput));
        let ids: Vec<_> = outputs.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["exec", "x", "y", "pressed"]);
    }

    #[test]
    fn test_logic_nodes_are_pure() {
        let (inputs, outputs) = default_ports(&NodeKind::Logic(LogicOp::GreaterThan));
        assert!(!inputs.iter().any(Port::is_execution));
        assert!(!outputs.iter().any(Port::is_execution));
    }
}
