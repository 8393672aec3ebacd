// SPDX-License-Identifier: MIT OR Apache-2.0
//! Starter graphs per actor category.

use super::defaults::VariableMap;
use super::scene::{ClickAction, EntityData};
use crate::actor::ActorCategory;
use crate::variables::VariableDefinition;
use playsheet_graph::{
    ActionKind, Connection, ConnectionId, EventKind, LogicSheet, Node, NodeId, NodeKind, Value,
    VariableOp,
};

/// Horizontal spacing between graph columns in the editor
const COLUMN_WIDTH: f32 = 220.0;
/// Vertical spacing between graph rows in the editor
const ROW_HEIGHT: f32 = 120.0;

/// Node id counter shared by every actor in one extraction pass
#[derive(Debug, Default)]
pub struct NodeIds {
    next: usize,
}

impl NodeIds {
    fn next(&mut self) -> NodeId {
        let id = NodeId::new(format!("node_{}", self.next));
        self.next += 1;
        id
    }
}

/// Collects nodes and links for one sheet
struct SheetBuilder<'a> {
    ids: &'a mut NodeIds,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
}

impl<'a> SheetBuilder<'a> {
    fn new(ids: &'a mut NodeIds) -> Self {
        Self {
            ids,
            nodes: Vec::new(),
            connections: Vec::new(),
        }
    }

    fn add(
        &mut self,
        kind: NodeKind,
        column: u8,
        row: u8,
        properties: &[(&str, Value)],
    ) -> NodeId {
        let id = self.ids.next();
        let mut node = Node::new(id.clone(), kind)
            .with_position(f32::from(column) * COLUMN_WIDTH, f32::from(row) * ROW_HEIGHT);
        for (key, value) in properties {
            node.properties.insert((*key).to_string(), value.clone());
        }
        self.nodes.push(node);
        id
    }

    fn link(&mut self, from: &NodeId, output: &str, to: &NodeId, input: &str) {
        let id = ConnectionId::positional(self.connections.len());
        self.connections
            .push(Connection::new(id, from.clone(), output, to.clone(), input));
    }

    fn finish(self, actor_id: &str) -> LogicSheet {
        LogicSheet::from_parts(self.nodes, self.connections).unwrap_or_else(|err| {
            tracing::error!(actor = actor_id, %err, "Starter graph is invalid");
            LogicSheet::new()
        })
    }
}

fn event(kind: EventKind) -> NodeKind {
    NodeKind::Event(kind)
}

fn action(kind: ActionKind) -> NodeKind {
    NodeKind::Action(kind)
}

/// Build the starter graph for a category, adding any variables it relies on
pub fn default_graph(
    category: ActorCategory,
    entity: &EntityData,
    variables: &mut VariableMap,
    ids: &mut NodeIds,
) -> LogicSheet {
    let mut sheet = SheetBuilder::new(ids);

    match category {
        ActorCategory::Ball => {
            for def in [
                VariableDefinition::number("directionX", 1.0),
                VariableDefinition::number("directionY", 1.0),
                VariableDefinition::number("speed", 200.0).with_range(Some(0.0), None),
            ] {
                variables.insert(def.name.clone(), def);
            }

            sheet.add(event(EventKind::OnUpdate), 0, 0, &[]);

            let wall = sheet.add(
                event(EventKind::OnCollision),
                0,
                1,
                &[("targetTag", Value::from("Wall"))],
            );
            let flip = sheet.add(
                action(ActionKind::FlipVariable),
                1,
                1,
                &[("variable", Value::from("directionY"))],
            );
            sheet.link(&wall, "exec", &flip, "exec");

            let paddle = sheet.add(
                event(EventKind::OnCollision),
                0,
                2,
                &[("targetTag", Value::from("Paddle"))],
            );
            let beep = sheet.add(
                action(ActionKind::PlaySound),
                1,
                2,
                &[("frequency", Value::from(440.0)), ("duration", Value::from(0.1))],
            );
            sheet.link(&paddle, "exec", &beep, "exec");
        }
        ActorCategory::Paddle => {
            let tick = sheet.add(event(EventKind::OnUpdate), 0, 0, &[]);
            let input = sheet.add(
                NodeKind::Variable(VariableOp::GetInput),
                1,
                0,
                &[("source", Value::from("touch"))],
            );
            let set = sheet.add(
                NodeKind::Variable(VariableOp::SetVariable),
                2,
                0,
                &[("variable", Value::from("positionX"))],
            );
            sheet.link(&tick, "exec", &input, "exec");
            sheet.link(&input, "exec", &set, "exec");
            sheet.link(&input, "x", &set, "value");
        }
        ActorCategory::Powerup => {
            let hit = sheet.add(
                event(EventKind::OnCollision),
                0,
                0,
                &[("targetTag", Value::from("Player"))],
            );
            let beep = sheet.add(
                action(ActionKind::PlaySound),
                1,
                0,
                &[("frequency", Value::from(880.0)), ("duration", Value::from(0.15))],
            );
            let destroy = sheet.add(action(ActionKind::DestroyActor), 2, 0, &[]);
            sheet.link(&hit, "exec", &beep, "exec");
            sheet.link(&beep, "exec", &destroy, "exec");
        }
        ActorCategory::UiButton => {
            let click = sheet.add(event(EventKind::OnClick), 0, 0, &[]);
            if let Some(on_click) = &entity.on_click {
                let (kind, properties) = click_action(on_click);
                let node = sheet.add(action(kind), 1, 0, &properties);
                sheet.link(&click, "exec", &node, "exec");
            }
        }
        ActorCategory::Enemy
        | ActorCategory::UiScore
        | ActorCategory::Background
        | ActorCategory::UiText
        | ActorCategory::Shape
        | ActorCategory::Sprite => {
            sheet.add(event(EventKind::OnUpdate), 0, 0, &[]);
        }
    }

    sheet.finish(&entity.id)
}

/// Action node for a button's declared click behavior
fn click_action(on_click: &ClickAction) -> (ActionKind, Vec<(&'static str, Value)>) {
    let target = on_click.target.clone().unwrap_or_default();
    match on_click.action.as_str() {
        "switchScene" => (ActionKind::SwitchScene, vec![("scene", Value::from(target))]),
        "switchState" => (ActionKind::SwitchState, vec![("state", Value::from(target))]),
        "playSound" => (ActionKind::PlaySound, vec![("sound", Value::from(target))]),
        other => {
            let mut properties = vec![("action", Value::from(other))];
            if let Some(target) = &on_click.target {
                properties.push(("target", Value::from(target.as_str())));
            }
            (ActionKind::Custom, properties)
        }
    }
}
