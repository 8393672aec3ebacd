// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-node semantics.
//!
//! Each handler reads its bound slots and static properties and returns only
//! the slots it produces. Threading results downstream is the walk's job.

use crate::context::Slots;
use crate::host::HostServices;
use crate::variables::{VariableInstance, VariableStore};
use playsheet_graph::{ActionKind, LogicOp, Node, NodeKind, Value, VariableOp};

const DEFAULT_BEEP_FREQUENCY: f64 = 440.0;
const DEFAULT_BEEP_DURATION: f64 = 0.1;
const DEFAULT_WAVEFORM: &str = "square";

/// What a node handler may touch
pub(crate) struct NodeEnv<'a> {
    pub actor_id: &'a str,
    pub variables: &'a mut VariableStore,
    pub instance: &'a mut VariableInstance,
    pub host: &'a mut HostServices,
}

impl NodeEnv<'_> {
    fn get(&self, name: &str) -> Option<Value> {
        self.variables.get(self.actor_id, name, Some(&*self.instance))
    }

    fn number(&self, name: &str) -> f64 {
        self.get(name).and_then(|v| v.to_number()).unwrap_or(0.0)
    }

    fn set(&mut self, name: &str, value: Value) -> Value {
        self.variables
            .set(self.actor_id, name, value, Some(&mut *self.instance))
    }
}

/// Evaluate one node
pub(crate) fn evaluate(node: &Node, slots: &Slots, env: &mut NodeEnv<'_>) -> Slots {
    match &node.kind {
        NodeKind::Event(_) => Slots {
            delta_time: slots.delta_time,
            other_actor: slots.other_actor.clone(),
            other_type: slots.other_type.clone(),
            ..Slots::default()
        },
        NodeKind::Variable(op) => variable(*op, node, slots, env),
        NodeKind::Logic(op) => Slots::with_value(logic(*op, node, slots)),
        // Branch is decided by the walk; Delay and Sequence only pass through
        NodeKind::Flow(_) => Slots::default(),
        NodeKind::Action(kind) => action(*kind, node, slots, env),
        NodeKind::Unrecognized { .. } => {
            tracing::warn!(actor = env.actor_id, node = %node.id, kind = %node.kind, "Unrecognized node");
            Slots::default()
        }
    }
}

fn variable_name<'n>(node: &'n Node, actor_id: &str) -> Option<&'n str> {
    let name = node.property_str("variable").filter(|name| !name.is_empty());
    if name.is_none() {
        tracing::warn!(actor = actor_id, node = %node.id, "Node has no variable property");
    }
    name
}

fn variable(op: VariableOp, node: &Node, slots: &Slots, env: &mut NodeEnv<'_>) -> Slots {
    match op {
        VariableOp::GetVariable => {
            let Some(name) = variable_name(node, env.actor_id) else {
                return Slots::default();
            };
            match env.get(name) {
                Some(value) => Slots::with_value(value),
                None => {
                    tracing::warn!(actor = env.actor_id, variable = name, "Unknown variable");
                    Slots::default()
                }
            }
        }
        VariableOp::SetVariable => set_variable(node, slots, env),
        VariableOp::GetInput => match &env.host.input {
            Some(input) => Slots {
                pointer: Some(input.pointer()),
                ..Slots::default()
            },
            None => {
                tracing::debug!(actor = env.actor_id, "GetInput without an input service");
                Slots::default()
            }
        },
    }
}

fn set_variable(node: &Node, slots: &Slots, env: &mut NodeEnv<'_>) -> Slots {
    let Some(name) = variable_name(node, env.actor_id) else {
        return Slots::default();
    };
    let Some(value) = slots
        .input_value
        .clone()
        .or_else(|| node.property("value").cloned())
    else {
        tracing::warn!(actor = env.actor_id, node = %node.id, "SetVariable has no value");
        return Slots::default();
    };
    let stored = env.set(name, value);
    tracing::debug!(actor = env.actor_id, variable = name, value = %stored, "Set variable");
    Slots::with_value(stored)
}

fn finite(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Pure evaluation of a logic op over bound inputs, falling back to the
/// node's static `a` and `b`
pub(crate) fn logic(op: LogicOp, node: &Node, slots: &Slots) -> Value {
    let a = slots.input_a.clone().or_else(|| node.property("a").cloned());
    let b = slots.input_b.clone().or_else(|| node.property("b").cloned());

    let truthy = |v: &Option<Value>| v.as_ref().is_some_and(Value::truthy);
    let number = |v: &Option<Value>| v.as_ref().and_then(Value::to_number).unwrap_or(0.0);

    match op {
        LogicOp::Not => Value::Boolean(!truthy(&a)),
        LogicOp::And => Value::Boolean(truthy(&a) && truthy(&b)),
        LogicOp::Or => Value::Boolean(truthy(&a) || truthy(&b)),
        LogicOp::GreaterThan => Value::Boolean(number(&a) > number(&b)),
        LogicOp::LessThan => Value::Boolean(number(&a) < number(&b)),
        LogicOp::Equal => Value::Boolean(match (&a, &b) {
            (Some(Value::String(x)), Some(Value::String(y))) => x == y,
            _ => number(&a) == number(&b),
        }),
        LogicOp::Add => Value::Number(finite(number(&a) + number(&b))),
        LogicOp::Subtract => Value::Number(finite(number(&a) - number(&b))),
        LogicOp::Multiply => Value::Number(finite(number(&a) * number(&b))),
        LogicOp::Divide => {
            let divisor = number(&b);
            if divisor == 0.0 {
                Value::Number(0.0)
            } else {
                Value::Number(finite(number(&a) / divisor))
            }
        }
    }
}

fn action(kind: ActionKind, node: &Node, slots: &Slots, env: &mut NodeEnv<'_>) -> Slots {
    match kind {
        ActionKind::FlipVariable => {
            let Some(name) = variable_name(node, env.actor_id) else {
                return Slots::default();
            };
            let flipped = match env.get(name) {
                Some(Value::Number(n)) => Value::Number(-n),
                Some(Value::Boolean(b)) => Value::Boolean(!b),
                other => {
                    tracing::warn!(
                        actor = env.actor_id,
                        variable = name,
                        found = other.as_ref().map_or("nothing", playsheet_graph::Value::type_name),
                        "FlipVariable needs a number or boolean"
                    );
                    return Slots::default();
                }
            };
            Slots::with_value(env.set(name, flipped))
        }
        ActionKind::SetVariable => set_variable(node, slots, env),
        ActionKind::PlaySound => {
            let frequency = node.property_f64("frequency").unwrap_or(DEFAULT_BEEP_FREQUENCY);
            let duration = node.property_f64("duration").unwrap_or(DEFAULT_BEEP_DURATION);
            let waveform = node.property_str("waveform").unwrap_or(DEFAULT_WAVEFORM);
            match env.host.audio.as_mut() {
                Some(audio) => audio.play_beep(frequency, duration, waveform),
                None => tracing::debug!(actor = env.actor_id, "PlaySound without an audio service"),
            }
            Slots::default()
        }
        ActionKind::SwitchScene => {
            let target = node.property_str("scene").or_else(|| node.property_str("target"));
            match (target, env.host.scene.as_mut()) {
                (Some(scene), Some(service)) => service.switch_to(scene),
                (None, _) => tracing::warn!(actor = env.actor_id, node = %node.id, "SwitchScene has no scene"),
                (Some(_), None) => tracing::debug!(actor = env.actor_id, "SwitchScene without a scene service"),
            }
            Slots::default()
        }
        ActionKind::SwitchState => {
            let target = node.property_str("state").or_else(|| node.property_str("target"));
            match (target, env.host.scene.as_mut()) {
                (Some(state), Some(service)) => service.switch_state(state),
                (None, _) => tracing::warn!(actor = env.actor_id, node = %node.id, "SwitchState has no state"),
                (Some(_), None) => tracing::debug!(actor = env.actor_id, "SwitchState without a scene service"),
            }
            Slots::default()
        }
        ActionKind::SpawnActor => {
            let Some(template) = node.property_str("template") else {
                tracing::warn!(actor = env.actor_id, node = %node.id, "SpawnActor has no template");
                return Slots::default();
            };
            let x = node
                .property_f64("x")
                .unwrap_or_else(|| env.number("positionX"));
            let y = node
                .property_f64("y")
                .unwrap_or_else(|| env.number("positionY"));
            if let Some(scene) = env.host.scene.as_mut() {
                scene.spawn_actor(template, x, y);
            }
            Slots::default()
        }
        ActionKind::DestroyActor => {
            let target = node.property_str("target").unwrap_or(env.actor_id);
            if let Some(scene) = env.host.scene.as_mut() {
                scene.destroy_actor(target);
            }
            Slots::default()
        }
        ActionKind::Move => {
            accumulate(node, slots, env, [("dx", "positionX"), ("dy", "positionY")]);
            Slots::default()
        }
        ActionKind::Scale => {
            accumulate(node, slots, env, [("dw", "width"), ("dh", "height")]);
            Slots::default()
        }
        ActionKind::SetColor => set_color(node, slots, env),
        ActionKind::Custom => {
            tracing::info!(
                actor = env.actor_id,
                node = %node.id,
                action = node.property_str("action").unwrap_or(""),
                "Custom action"
            );
            Slots::default()
        }
    }
}

/// Add `delta * deltaTime` to each target variable. Without a frame time the
/// delta applies once, unscaled.
fn accumulate<const N: usize>(
    node: &Node,
    slots: &Slots,
    env: &mut NodeEnv<'_>,
    pairs: [(&str, &str); N],
) {
    let scale = slots.delta_time.unwrap_or(1.0);
    for (property, variable) in pairs {
        if let Some(delta) = node.property_f64(property) {
            let next = finite(env.number(variable) + delta * scale);
            env.set(variable, Value::Number(next));
        }
    }
}

fn set_color(node: &Node, slots: &Slots, env: &mut NodeEnv<'_>) -> Slots {
    let Some(color) = slots
        .input_value
        .clone()
        .or_else(|| node.property("color").cloned())
    else {
        tracing::warn!(actor = env.actor_id, node = %node.id, "SetColor has no color");
        return Slots::default();
    };
    let color = env.set("color", color);

    let entity_ref = node
        .property_str("entityRef")
        .map(str::to_string)
        .or_else(|| env.get("entityRef").and_then(|v| v.as_str().map(str::to_string)));

    if let Some(entities) = env.host.entities.as_mut() {
        let mirrored = entities.mirror_color(env.actor_id, &color)
            || entity_ref
                .as_deref()
                .is_some_and(|entity| entities.mirror_color(entity, &color));
        if !mirrored {
            tracing::debug!(actor = env.actor_id, "No live entity to mirror color onto");
        }
    }
    Slots::with_value(color)
}
