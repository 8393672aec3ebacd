// SPDX-License-Identifier: MIT OR Apache-2.0
//! Walk context: the typed scratch slots threaded from node to node.

use crate::host::PointerState;
use playsheet_graph::Value;
use serde::{Deserialize, Serialize};

/// Data an event carries into the walks it starts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventData {
    /// Frame time in seconds (OnUpdate)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_time: Option<f64>,
    /// Id of the other actor (OnCollision)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_actor: Option<String>,
    /// Entity type of the other actor (OnCollision)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_type: Option<String>,
    /// Free payload for custom events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl EventData {
    /// No payload
    pub fn none() -> Self {
        Self::default()
    }

    /// Frame tick
    pub fn update(delta_time: f64) -> Self {
        Self {
            delta_time: Some(delta_time),
            ..Self::default()
        }
    }

    /// Collision with another actor
    pub fn collision(other_actor: impl Into<String>, other_type: Option<String>) -> Self {
        Self {
            other_actor: Some(other_actor.into()),
            other_type,
            ..Self::default()
        }
    }
}

/// Scratch slots for one step of a walk.
///
/// Data ports are not wired through an open map: each input port id binds one
/// slot and each output port id reads one slot, see [`Slots::bind_input`] and
/// [`Slots::output`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slots {
    /// Frame time
    pub delta_time: Option<f64>,
    /// Other actor's id
    pub other_actor: Option<String>,
    /// Other actor's entity type
    pub other_type: Option<String>,
    /// Branch condition
    pub condition: Option<Value>,
    /// Bound `value` input
    pub input_value: Option<Value>,
    /// Bound `a` input
    pub input_a: Option<Value>,
    /// Bound `b` input
    pub input_b: Option<Value>,
    /// Result of the last value-producing node
    pub value: Option<Value>,
    /// Pointer state from `GetInput`
    pub pointer: Option<PointerState>,
}

impl From<&EventData> for Slots {
    fn from(event: &EventData) -> Self {
        Self {
            delta_time: event.delta_time,
            other_actor: event.other_actor.clone(),
            other_type: event.other_type.clone(),
            value: event.value.clone(),
            ..Self::default()
        }
    }
}

impl Slots {
    /// A result carrying only `value`
    pub fn with_value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Overlay every filled slot of `other` onto `self`
    pub fn merge(&mut self, other: Slots) {
        fn take<T>(slot: &mut Option<T>, incoming: Option<T>) {
            if incoming.is_some() {
                *slot = incoming;
            }
        }
        take(&mut self.delta_time, other.delta_time);
        take(&mut self.other_actor, other.other_actor);
        take(&mut self.other_type, other.other_type);
        take(&mut self.condition, other.condition);
        take(&mut self.input_value, other.input_value);
        take(&mut self.input_a, other.input_a);
        take(&mut self.input_b, other.input_b);
        take(&mut self.value, other.value);
        take(&mut self.pointer, other.pointer);
    }

    /// Bind a value arriving on an input port. Returns false for ports with
    /// no slot.
    pub fn bind_input(&mut self, port: &str, value: Value) -> bool {
        let slot = match port {
            "value" => &mut self.input_value,
            "condition" => &mut self.condition,
            "a" => &mut self.input_a,
            "b" => &mut self.input_b,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Read the value an output port exposes
    pub fn output(&self, port: &str) -> Option<Value> {
        match port {
            "x" => self.pointer.map(|p| Value::Number(p.x)),
            "y" => self.pointer.map(|p| Value::Number(p.y)),
            "pressed" => self.pointer.map(|p| Value::Boolean(p.pressed)),
            "deltaTime" => self.delta_time.map(Value::Number),
            "otherActor" => self.other_actor.clone().map(Value::String),
            _ => self.value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_last_write_wins() {
        let mut context = Slots::from(&EventData::update(0.5));
        context.value = Some(Value::from(1.0));

        context.merge(Slots::with_value(2.0));
        assert_eq!(context.value, Some(Value::from(2.0)));
        // Empty slots do not erase
        assert_eq!(context.delta_time, Some(0.5));
    }

    #[test]
    fn test_port_slot_mapping() {
        let mut slots = Slots::default();
        assert!(slots.bind_input("a", Value::from(5.0)));
        assert!(slots.bind_input("condition", Value::from(true)));
        assert!(!slots.bind_input("exec", Value::from(true)));
        assert_eq!(slots.input_a, Some(Value::from(5.0)));
        assert_eq!(slots.condition, Some(Value::from(true)));

        slots.pointer = Some(PointerState { x: 120.0, y: 4.0, pressed: true });
        slots.value = Some(Value::from("v"));
        assert_eq!(slots.output("x"), Some(Value::from(120.0)));
        assert_eq!(slots.output("pressed"), Some(Value::from(true)));
        assert_eq!(slots.output("result"), Some(Value::from("v")));
        assert_eq!(slots.output("deltaTime"), None);
    }

    #[test]
    fn test_event_data_wire_shape() {
        let data: EventData =
            serde_json::from_str(r#"{ "otherActor": "wall_left", "otherType": "shape" }"#).unwrap();
        assert_eq!(data, EventData::collision("wall_left", Some("shape".into())));
    }
}
