// SPDX-License-Identifier: MIT OR Apache-2.0
//! Variable store: per-actor-type definitions with global and per-instance
//! value tables.
//!
//! Every write goes through [`VariableStore::set`], which clamps numeric
//! values into the definition's `[min, max]`. There is no other write path.

use indexmap::IndexMap;
use playsheet_graph::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Declared type of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableType {
    /// f64
    Number,
    /// bool
    Boolean,
    /// String
    String,
}

/// Definition of one variable on an actor type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDefinition {
    /// Variable name. In an actor's variable map the key is the name, so it
    /// may be omitted there.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub var_type: VariableType,
    /// Default value
    pub default: Value,
    /// Lower bound for numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound for numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Whether the editor may change the value
    #[serde(default = "default_editable")]
    pub editable: bool,
    /// Declared by the scene entity rather than derived
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub custom: bool,
}

fn default_editable() -> bool {
    true
}

impl VariableDefinition {
    /// Numeric variable
    pub fn number(name: impl Into<String>, default: f64) -> Self {
        Self::new(name, VariableType::Number, Value::Number(default))
    }

    /// Boolean variable
    pub fn boolean(name: impl Into<String>, default: bool) -> Self {
        Self::new(name, VariableType::Boolean, Value::Boolean(default))
    }

    /// String variable
    pub fn string(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self::new(name, VariableType::String, Value::String(default.into()))
    }

    fn new(name: impl Into<String>, var_type: VariableType, default: Value) -> Self {
        Self {
            name: name.into(),
            var_type,
            default,
            min: None,
            max: None,
            editable: true,
            custom: false,
        }
    }

    /// Set numeric bounds
    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Apply this definition's bounds to a value.
    ///
    /// Only numbers on a `Number` definition with at least one bound are
    /// touched. NaN lands on the lower bound (or the upper one if that is all
    /// there is); `min > max` yields `max` rather than panicking.
    pub fn clamp(&self, value: Value) -> Value {
        match (self.var_type, value) {
            (VariableType::Number, Value::Number(n)) if self.min.is_some() || self.max.is_some() => {
                let mut n = if n.is_nan() {
                    self.min.or(self.max).unwrap_or(0.0)
                } else {
                    n
                };
                if let Some(min) = self.min {
                    n = n.max(min);
                }
                if let Some(max) = self.max {
                    n = n.min(max);
                }
                Value::Number(n)
            }
            (_, value) => value,
        }
    }
}

/// Current values of one actor instance, keyed by variable name
pub type VariableInstance = IndexMap<String, Value>;

/// Definitions and values for every actor type
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    definitions: HashMap<String, IndexMap<String, VariableDefinition>>,
    /// Global table keyed `actorType.varName`
    globals: HashMap<String, Value>,
}

impl VariableStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn global_key(actor_type: &str, name: &str) -> String {
        format!("{actor_type}.{name}")
    }

    /// Install or replace the definition table for an actor type and seed the
    /// global table with each default
    pub fn define_variables(
        &mut self,
        actor_type: &str,
        definitions: impl IntoIterator<Item = VariableDefinition>,
    ) {
        self.remove_type(actor_type);

        let table: IndexMap<_, _> = definitions
            .into_iter()
            .map(|def| (def.name.clone(), def))
            .collect();
        for def in table.values() {
            self.globals.insert(
                Self::global_key(actor_type, &def.name),
                def.clamp(def.default.clone()),
            );
        }

        tracing::debug!(actor_type, count = table.len(), "Defined variables");
        self.definitions.insert(actor_type.to_string(), table);
    }

    /// Drop an actor type's definitions and global values
    pub fn remove_type(&mut self, actor_type: &str) {
        if let Some(table) = self.definitions.remove(actor_type) {
            for name in table.keys() {
                self.globals.remove(&Self::global_key(actor_type, name));
            }
        }
    }

    /// Definitions of an actor type, in declaration order
    pub fn definitions(&self, actor_type: &str) -> impl Iterator<Item = &VariableDefinition> {
        self.definitions
            .get(actor_type)
            .into_iter()
            .flat_map(IndexMap::values)
    }

    /// Definition of one variable
    pub fn definition(&self, actor_type: &str, name: &str) -> Option<&VariableDefinition> {
        self.definitions.get(actor_type)?.get(name)
    }

    /// Fresh value table seeded from the definitions. Unknown types yield an
    /// empty table.
    pub fn create_instance(&self, actor_type: &str) -> VariableInstance {
        self.definitions(actor_type)
            .map(|def| (def.name.clone(), def.clamp(def.default.clone())))
            .collect()
    }

    /// Resolve a value: instance, then global table, then definition default
    pub fn get(
        &self,
        actor_type: &str,
        name: &str,
        instance: Option<&VariableInstance>,
    ) -> Option<Value> {
        instance
            .and_then(|values| values.get(name))
            .or_else(|| self.globals.get(&Self::global_key(actor_type, name)))
            .or_else(|| self.definition(actor_type, name).map(|def| &def.default))
            .cloned()
    }

    /// Write a value, clamped by the definition, into the instance if given,
    /// otherwise into the global table. Returns the value actually stored.
    pub fn set(
        &mut self,
        actor_type: &str,
        name: &str,
        value: Value,
        instance: Option<&mut VariableInstance>,
    ) -> Value {
        let value = match self.definition(actor_type, name) {
            Some(def) => def.clamp(value),
            None => value,
        };

        match instance {
            Some(values) => {
                values.insert(name.to_string(), value.clone());
            }
            None => {
                self.globals
                    .insert(Self::global_key(actor_type, name), value.clone());
            }
        }
        value
    }

    /// Flat snapshot of current values: every defined variable, then any
    /// extra keys present only on the instance
    pub fn serialize(
        &self,
        actor_type: &str,
        instance: Option<&VariableInstance>,
    ) -> IndexMap<String, Value> {
        let mut out = IndexMap::new();
        for def in self.definitions(actor_type) {
            if let Some(value) = self.get(actor_type, &def.name, instance) {
                out.insert(def.name.clone(), value);
            }
        }
        if let Some(values) = instance {
            for (name, value) in values {
                if !out.contains_key(name) {
                    out.insert(name.clone(), value.clone());
                }
            }
        }
        out
    }

    /// Restore values with repeated [`set`](Self::set) calls, so bounds apply
    pub fn deserialize(
        &mut self,
        actor_type: &str,
        values: &IndexMap<String, Value>,
        mut instance: Option<&mut VariableInstance>,
    ) {
        for (name, value) in values {
            self.set(actor_type, name, value.clone(), instance.as_deref_mut());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn paddle_defs() -> Vec<VariableDefinition> {
        vec![
            VariableDefinition::number("positionX", 10.0).with_range(Some(0.0), Some(320.0)),
            VariableDefinition::number("alpha", 1.0).with_range(Some(0.0), Some(1.0)),
            VariableDefinition::boolean("visible", true),
            VariableDefinition::string("label", "P1"),
        ]
    }

    fn store() -> VariableStore {
        let mut store = VariableStore::new();
        store.define_variables("paddle", paddle_defs());
        store
    }

    #[test]
    fn test_get_falls_back_instance_global_default() {
        let mut store = store();
        let mut instance = store.create_instance("paddle");

        assert_eq!(store.get("paddle", "positionX", None), Some(Value::Number(10.0)));

        store.set("paddle", "positionX", Value::Number(50.0), None);
        assert_eq!(store.get("paddle", "positionX", None), Some(Value::Number(50.0)));
        // The instance was seeded before the global write and keeps its value
        assert_eq!(
            store.get("paddle", "positionX", Some(&instance)),
            Some(Value::Number(10.0))
        );

        instance.shift_remove("positionX");
        assert_eq!(
            store.get("paddle", "positionX", Some(&instance)),
            Some(Value::Number(50.0))
        );

        assert_eq!(store.get("paddle", "missing", Some(&instance)), None);
        assert_eq!(store.get("ghost", "positionX", None), None);
    }

    #[test]
    fn test_set_clamps_instance_writes() {
        let mut store = store();
        let mut instance = store.create_instance("paddle");

        let stored = store.set("paddle", "positionX", Value::Number(999.0), Some(&mut instance));
        assert_eq!(stored, Value::Number(320.0));
        assert_eq!(instance["positionX"], Value::Number(320.0));

        store.set("paddle", "alpha", Value::Number(-3.0), Some(&mut instance));
        assert_eq!(instance["alpha"], Value::Number(0.0));
    }

    #[test]
    fn test_clamp_edge_cases() {
        let def = VariableDefinition::number("x", 0.0).with_range(Some(-1.0), Some(1.0));
        assert_eq!(def.clamp(Value::Number(f64::NAN)), Value::Number(-1.0));
        assert_eq!(def.clamp(Value::Number(f64::INFINITY)), Value::Number(1.0));
        assert_eq!(def.clamp(Value::from("text")), Value::from("text"));

        let only_max = VariableDefinition::number("y", 0.0).with_range(None, Some(5.0));
        assert_eq!(only_max.clamp(Value::Number(f64::NAN)), Value::Number(5.0));
        assert_eq!(only_max.clamp(Value::Number(-50.0)), Value::Number(-50.0));

        let inverted = VariableDefinition::number("z", 0.0).with_range(Some(10.0), Some(2.0));
        assert_eq!(inverted.clamp(Value::Number(5.0)), Value::Number(2.0));
    }

    #[test]
    fn test_defaults_are_clamped_on_define() {
        let mut store = VariableStore::new();
        store.define_variables(
            "ball",
            [VariableDefinition::number("speed", 500.0).with_range(None, Some(300.0))],
        );
        assert_eq!(store.get("ball", "speed", None), Some(Value::Number(300.0)));
        assert_eq!(store.create_instance("ball")["speed"], Value::Number(300.0));
    }

    #[test]
    fn test_untouched_instance_serializes_to_defaults() {
        let store = store();
        let instance = store.create_instance("paddle");
        let snapshot = store.serialize("paddle", Some(&instance));

        let expected: IndexMap<String, Value> = paddle_defs()
            .into_iter()
            .map(|def| (def.name, def.default))
            .collect();
        assert_eq!(snapshot, expected);
    }

    #[test]
    fn test_deserialize_applies_bounds() {
        let mut store = store();
        let mut instance = store.create_instance("paddle");

        let mut saved = IndexMap::new();
        saved.insert("positionX".to_string(), Value::Number(-40.0));
        saved.insert("visible".to_string(), Value::Boolean(false));
        store.deserialize("paddle", &saved, Some(&mut instance));

        assert_eq!(instance["positionX"], Value::Number(0.0));
        assert_eq!(instance["visible"], Value::Boolean(false));
    }

    #[test]
    fn test_redefine_replaces_table() {
        let mut store = store();
        store.define_variables("paddle", [VariableDefinition::number("speed", 3.0)]);
        assert_eq!(store.get("paddle", "positionX", None), None);
        assert_eq!(store.definitions("paddle").count(), 1);

        store.remove_type("paddle");
        assert_eq!(store.get("paddle", "speed", None), None);
    }

    #[test]
    fn test_definition_wire_shape() {
        let json = serde_json::json!({ "type": "Number", "default": 1, "min": 0, "max": 1 });
        let def: VariableDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(def.var_type, VariableType::Number);
        assert!(def.editable);
        assert!(!def.custom);
        assert_eq!(def.max, Some(1.0));
    }

    proptest! {
        #[test]
        fn prop_set_then_get_is_clamped(
            raw in proptest::num::f64::ANY,
            lo in -1000.0f64..1000.0,
            span in 0.0f64..1000.0,
        ) {
            let hi = lo + span;
            let mut store = VariableStore::new();
            store.define_variables(
                "probe",
                [VariableDefinition::number("n", lo).with_range(Some(lo), Some(hi))],
            );
            let mut instance = store.create_instance("probe");

            store.set("probe", "n", Value::Number(raw), Some(&mut instance));
            store.set("probe", "n", Value::Number(raw), None);

            for read in [
                store.get("probe", "n", Some(&instance)),
                store.get("probe", "n", None),
            ] {
                let n = read.and_then(|v| v.as_f64()).unwrap();
                prop_assert!(n >= lo && n <= hi, "{n} outside [{lo}, {hi}]");
            }
        }
    }
}
