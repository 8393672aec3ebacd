// SPDX-License-Identifier: MIT OR Apache-2.0
//! Variables every synthesized actor starts with.

use super::scene::EntityData;
use crate::variables::VariableDefinition;
use indexmap::IndexMap;

const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Variable definitions keyed by name
pub type VariableMap = IndexMap<String, VariableDefinition>;

fn insert(map: &mut VariableMap, def: VariableDefinition) {
    map.insert(def.name.clone(), def);
}

/// Derived variables for an entity, without any category extras
pub fn default_variables(entity: &EntityData) -> VariableMap {
    let mut vars = VariableMap::new();
    insert(&mut vars, VariableDefinition::number("positionX", entity.x));
    insert(&mut vars, VariableDefinition::number("positionY", entity.y));
    insert(
        &mut vars,
        VariableDefinition::number("alpha", 1.0).with_range(Some(0.0), Some(1.0)),
    );
    insert(&mut vars, VariableDefinition::number("rotation", 0.0));
    insert(&mut vars, VariableDefinition::boolean("visible", true));

    if let Some(width) = entity.width {
        insert(&mut vars, VariableDefinition::number("width", width));
    }
    if let Some(height) = entity.height {
        insert(&mut vars, VariableDefinition::number("height", height));
    }
    if let Some(color) = &entity.color {
        insert(&mut vars, VariableDefinition::string("color", color.as_str()));
    }

    if entity.entity_type.eq_ignore_ascii_case("text") {
        insert(
            &mut vars,
            VariableDefinition::string("content", entity.content.clone().unwrap_or_default()),
        );
        insert(
            &mut vars,
            VariableDefinition::number("fontSize", entity.font_size.unwrap_or(DEFAULT_FONT_SIZE)),
        );
    } else if entity.entity_type.eq_ignore_ascii_case("button") {
        insert(
            &mut vars,
            VariableDefinition::string("text", entity.text.clone().unwrap_or_default()),
        );
    }
    vars
}

/// Merge entity-declared variables over `vars`, marking each as custom
pub fn merge_custom(vars: &mut VariableMap, entity: &EntityData) {
    let Some(custom) = &entity.variables else {
        return;
    };
    for (name, def) in custom {
        vars.insert(
            name.clone(),
            VariableDefinition {
                name: name.clone(),
                custom: true,
                ..def.clone()
            },
        );
    }
}
