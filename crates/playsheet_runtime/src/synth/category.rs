// SPDX-License-Identifier: MIT OR Apache-2.0
//! Category inference from entity naming, layer and type.

use crate::actor::ActorCategory;

/// Entity-id substrings, checked in order. The first rule with a match wins.
const ID_RULES: [(&[&str], ActorCategory); 5] = [
    (&["ball", "projectile"], ActorCategory::Ball),
    (&["paddle", "player"], ActorCategory::Paddle),
    (&["enemy", "ai"], ActorCategory::Enemy),
    (&["powerup", "power"], ActorCategory::Powerup),
    (&["score", "counter"], ActorCategory::UiScore),
];

const LAYER_RULES: [(&str, ActorCategory); 3] = [
    ("BG_FAR", ActorCategory::Background),
    ("BG_NEAR", ActorCategory::Background),
    ("UI_BUTTONS", ActorCategory::UiButton),
];

const TYPE_RULES: [(&str, ActorCategory); 3] = [
    ("button", ActorCategory::UiButton),
    ("text", ActorCategory::UiText),
    ("shape", ActorCategory::Shape),
];

/// Infer a category. Id substrings outrank the layer, which outranks the
/// entity type; everything else is a sprite.
pub fn infer_category(entity_id: &str, layer: &str, entity_type: &str) -> ActorCategory {
    let id = entity_id.to_lowercase();
    let by_id = ID_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| id.contains(needle)))
        .map(|(_, category)| *category);
    let by_layer = || {
        LAYER_RULES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(layer))
            .map(|(_, category)| *category)
    };
    let by_type = || {
        TYPE_RULES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(entity_type))
            .map(|(_, category)| *category)
    };

    by_id
        .or_else(by_layer)
        .or_else(by_type)
        .unwrap_or(ActorCategory::Sprite)
}
