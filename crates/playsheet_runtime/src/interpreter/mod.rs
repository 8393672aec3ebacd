// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph interpreter: owns the live sheets of registered actors and runs them
//! when events fire.
//!
//! ## Walks
//!
//! Triggering an event starts one walk per matching event node. A walk is a
//! depth-first traversal along execution edges. At each node, data inputs are
//! bound from nodes this walk already executed, the node runs, and its result
//! is merged into the context handed to every successor. A branch follows only
//! its `true` or `false` output; when nothing is bound to its condition it
//! evaluates the node wired into `condition` on the spot.
//!
//! Sheets may contain cycles. Walks stop at the depth and step limits in
//! [`InterpreterConfig`].

mod nodes;
mod walk;

use crate::actor::Actor;
use crate::commands::{EditError, SheetEditor};
use crate::config::InterpreterConfig;
use crate::context::{EventData, Slots};
use crate::export::{ActorSummary, LogicSheetView};
use crate::host::HostServices;
use crate::variables::{VariableInstance, VariableStore};
use indexmap::IndexMap;
use nodes::NodeEnv;
use playsheet_graph::{EventKind, LogicSheet, Node, NodeKind, Value};
use walk::{SheetIndex, Walk};

/// A registered actor and its live variable values
#[derive(Debug)]
struct LiveActor {
    actor: Actor,
    instance: VariableInstance,
}

/// The graph interpreter
#[derive(Debug, Default)]
pub struct Interpreter {
    /// Registered actors, in registration order
    actors: IndexMap<String, LiveActor>,
    variables: VariableStore,
    host: HostServices,
    config: InterpreterConfig,
}

impl Interpreter {
    /// Create an interpreter with default limits
    pub fn new(host: HostServices) -> Self {
        Self::with_config(host, InterpreterConfig::default())
    }

    /// Create an interpreter with explicit limits
    pub fn with_config(host: HostServices, config: InterpreterConfig) -> Self {
        Self {
            actors: IndexMap::new(),
            variables: VariableStore::new(),
            host,
            config,
        }
    }

    /// Host services
    pub fn host_mut(&mut self) -> &mut HostServices {
        &mut self.host
    }

    /// Walk limits
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Variable store
    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    /// Register an actor: install its variable definitions, seed a fresh
    /// instance, and take ownership of its sheet. Registering an id again
    /// replaces the previous registration.
    pub fn register_actor(&mut self, actor: Actor) {
        if self.actors.contains_key(&actor.id) {
            tracing::warn!(actor = %actor.id, "Actor already registered, replacing");
        }
        if let Some(node) = actor.logic_sheet.find_execution_cycle() {
            tracing::warn!(actor = %actor.id, node = %node, "Logic sheet has an execution cycle");
        }

        self.variables
            .define_variables(&actor.id, actor.variable_definitions());
        let instance = self.variables.create_instance(&actor.id);

        tracing::info!(
            actor = %actor.id,
            category = %actor.category,
            nodes = actor.logic_sheet.node_count(),
            "Registered actor"
        );
        self.actors
            .insert(actor.id.clone(), LiveActor { actor, instance });
    }

    /// Unregister an actor. Returns false if it was not registered.
    pub fn unregister_actor(&mut self, actor_id: &str) -> bool {
        match self.actors.shift_remove(actor_id) {
            Some(_) => {
                self.variables.remove_type(actor_id);
                tracing::info!(actor = actor_id, "Unregistered actor");
                true
            }
            None => false,
        }
    }

    /// Whether an actor is registered
    pub fn is_registered(&self, actor_id: &str) -> bool {
        self.actors.contains_key(actor_id)
    }

    /// Registered actor ids, in registration order
    pub fn actor_ids(&self) -> impl Iterator<Item = &str> {
        self.actors.keys().map(String::as_str)
    }

    /// A registered actor
    pub fn actor(&self, actor_id: &str) -> Option<&Actor> {
        self.actors.get(actor_id).map(|live| &live.actor)
    }

    /// Fire an event on one actor. Returns the number of walks started.
    pub fn trigger_event(&mut self, actor_id: &str, event_type: &str, event: &EventData) -> usize {
        let Some(live) = self.actors.get_mut(actor_id) else {
            tracing::warn!(actor = actor_id, event = event_type, "Event for unknown actor");
            return 0;
        };

        let sheet = &live.actor.logic_sheet;
        let entries: Vec<usize> = sheet
            .nodes()
            .enumerate()
            .filter(|(_, node)| node.is_event(event_type) && event_filter_matches(node, event))
            .map(|(index, _)| index)
            .collect();
        if entries.is_empty() {
            return 0;
        }

        let index = SheetIndex::build(sheet, actor_id);
        for &entry in &entries {
            let env = NodeEnv {
                actor_id,
                variables: &mut self.variables,
                instance: &mut live.instance,
                host: &mut self.host,
            };
            let outcome = Walk::new(sheet, &index, &self.config, env).run(entry, Slots::from(event));
            tracing::debug!(
                actor = actor_id,
                event = event_type,
                steps = outcome.steps,
                aborted = outcome.aborted,
                "Walk finished"
            );
        }
        entries.len()
    }

    /// Fire `OnUpdate` on every registered actor, in registration order
    pub fn update(&mut self, delta_time: f64) {
        let ids: Vec<String> = self.actors.keys().cloned().collect();
        let event = EventData::update(delta_time);
        for id in &ids {
            self.trigger_event(id, EventKind::OnUpdate.as_str(), &event);
        }
    }

    /// Fire `OnCollision` on each registered participant, naming the other.
    /// An unregistered participant is only named, never triggered, and its
    /// type is unknown. Returns the number of walks started.
    pub fn process_collision(&mut self, actor_a: &str, actor_b: &str) -> usize {
        let mut walks = 0;
        for (this, other) in [(actor_a, actor_b), (actor_b, actor_a)] {
            if !self.is_registered(this) {
                continue;
            }
            let other_type = self.actor(other).map(|actor| actor.entity_type.clone());
            let event = EventData::collision(other, other_type);
            walks += self.trigger_event(this, EventKind::OnCollision.as_str(), &event);
        }
        walks
    }

    /// Current value of an actor's variable
    pub fn get_variable(&self, actor_id: &str, name: &str) -> Option<Value> {
        let instance = self.actors.get(actor_id).map(|live| &live.instance);
        self.variables.get(actor_id, name, instance)
    }

    /// Write an actor's variable, clamped. Returns the stored value, or
    /// `None` if the actor is not registered.
    pub fn set_variable(&mut self, actor_id: &str, name: &str, value: Value) -> Option<Value> {
        let Some(live) = self.actors.get_mut(actor_id) else {
            tracing::warn!(actor = actor_id, variable = name, "Write to unknown actor");
            return None;
        };
        Some(
            self.variables
                .set(actor_id, name, value, Some(&mut live.instance)),
        )
    }

    /// Snapshot of an actor's current variable values
    pub fn variable_snapshot(&self, actor_id: &str) -> Option<IndexMap<String, Value>> {
        let live = self.actors.get(actor_id)?;
        Some(self.variables.serialize(actor_id, Some(&live.instance)))
    }

    /// Summaries of all registered actors
    pub fn export_actor_list(&self) -> Vec<ActorSummary> {
        self.actors
            .values()
            .map(|live| ActorSummary::from(&live.actor))
            .collect()
    }

    /// Full live graph of one actor
    pub fn export_logic_sheet(&self, actor_id: &str) -> Option<LogicSheetView> {
        self.actor(actor_id).map(LogicSheetView::from)
    }
}

impl SheetEditor for Interpreter {
    fn sheet_mut(&mut self, actor_id: &str) -> Result<&mut LogicSheet, EditError> {
        self.actors
            .get_mut(actor_id)
            .map(|live| &mut live.actor.logic_sheet)
            .ok_or_else(|| EditError::UnknownActor(actor_id.to_string()))
    }
}

/// `OnCollision` nodes only fire when `targetTag` matches the other actor's
/// type or id, case-insensitively, as a substring. No tag, or nothing known
/// about the other actor, always matches.
fn event_filter_matches(node: &Node, event: &EventData) -> bool {
    if !matches!(node.kind, NodeKind::Event(EventKind::OnCollision)) {
        return true;
    }
    let Some(tag) = node.property_str("targetTag").filter(|tag| !tag.is_empty()) else {
        return true;
    };
    let candidates = [event.other_type.as_deref(), event.other_actor.as_deref()];
    if candidates.iter().all(Option::is_none) {
        return true;
    }
    let tag = tag.to_lowercase();
    candidates
        .into_iter()
        .flatten()
        .any(|candidate| candidate.to_lowercase().contains(&tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorCategory;
    use crate::host::recording::{HostCall, Recorder};
    use crate::host::{PointerState, SharedPointer};
    use crate::synth::{SceneConfig, Synthesizer};
    use crate::variables::VariableDefinition;
    use playsheet_graph::{
        ActionKind, Connection, ConnectionId, FlowOp, LogicOp, SheetError, VariableOp,
    };

    fn actor(id: &str, nodes: Vec<Node>, connections: &[(&str, &str, &str, &str)]) -> Actor {
        let mut sheet = LogicSheet::from_parts(nodes, vec![]).unwrap();
        for &(from, output, to, input) in connections {
            sheet.connect_ports(from, output, to, input).unwrap();
        }
        Actor {
            id: id.to_string(),
            category: ActorCategory::Sprite,
            entity_type: "sprite".into(),
            layer: "SPRITES".into(),
            sprite_ref: None,
            variables: [
                ("score".to_string(), VariableDefinition::number("", 0.0).with_range(Some(0.0), Some(10.0))),
                ("flag".to_string(), VariableDefinition::boolean("", false)),
            ]
            .into_iter()
            .collect(),
            logic_sheet: sheet,
        }
    }

    fn interpreter() -> (Interpreter, Recorder, SharedPointer) {
        let recorder = Recorder::default();
        let pointer = SharedPointer::default();
        (Interpreter::new(recorder.services(&pointer)), recorder, pointer)
    }

    fn scene(entities: serde_json::Value) -> SceneConfig {
        serde_json::from_value(serde_json::json!({
            "states": { "main": { "layers": { "SPRITES": entities } } }
        }))
        .unwrap()
    }

    fn register_scene(interp: &mut Interpreter, entities: serde_json::Value) {
        for actor in Synthesizer::from_scene(&scene(entities)).into_actors() {
            interp.register_actor(actor);
        }
    }

    #[test]
    fn test_paddle_follows_pointer() {
        let (mut interp, _, pointer) = interpreter();
        register_scene(&mut interp, serde_json::json!([{ "id": "player_paddle", "type": "sprite", "x": 0, "y": 0 }]));

        pointer.set(PointerState::at(120.0, 0.0));
        interp.update(0.016);
        assert_eq!(interp.get_variable("player_paddle", "positionX"), Some(Value::Number(120.0)));
    }

    #[test]
    fn test_ball_flips_on_wall_and_beeps_on_paddle() {
        let (mut interp, recorder, _) = interpreter();
        register_scene(
            &mut interp,
            serde_json::json!([
                { "id": "ball", "type": "sprite", "x": 5, "y": 5 },
                { "id": "wall_left", "type": "shape", "x": 0, "y": 0 },
                { "id": "player_paddle", "type": "sprite", "x": 0, "y": 0 }
            ]),
        );

        assert_eq!(interp.get_variable("ball", "directionY"), Some(Value::Number(1.0)));
        interp.process_collision("ball", "wall_left");
        assert_eq!(interp.get_variable("ball", "directionY"), Some(Value::Number(-1.0)));
        assert!(recorder.calls().is_empty());

        interp.process_collision("player_paddle", "ball");
        assert_eq!(recorder.calls().len(), 1);
        assert!(matches!(recorder.calls()[0], HostCall::Beep { .. }));
        assert_eq!(interp.get_variable("ball", "directionY"), Some(Value::Number(-1.0)));
    }

    #[test]
    fn test_collision_with_unregistered_participant() {
        let (mut interp, recorder, _) = interpreter();
        register_scene(
            &mut interp,
            serde_json::json!([{ "id": "ball", "type": "sprite", "x": 5, "y": 5 }]),
        );

        // Only the id is known, and "wall_left" satisfies the Wall tag
        assert_eq!(interp.process_collision("wall_left", "ball"), 1);
        assert_eq!(interp.get_variable("ball", "directionY"), Some(Value::Number(-1.0)));
        assert!(!interp.is_registered("wall_left"));
        assert_eq!(interp.get_variable("wall_left", "directionY"), None);

        // An unknown type does not make a tag match vacuously
        assert_eq!(interp.process_collision("ball", "ghost"), 0);
        assert_eq!(interp.get_variable("ball", "directionY"), Some(Value::Number(-1.0)));
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_collision_tag_matching() {
        let (mut interp, _, _) = interpreter();
        let flip = Node::new("flip", NodeKind::Action(ActionKind::FlipVariable))
            .with_property("variable", "flag");
        let hit = Node::new("hit", NodeKind::Event(EventKind::OnCollision))
            .with_property("targetTag", "WALL");
        interp.register_actor(actor("probe", vec![hit, flip], &[("hit", "exec", "flip", "exec")]));

        let by_type = EventData::collision("x1", Some("wall".into()));
        assert_eq!(interp.trigger_event("probe", "OnCollision", &by_type), 1);
        let miss = EventData::collision("coin", Some("sprite".into()));
        assert_eq!(interp.trigger_event("probe", "OnCollision", &miss), 0);
        // Nothing known about the other actor: the tag is vacuously satisfied
        assert_eq!(interp.trigger_event("probe", "OnCollision", &EventData::none()), 1);
        assert_eq!(interp.get_variable("probe", "flag"), Some(Value::Boolean(false)));
    }

    #[test]
    fn test_branch_resolves_condition_backward() {
        let (mut interp, _, _) = interpreter();
        let nodes = vec![
            Node::new("start", NodeKind::Event(EventKind::OnStart)),
            Node::new("gt", NodeKind::Logic(LogicOp::GreaterThan))
                .with_property("a", 5.0)
                .with_property("b", 3.0),
            Node::new("branch", NodeKind::Flow(FlowOp::Branch)),
            Node::new("yes", NodeKind::Action(ActionKind::SetVariable))
                .with_property("variable", "score")
                .with_property("value", 1.0),
            Node::new("no", NodeKind::Action(ActionKind::SetVariable))
                .with_property("variable", "score")
                .with_property("value", 2.0),
        ];
        interp.register_actor(actor(
            "probe",
            nodes,
            &[
                ("start", "exec", "branch", "exec"),
                ("gt", "value", "branch", "condition"),
                ("branch", "true", "yes", "exec"),
                ("branch", "false", "no", "exec"),
            ],
        ));

        interp.trigger_event("probe", "OnStart", &EventData::none());
        assert_eq!(interp.get_variable("probe", "score"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_branch_without_condition_is_false() {
        let (mut interp, _, _) = interpreter();
        let nodes = vec![
            Node::new("start", NodeKind::Event(EventKind::OnStart)),
            Node::new("branch", NodeKind::Flow(FlowOp::Branch)),
            Node::new("no", NodeKind::Action(ActionKind::FlipVariable)).with_property("variable", "flag"),
        ];
        interp.register_actor(actor(
            "probe",
            nodes,
            &[("start", "exec", "branch", "exec"), ("branch", "false", "no", "exec")],
        ));
        interp.trigger_event("probe", "OnStart", &EventData::none());
        assert_eq!(interp.get_variable("probe", "flag"), Some(Value::Boolean(true)));
    }

    #[test]
    fn test_data_edges_bind_from_executed_nodes() {
        let (mut interp, _, pointer) = interpreter();
        pointer.set(PointerState { x: 1.0, y: 2.0, pressed: true });
        let nodes = vec![
            Node::new("start", NodeKind::Event(EventKind::OnStart)),
            Node::new("input", NodeKind::Variable(VariableOp::GetInput)),
            Node::new("set", NodeKind::Variable(VariableOp::SetVariable))
                .with_property("variable", "flag")
                .with_property("value", false),
            Node::new("after", NodeKind::Action(ActionKind::SetVariable))
                .with_property("variable", "score")
                .with_property("value", 4.0),
        ];
        interp.register_actor(actor(
            "probe",
            nodes,
            &[
                ("start", "exec", "input", "exec"),
                ("input", "exec", "set", "exec"),
                ("input", "pressed", "set", "value"),
                ("set", "exec", "after", "exec"),
            ],
        ));

        interp.trigger_event("probe", "OnStart", &EventData::none());
        assert_eq!(interp.get_variable("probe", "flag"), Some(Value::Boolean(true)));
        // The bound input stays local to "set"; "after" falls back to its own value
        assert_eq!(interp.get_variable("probe", "score"), Some(Value::Number(4.0)));
    }

    #[test]
    fn test_cycle_terminates_at_guard() {
        let config = InterpreterConfig {
            max_walk_depth: 63,
            max_walk_steps: 500,
        };
        let mut interp = Interpreter::with_config(HostServices::new(), config);
        let nodes = vec![
            Node::new("start", NodeKind::Event(EventKind::OnStart)),
            Node::new("a", NodeKind::Action(ActionKind::FlipVariable)).with_property("variable", "flag"),
            Node::new("b", NodeKind::Action(ActionKind::Custom)),
        ];
        interp.register_actor(actor(
            "loop",
            nodes,
            &[
                ("start", "exec", "a", "exec"),
                ("a", "exec", "b", "exec"),
                ("b", "exec", "a", "exec"),
            ],
        ));

        assert_eq!(interp.trigger_event("loop", "OnStart", &EventData::none()), 1);
        // "a" ran at depths 2, 4, .. 62 before the depth guard stopped the walk
        assert_eq!(interp.get_variable("loop", "flag"), Some(Value::Boolean(true)));

        // The actor stays usable and the next walk starts from a fresh budget
        assert_eq!(interp.trigger_event("loop", "OnStart", &EventData::none()), 1);
        assert_eq!(interp.get_variable("loop", "flag"), Some(Value::Boolean(false)));
    }

    #[test]
    fn test_unrecognized_node_passes_through() {
        let (mut interp, _, _) = interpreter();
        let mut legacy = Node::new("legacy", NodeKind::parse("Timer", "Every"));
        legacy.inputs = vec![playsheet_graph::Port::exec_in()];
        legacy.outputs = vec![playsheet_graph::Port::exec_out("exec", "Exec")];
        let nodes = vec![
            Node::new("start", NodeKind::Event(EventKind::OnStart)),
            legacy,
            Node::new("flip", NodeKind::Action(ActionKind::FlipVariable)).with_property("variable", "flag"),
        ];
        interp.register_actor(actor(
            "probe",
            nodes,
            &[("start", "exec", "legacy", "exec"), ("legacy", "exec", "flip", "exec")],
        ));
        interp.trigger_event("probe", "OnStart", &EventData::none());
        assert_eq!(interp.get_variable("probe", "flag"), Some(Value::Boolean(true)));
    }

    #[test]
    fn test_dangling_connections_are_skipped() {
        let (mut interp, _, _) = interpreter();
        let sheet = LogicSheet::from_parts(
            vec![
                Node::new("start", NodeKind::Event(EventKind::OnStart)),
                Node::new("flip", NodeKind::Action(ActionKind::FlipVariable)).with_property("variable", "flag"),
            ],
            vec![
                Connection::new(ConnectionId::positional(0), "start", "exec", "gone", "exec"),
                Connection::new(ConnectionId::positional(1), "start", "exec", "flip", "exec"),
            ],
        )
        .unwrap();
        let mut probe = actor("probe", vec![], &[]);
        probe.logic_sheet = sheet;
        interp.register_actor(probe);

        interp.trigger_event("probe", "OnStart", &EventData::none());
        assert_eq!(interp.get_variable("probe", "flag"), Some(Value::Boolean(true)));
    }

    #[test]
    fn test_update_runs_in_registration_order() {
        let (mut interp, recorder, _) = interpreter();
        for id in ["first", "second"] {
            let nodes = vec![
                Node::new("tick", NodeKind::Event(EventKind::OnUpdate)),
                Node::new("go", NodeKind::Action(ActionKind::SwitchState)).with_property("state", id),
            ];
            interp.register_actor(actor(id, nodes, &[("tick", "exec", "go", "exec")]));
        }
        interp.update(0.1);
        assert_eq!(
            recorder.calls(),
            vec![HostCall::SwitchState("first".into()), HostCall::SwitchState("second".into())]
        );
    }

    #[test]
    fn test_register_replace_and_unregister() {
        let (mut interp, _, _) = interpreter();
        interp.register_actor(actor("probe", vec![], &[]));
        interp.set_variable("probe", "score", Value::Number(99.0));
        assert_eq!(interp.get_variable("probe", "score"), Some(Value::Number(10.0)));

        interp.register_actor(actor("probe", vec![], &[]));
        assert_eq!(interp.get_variable("probe", "score"), Some(Value::Number(0.0)));
        assert_eq!(interp.actor_ids().collect::<Vec<_>>(), ["probe"]);

        assert!(interp.unregister_actor("probe"));
        assert!(!interp.unregister_actor("probe"));
        assert_eq!(interp.get_variable("probe", "score"), None);
        assert_eq!(interp.set_variable("probe", "score", Value::Number(1.0)), None);
        assert_eq!(interp.trigger_event("probe", "OnStart", &EventData::none()), 0);
    }

    #[test]
    fn test_live_edits() {
        let (mut interp, _, _) = interpreter();
        interp.register_actor(actor(
            "probe",
            vec![Node::new("start", NodeKind::Event(EventKind::OnStart))],
            &[],
        ));

        let flip = Node::new("flip", NodeKind::Action(ActionKind::FlipVariable));
        interp.add_node("probe", flip).unwrap();
        let conn = interp
            .add_connection("probe", Connection::new(ConnectionId::default(), "start", "exec", "flip", "exec"))
            .unwrap();
        let mut props = playsheet_graph::Properties::new();
        props.insert("variable".into(), "flag".into());
        interp.update_node_properties("probe", "flip", props).unwrap();

        interp.trigger_event("probe", "OnStart", &EventData::none());
        assert_eq!(interp.get_variable("probe", "flag"), Some(Value::Boolean(true)));

        interp.remove_connection("probe", conn.as_str()).unwrap();
        interp.add_connection("probe", Connection::new(ConnectionId::default(), "start", "exec", "flip", "exec")).unwrap();
        interp.remove_node("probe", "flip").unwrap();
        let view = interp.export_logic_sheet("probe").unwrap();
        assert!(view.connections.is_empty());

        assert_eq!(
            interp.add_node("ghost", Node::new("n", NodeKind::Flow(FlowOp::Delay))),
            Err(EditError::UnknownActor("ghost".into()))
        );
        assert_eq!(
            interp.add_connection("probe", Connection::new(ConnectionId::default(), "start", "exec", "start", "exec")),
            Err(EditError::Sheet(SheetError::PortNotFound { node: "start".into(), port: "exec".into() }))
        );
    }

    #[test]
    fn test_hot_reload_is_all_or_nothing() {
        let (mut interp, _, _) = interpreter();
        interp.register_actor(actor(
            "probe",
            vec![Node::new("start", NodeKind::Event(EventKind::OnStart))],
            &[],
        ));

        let broken = serde_json::json!({
            "nodes": [
                { "id": "a", "type": "Event", "subtype": "OnStart" },
                { "id": "a", "type": "Event", "subtype": "OnClick" }
            ]
        });
        assert!(serde_json::from_value::<LogicSheet>(broken).is_err());
        assert_eq!(interp.export_logic_sheet("probe").unwrap().nodes.len(), 1);

        let replacement = LogicSheet::from_parts(
            vec![Node::new("click", NodeKind::Event(EventKind::OnClick))],
            vec![],
        )
        .unwrap();
        assert_eq!(
            interp.update_logic_sheet("ghost", replacement.clone()),
            Err(EditError::UnknownActor("ghost".into()))
        );
        interp.update_logic_sheet("probe", replacement).unwrap();
        assert_eq!(interp.trigger_event("probe", "OnStart", &EventData::none()), 0);
        assert_eq!(interp.trigger_event("probe", "OnClick", &EventData::none()), 1);
    }

    #[test]
    fn test_exports() {
        let (mut interp, _, _) = interpreter();
        register_scene(
            &mut interp,
            serde_json::json!([{ "id": "ball", "type": "sprite", "x": 0, "y": 0 }]),
        );
        let list = interp.export_actor_list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].category, ActorCategory::Ball);
        assert_eq!(list[0].node_count, 5);
        assert_eq!(list[0].connection_count, 2);

        let snapshot = interp.variable_snapshot("ball").unwrap();
        assert_eq!(snapshot["speed"], Value::Number(200.0));
        assert!(interp.export_logic_sheet("nobody").is_none());
    }
}
