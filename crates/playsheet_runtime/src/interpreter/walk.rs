// SPDX-License-Identifier: MIT OR Apache-2.0
//! Depth-first walks over a logic sheet.

use super::nodes::{self, NodeEnv};
use crate::config::{InterpreterConfig, MAX_WALK_DEPTH_LIMIT};
use crate::context::Slots;
use playsheet_graph::library::{BRANCH_FALSE, BRANCH_TRUE};
use playsheet_graph::{FlowOp, LogicSheet, NodeKind, Value};
use std::collections::HashMap;

/// Input ports that bind a slot
const DATA_INPUTS: [&str; 4] = ["value", "condition", "a", "b"];

/// Connection index over arena positions
pub(crate) struct SheetIndex<'s> {
    /// `(source, output)` to every `(target, input)`, in declaration order
    adjacency: HashMap<(usize, &'s str), Vec<(usize, &'s str)>>,
    /// `(target, input)` to its first source in declaration order
    incoming: HashMap<(usize, &'s str), (usize, &'s str)>,
}

impl<'s> SheetIndex<'s> {
    /// Index every connection whose endpoints both exist
    pub fn build(sheet: &'s LogicSheet, actor_id: &str) -> Self {
        let mut adjacency: HashMap<_, Vec<_>> = HashMap::new();
        let mut incoming = HashMap::new();

        for connection in sheet.connections() {
            let from = sheet.node_index(connection.from.node_id.as_str());
            let to = sheet.node_index(connection.to.node_id.as_str());
            let (Some(from), Some(to)) = (from, to) else {
                tracing::warn!(
                    actor = actor_id,
                    connection = %connection.id,
                    "Skipping dangling connection"
                );
                continue;
            };
            let output = connection.from.output_id.as_str();
            let input = connection.to.input_id.as_str();
            adjacency.entry((from, output)).or_default().push((to, input));
            incoming.entry((to, input)).or_insert((from, output));
        }

        Self {
            adjacency,
            incoming,
        }
    }

    fn targets(&self, node: usize, output: &'s str) -> &[(usize, &'s str)] {
        self.adjacency
            .get(&(node, output))
            .map_or(&[], Vec::as_slice)
    }

    fn source(&self, node: usize, input: &'s str) -> Option<(usize, &'s str)> {
        self.incoming.get(&(node, input)).copied()
    }
}

/// How a walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WalkOutcome {
    pub steps: usize,
    pub aborted: bool,
}

/// One walk from one event node
pub(crate) struct Walk<'w, 's> {
    sheet: &'s LogicSheet,
    index: &'w SheetIndex<'s>,
    limits: &'w InterpreterConfig,
    env: NodeEnv<'w>,
    /// Results of nodes already executed in this walk
    results: HashMap<usize, Slots>,
    steps: usize,
    aborted: bool,
}

impl<'w, 's> Walk<'w, 's> {
    pub fn new(
        sheet: &'s LogicSheet,
        index: &'w SheetIndex<'s>,
        limits: &'w InterpreterConfig,
        env: NodeEnv<'w>,
    ) -> Self {
        Self {
            sheet,
            index,
            limits,
            env,
            results: HashMap::new(),
            steps: 0,
            aborted: false,
        }
    }

    pub fn run(mut self, entry: usize, context: Slots) -> WalkOutcome {
        self.visit(entry, &context, 1);
        WalkOutcome {
            steps: self.steps,
            aborted: self.aborted,
        }
    }

    fn visit(&mut self, index: usize, context: &Slots, depth: usize) {
        if self.aborted {
            return;
        }
        // Configs built in code skip validation, so the ceiling applies here too
        let max_depth = self.limits.max_walk_depth.min(MAX_WALK_DEPTH_LIMIT);
        if depth > max_depth || self.steps >= self.limits.max_walk_steps {
            self.aborted = true;
            tracing::warn!(
                actor = self.env.actor_id,
                depth,
                steps = self.steps,
                "Walk aborted at guard limit"
            );
            return;
        }

        let sheet = self.sheet;
        let Some(node) = sheet.node_at(index) else {
            return;
        };
        self.steps += 1;

        let mut local = context.clone();
        self.bind_inputs(index, &mut local);

        let (result, branch) = match node.kind {
            NodeKind::Flow(FlowOp::Branch) => {
                let taken = self.branch_condition(index, context, &local);
                let port = if taken { BRANCH_TRUE } else { BRANCH_FALSE };
                (Slots::default(), Some(port))
            }
            _ => (nodes::evaluate(node, &local, &mut self.env), None),
        };
        tracing::debug!(
            actor = self.env.actor_id,
            node = %node.id,
            kind = %node.kind,
            depth,
            "Executed node"
        );

        let mut next = context.clone();
        next.merge(result.clone());
        self.results.insert(index, result);

        let graph = self.index;
        match branch {
            Some(port) => {
                for &(target, _) in graph.targets(index, port) {
                    self.visit(target, &next, depth + 1);
                }
            }
            None => {
                for port in node.execution_outputs() {
                    for &(target, _) in graph.targets(index, port.as_str()) {
                        self.visit(target, &next, depth + 1);
                    }
                }
            }
        }
    }

    /// Bind data inputs from nodes this walk has already executed
    fn bind_inputs(&self, index: usize, local: &mut Slots) {
        for input in DATA_INPUTS {
            let Some((source, output)) = self.index.source(index, input) else {
                continue;
            };
            if let Some(value) = self.results.get(&source).and_then(|r| r.output(output)) {
                local.bind_input(input, value);
            }
        }
    }

    fn branch_condition(&mut self, index: usize, context: &Slots, local: &Slots) -> bool {
        match &local.condition {
            Some(condition) => condition.truthy(),
            None => self
                .resolve_condition(index, context)
                .is_some_and(|value| value.truthy()),
        }
    }

    /// Evaluate whatever is wired into a branch's `condition`, in isolation.
    ///
    /// The source's own inputs are not bound and nothing is cached, so a
    /// source feeding several branches runs once per branch. A branch as the
    /// source yields nothing.
    fn resolve_condition(&mut self, index: usize, context: &Slots) -> Option<Value> {
        let (source, output) = self.index.source(index, "condition")?;
        let sheet = self.sheet;
        let node = sheet.node_at(source)?;
        let result = nodes::evaluate(node, context, &mut self.env);
        result.output(output)
    }
}
