// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playsheet runtime.
//!
//! Executes per-actor logic sheets inside a game loop:
//! - Variable store with definition defaults and clamped writes
//! - Graph synthesizer that derives actors and starter graphs from a scene
//! - Interpreter that runs event-triggered walks over live sheets
//!
//! The host drives the interpreter (`update`, `process_collision`,
//! `trigger_event`) and supplies side effects through the traits in [`host`].

pub mod actor;
pub mod commands;
pub mod config;
pub mod context;
pub mod export;
pub mod host;
pub mod interpreter;
pub mod synth;
pub mod variables;

pub use actor::{Actor, ActorCategory};
pub use commands::{EditError, SheetCommand, SheetEditor};
pub use config::{ConfigError, InterpreterConfig};
pub use context::{EventData, Slots};
pub use export::{ActorSummary, LogicSheetView};
pub use host::{
    AudioService, EntityLookup, HostServices, InputService, PointerState, SceneService,
    SharedPointer,
};
pub use interpreter::Interpreter;
pub use synth::{extract_actors, SceneConfig, Synthesizer};
pub use variables::{VariableDefinition, VariableInstance, VariableStore, VariableType};

pub use playsheet_graph as graph;
