// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hot reload of logic sheets while the player runs.
//!
//! Two kinds of file are understood in the watched directory:
//! - `<actorId>.sheet.json` / `<actorId>.sheet.ron` replace that actor's sheet
//! - `*.edits.json` hold an array of sheet commands applied in order
//!
//! A reload that fails is logged and the running sheets stay as they were.

use crate::file_watcher::{FileEvent, FileWatcher};
use indexmap::IndexSet;
use playsheet_graph::LogicSheet;
use playsheet_runtime::{EditError, SheetCommand, SheetEditor};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

const SHEET_JSON_SUFFIX: &str = ".sheet.json";
const SHEET_RON_SUFFIX: &str = ".sheet.ron";
const EDITS_SUFFIX: &str = ".edits.json";

/// What a changed file means for the running sheets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadTarget {
    /// Whole-sheet replacement for one actor
    Sheet {
        /// Actor named by the file stem
        actor_id: String,
        /// RON rather than JSON
        ron: bool,
    },
    /// A batch of edit commands
    Edits,
}

impl ReloadTarget {
    /// Classify a path by its file name
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let lower = name.to_ascii_lowercase();

        if lower.ends_with(EDITS_SUFFIX) {
            return Some(Self::Edits);
        }
        let (suffix, ron) = if lower.ends_with(SHEET_JSON_SUFFIX) {
            (SHEET_JSON_SUFFIX, false)
        } else if lower.ends_with(SHEET_RON_SUFFIX) {
            (SHEET_RON_SUFFIX, true)
        } else {
            return None;
        };

        let actor_id = &name[..name.len() - suffix.len()];
        if actor_id.is_empty() {
            return None;
        }
        Some(Self::Sheet {
            actor_id: actor_id.to_string(),
            ron,
        })
    }
}

/// Error reloading one file
#[derive(Debug, Error)]
pub enum ReloadError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid JSON, or JSON that is not a valid sheet
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid RON, or RON that is not a valid sheet
    #[error("Invalid RON: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// The editor rejected the change
    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Result of reloading one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A sheet was replaced
    Replaced {
        /// Actor whose sheet changed
        actor_id: String,
    },
    /// An edit batch was processed
    Applied {
        /// Commands that succeeded
        applied: usize,
        /// Commands that were rejected
        failed: usize,
    },
    /// The file is not something hot reload handles
    Ignored,
}

/// Reload one file into `editor`.
///
/// A sheet file is parsed and validated completely before the running sheet
/// is touched. Commands in an edit batch are independent: a rejected command
/// is logged and the rest still run.
pub fn reload_path(
    path: &Path,
    editor: &mut impl SheetEditor,
) -> Result<ReloadOutcome, ReloadError> {
    let Some(target) = ReloadTarget::from_path(path) else {
        return Ok(ReloadOutcome::Ignored);
    };

    let content = std::fs::read_to_string(path)?;
    match target {
        ReloadTarget::Sheet { actor_id, ron } => {
            let sheet: LogicSheet = if ron {
                ron::from_str(&content)?
            } else {
                serde_json::from_str(&content)?
            };
            editor.update_logic_sheet(&actor_id, sheet)?;
            Ok(ReloadOutcome::Replaced { actor_id })
        }
        ReloadTarget::Edits => {
            let commands: Vec<SheetCommand> = serde_json::from_str(&content)?;
            let mut applied = 0;
            let mut failed = 0;
            for command in commands {
                let name = command.name();
                let actor_id = command.actor_id().to_string();
                match command.apply(editor) {
                    Ok(()) => applied += 1,
                    Err(err) => {
                        failed += 1;
                        tracing::warn!(%actor_id, command = name, %err, "Edit command rejected");
                    }
                }
            }
            Ok(ReloadOutcome::Applied { applied, failed })
        }
    }
}

/// Statistics for hot reload operations
#[derive(Debug, Clone, Default)]
pub struct HotReloadStats {
    /// Files reloaded successfully
    pub total_reloaded: usize,
    /// Files that failed to reload
    pub failed: usize,
    /// Last successful reload time
    pub last_reload: Option<Instant>,
}

/// Watches a directory and feeds changed files into an editor
pub struct HotReloader {
    watcher: FileWatcher,
    stats: HotReloadStats,
}

impl HotReloader {
    /// Start watching `dir`
    pub fn watch(dir: &Path) -> Result<Self, notify::Error> {
        let mut watcher = FileWatcher::for_sheets()?;
        watcher.watch(dir)?;
        Ok(Self {
            watcher,
            stats: HotReloadStats::default(),
        })
    }

    /// Apply every change seen since the last poll. Returns the number of
    /// files reloaded successfully.
    pub fn poll(&mut self, editor: &mut impl SheetEditor) -> usize {
        let mut changed: IndexSet<PathBuf> = IndexSet::new();
        for event in self.watcher.poll_events() {
            match event {
                FileEvent::Changed(path) => {
                    changed.insert(path);
                }
                FileEvent::Removed(path) => {
                    tracing::debug!("Ignoring removed file: {:?}", path);
                }
                FileEvent::Error(err) => tracing::warn!("File watcher error: {err}"),
            }
        }

        let mut reloaded = 0;
        for path in changed {
            match reload_path(&path, editor) {
                Ok(ReloadOutcome::Ignored) => {}
                Ok(outcome) => {
                    tracing::info!("Hot reloaded {:?}: {:?}", path, outcome);
                    self.stats.total_reloaded += 1;
                    self.stats.last_reload = Some(Instant::now());
                    reloaded += 1;
                }
                Err(err) => {
                    tracing::warn!("Hot reload of {:?} failed: {err}", path);
                    self.stats.failed += 1;
                }
            }
        }
        reloaded
    }

    /// Get statistics
    pub fn stats(&self) -> &HotReloadStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playsheet_graph::{ActionKind, EventKind, Node, NodeKind};
    use playsheet_runtime::{Interpreter, SceneConfig, Synthesizer};

    fn interpreter() -> Interpreter {
        let scene = SceneConfig::from_json(
            r#"{ "states": { "play": { "layers": { "SPRITES": [
                { "id": "hero", "type": "sprite", "x": 0, "y": 0 }
            ] } } } }"#,
        )
        .unwrap();
        let mut interpreter = Interpreter::default();
        for actor in Synthesizer::from_scene(&scene).into_actors() {
            interpreter.register_actor(actor);
        }
        interpreter
    }

    fn jump_sheet() -> LogicSheet {
        let mut sheet = LogicSheet::new();
        sheet
            .add_node(Node::new("start", NodeKind::Event(EventKind::OnUpdate)))
            .unwrap();
        sheet
            .add_node(
                Node::new("jump", NodeKind::Action(ActionKind::Move))
                    .with_property("dy", -10.0),
            )
            .unwrap();
        sheet.connect_ports("start", "exec", "jump", "exec").unwrap();
        sheet
    }

    #[test]
    fn test_targets_from_file_names() {
        assert_eq!(
            ReloadTarget::from_path(Path::new("/w/ball.sheet.json")),
            Some(ReloadTarget::Sheet {
                actor_id: "ball".into(),
                ron: false
            })
        );
        assert_eq!(
            ReloadTarget::from_path(Path::new("player_paddle.sheet.ron")),
            Some(ReloadTarget::Sheet {
                actor_id: "player_paddle".into(),
                ron: true
            })
        );
        assert_eq!(
            ReloadTarget::from_path(Path::new("batch-3.edits.json")),
            Some(ReloadTarget::Edits)
        );
        assert_eq!(ReloadTarget::from_path(Path::new(".sheet.json")), None);
        assert_eq!(ReloadTarget::from_path(Path::new("scene.json")), None);
    }

    #[test]
    fn test_sheet_file_replaces_running_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hero.sheet.json");
        std::fs::write(&path, serde_json::to_string(&jump_sheet()).unwrap()).unwrap();

        let mut interpreter = interpreter();
        let outcome = reload_path(&path, &mut interpreter).unwrap();
        assert_eq!(outcome, ReloadOutcome::Replaced { actor_id: "hero".into() });

        interpreter.update(0.5);
        assert_eq!(
            interpreter.get_variable("hero", "positionY"),
            Some(playsheet_graph::Value::Number(-5.0))
        );
    }

    #[test]
    fn test_ron_sheet_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hero.sheet.ron");
        std::fs::write(&path, ron::to_string(&jump_sheet()).unwrap()).unwrap();

        let mut interpreter = interpreter();
        reload_path(&path, &mut interpreter).unwrap();
        assert_eq!(interpreter.actor("hero").unwrap().logic_sheet.node_count(), 2);
    }

    #[test]
    fn test_invalid_sheet_keeps_old_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hero.sheet.json");
        let mut interpreter = interpreter();
        let before = interpreter.actor("hero").unwrap().logic_sheet.clone();

        std::fs::write(&path, "{ \"nodes\": [").unwrap();
        assert!(matches!(
            reload_path(&path, &mut interpreter),
            Err(ReloadError::Json(_))
        ));

        let mut nodes = serde_json::to_value(&jump_sheet()).unwrap();
        let first = nodes["nodes"][0].clone();
        nodes["nodes"].as_array_mut().unwrap().push(first);
        std::fs::write(&path, nodes.to_string()).unwrap();
        assert!(matches!(
            reload_path(&path, &mut interpreter),
            Err(ReloadError::Json(_))
        ));

        assert_eq!(interpreter.actor("hero").unwrap().logic_sheet, before);
    }

    #[test]
    fn test_unknown_actor_sheet_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ghost.sheet.json");
        std::fs::write(&path, serde_json::to_string(&jump_sheet()).unwrap()).unwrap();

        let result = reload_path(&path, &mut interpreter());
        assert!(matches!(
            result,
            Err(ReloadError::Edit(EditError::UnknownActor(_)))
        ));
    }

    #[test]
    fn test_edit_batch_applies_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweak.edits.json");

        let beep = Node::new("beep", NodeKind::Action(ActionKind::PlaySound));
        let edits = serde_json::json!([
            { "command": "addNode", "actorId": "hero", "node": beep },
            { "command": "removeNode", "actorId": "hero", "nodeId": "missing" },
            { "command": "updateNodeProperties", "actorId": "hero", "nodeId": "beep",
              "properties": { "frequency": 660 } },
            { "command": "addNode", "actorId": "ghost", "node": beep }
        ]);
        std::fs::write(&path, edits.to_string()).unwrap();

        let mut interpreter = interpreter();
        let outcome = reload_path(&path, &mut interpreter).unwrap();
        assert_eq!(outcome, ReloadOutcome::Applied { applied: 2, failed: 2 });

        let sheet = &interpreter.actor("hero").unwrap().logic_sheet;
        assert_eq!(sheet.node("beep").unwrap().property_f64("frequency"), Some(660.0));
        assert_eq!(sheet.node_count(), 2);
    }

    #[test]
    fn test_other_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(&path, "not even json").unwrap();
        assert_eq!(
            reload_path(&path, &mut interpreter()).unwrap(),
            ReloadOutcome::Ignored
        );
    }

    #[test]
    fn test_reloader_starts_idle() {
        let dir = tempfile::tempdir().unwrap();
        let mut reloader = HotReloader::watch(dir.path()).unwrap();
        assert_eq!(reloader.poll(&mut interpreter()), 0);
        assert_eq!(reloader.stats().total_reloaded, 0);
        assert_eq!(reloader.stats().failed, 0);
    }
}
