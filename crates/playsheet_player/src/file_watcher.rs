// SPDX-License-Identifier: MIT OR Apache-2.0
//! File system watcher for sheet files and edit scripts.
//!
//! Wraps a debounced `notify` watcher and hands out changed paths through a
//! channel that the player polls between frames.

use notify_debouncer_full::{
    new_debouncer,
    notify::{self, EventKind, RecommendedWatcher, RecursiveMode},
    DebounceEventResult, Debouncer, RecommendedCache,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

/// Events emitted by the file watcher
#[derive(Debug, Clone, PartialEq)]
pub enum FileEvent {
    /// A file was created or modified
    Changed(PathBuf),
    /// A file was deleted
    Removed(PathBuf),
    /// The watcher reported an error
    Error(String),
}

/// Configuration for the file watcher
#[derive(Debug, Clone)]
pub struct FileWatcherConfig {
    /// Debounce duration for events
    pub debounce_duration: Duration,
    /// Whether to watch directories recursively
    pub recursive: bool,
    /// File extensions to watch (empty = watch all)
    pub extensions: HashSet<String>,
}

impl Default for FileWatcherConfig {
    fn default() -> Self {
        Self {
            debounce_duration: Duration::from_millis(250),
            recursive: true,
            extensions: HashSet::new(),
        }
    }
}

impl FileWatcherConfig {
    /// Watch the file types hot reload understands
    pub fn for_sheets() -> Self {
        Self {
            extensions: ["json", "ron"].into_iter().map(String::from).collect(),
            ..Self::default()
        }
    }

    /// Whether a path passes the extension filter
    pub fn accepts(&self, path: &Path) -> bool {
        self.extensions.is_empty()
            || path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| self.extensions.contains(&e.to_lowercase()))
    }
}

/// Debounced watcher over one or more directories
pub struct FileWatcher {
    debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
    event_rx: Receiver<FileEvent>,
    watched_dirs: HashSet<PathBuf>,
    config: FileWatcherConfig,
}

impl FileWatcher {
    /// Create a new file watcher with the given configuration
    pub fn new(config: FileWatcherConfig) -> Result<Self, notify::Error> {
        let (event_tx, event_rx) = mpsc::channel();
        let filter = config.clone();

        let debouncer = new_debouncer(
            config.debounce_duration,
            None,
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    for event in events {
                        let paths = event.paths.iter().filter(|p| filter.accepts(p)).cloned();
                        match event.kind {
                            EventKind::Create(_) | EventKind::Modify(_) => {
                                for path in paths {
                                    let _ = event_tx.send(FileEvent::Changed(path));
                                }
                            }
                            EventKind::Remove(_) => {
                                for path in paths {
                                    let _ = event_tx.send(FileEvent::Removed(path));
                                }
                            }
                            EventKind::Any | EventKind::Access(_) | EventKind::Other => {}
                        }
                    }
                }
                Err(errors) => {
                    for error in errors {
                        let _ = event_tx.send(FileEvent::Error(error.to_string()));
                    }
                }
            },
        )?;

        Ok(Self {
            debouncer,
            event_rx,
            watched_dirs: HashSet::new(),
            config,
        })
    }

    /// Watcher for sheet and edit files
    pub fn for_sheets() -> Result<Self, notify::Error> {
        Self::new(FileWatcherConfig::for_sheets())
    }

    /// Watch a directory for changes
    pub fn watch(&mut self, path: impl AsRef<Path>) -> Result<(), notify::Error> {
        let path = path.as_ref().to_path_buf();
        let mode = if self.config.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };

        self.debouncer.watch(&path, mode)?;
        tracing::info!("Watching directory for changes: {:?}", path);
        self.watched_dirs.insert(path);
        Ok(())
    }

    /// Check if a directory is being watched
    pub fn is_watching(&self, path: &Path) -> bool {
        self.watched_dirs.contains(path)
    }

    /// Poll for pending file events (non-blocking)
    pub fn poll_events(&self) -> Vec<FileEvent> {
        let mut events = Vec::new();
        loop {
            match self.event_rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("File watcher channel disconnected");
                    break;
                }
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = FileWatcherConfig::default();
        assert!(config.recursive);
        assert!(config.extensions.is_empty());
        assert!(config.accepts(Path::new("anything.txt")));
    }

    #[test]
    fn test_config_for_sheets() {
        let config = FileWatcherConfig::for_sheets();
        assert!(config.accepts(Path::new("ball.sheet.json")));
        assert!(config.accepts(Path::new("ball.sheet.RON")));
        assert!(!config.accepts(Path::new("ball.png")));
        assert!(!config.accepts(Path::new("Makefile")));
    }

    #[test]
    fn test_watch_registers_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut watcher = FileWatcher::for_sheets().unwrap();
        watcher.watch(dir.path()).unwrap();
        assert!(watcher.is_watching(dir.path()));
        assert!(watcher.poll_events().is_empty());
    }
}
