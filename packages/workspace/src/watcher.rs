use atelier_editor::SourceKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("Failed to create watcher: {0}")]
    CreateError(#[from] notify::Error),

    #[error("Watch error: {0}")]
    WatchError(String),
}

pub type WatcherResult<T> = Result<T, WatcherError>;

/// Watches a project directory for changes to its three source files
pub struct ProjectWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<Event>>,
}

impl ProjectWatcher {
    pub fn new(root: PathBuf) -> WatcherResult<Self> {
        if !root.is_dir() {
            return Err(WatcherError::WatchError(format!(
                "not a directory: {}",
                root.display()
            )));
        }

        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;

        watcher.watch(&root, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    /// Block until a source file changes; `None` once the watcher is gone
    pub fn next_change(&self) -> Option<Vec<SourceKind>> {
        loop {
            match self.receiver.recv() {
                Ok(Ok(event)) => {
                    let kinds = source_kinds(&event);
                    if !kinds.is_empty() {
                        return Some(kinds);
                    }
                }
                Ok(Err(e)) => tracing::warn!("Watch error: {}", e),
                Err(_) => return None,
            }
        }
    }

    /// Like [`next_change`](Self::next_change) but gives up after `timeout`
    pub fn next_change_timeout(&self, timeout: Duration) -> Option<Vec<SourceKind>> {
        loop {
            match self.receiver.recv_timeout(timeout) {
                Ok(Ok(event)) => {
                    let kinds = source_kinds(&event);
                    if !kinds.is_empty() {
                        return Some(kinds);
                    }
                }
                Ok(Err(e)) => tracing::warn!("Watch error: {}", e),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
    }
}

/// Source buffers touched by a filesystem event
fn source_kinds(event: &Event) -> Vec<SourceKind> {
    if matches!(event.kind, EventKind::Access(_)) {
        return Vec::new();
    }

    let mut kinds: Vec<SourceKind> = event
        .paths
        .iter()
        .filter_map(|path| SourceKind::from_path(path))
        .collect();
    kinds.dedup();
    kinds
}
