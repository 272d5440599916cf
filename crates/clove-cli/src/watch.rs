//! File watcher feeding incremental rebuilds.
//!
//! Events from `notify` are filtered to source files, debounced per path and
//! forwarded over a tokio channel.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::Result;
use crate::scan::is_source_file;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }

    fn from_event(kind: &EventKind, path: &Path) -> Option<Self> {
        let path = path.to_path_buf();
        match kind {
            EventKind::Create(_) => Some(FileChange::Created(path)),
            EventKind::Modify(_) => Some(FileChange::Modified(path)),
            EventKind::Remove(_) => Some(FileChange::Removed(path)),
            _ => None,
        }
    }
}

/// Watches every root until dropped.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    roots: Vec<PathBuf>,
}

impl FileWatcher {
    /// Watch `roots` (directories recursively, files on their own).
    ///
    /// Repeated events for the same path within `debounce` are dropped.
    pub fn new(roots: &[PathBuf], debounce: Duration) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let mut last_event: Option<(PathBuf, Instant)> = None;
        let watched = roots.to_vec();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };
            for path in &event.paths {
                if should_ignore(path, &watched) {
                    continue;
                }

                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == path && now.duration_since(*last_time) < debounce {
                        continue;
                    }
                }

                let Some(change) = FileChange::from_event(&event.kind, path) else {
                    continue;
                };
                last_event = Some((path.clone(), now));
                // The receiver is gone once the watch loop stops.
                let _ = tx.blocking_send(change);
            }
        })?;

        for root in roots {
            let mode = if root.is_dir() {
                RecursiveMode::Recursive
            } else {
                RecursiveMode::NonRecursive
            };
            watcher.watch(root, mode)?;
            debug!(root = %root.display(), "watching");
        }

        Ok((
            Self {
                _watcher: watcher,
                roots: roots.to_vec(),
            },
            rx,
        ))
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

/// Non-sources, paths outside every root and anything hidden below a root.
fn should_ignore(path: &Path, roots: &[PathBuf]) -> bool {
    if !is_source_file(path) {
        return true;
    }
    let Some(relative) = roots
        .iter()
        .find_map(|root| path.strip_prefix(root).ok())
    else {
        return true;
    };
    relative.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots() -> Vec<PathBuf> {
        vec![PathBuf::from("/home/.me/project")]
    }

    #[test]
    fn test_should_ignore_non_sources() {
        let roots = roots();
        assert!(should_ignore(Path::new("/home/.me/project/styles.css"), &roots));
        assert!(should_ignore(Path::new("/home/.me/project/a.js.map"), &roots));
        assert!(!should_ignore(Path::new("/home/.me/project/a.js"), &roots));
        assert!(!should_ignore(Path::new("/home/.me/project/lib/b.ts"), &roots));
    }

    #[test]
    fn test_should_ignore_hidden_below_root() {
        let roots = roots();
        assert!(should_ignore(Path::new("/home/.me/project/.git/x.js"), &roots));
        assert!(should_ignore(Path::new("/home/.me/project/src/.cache/a.js"), &roots));
    }

    #[test]
    fn test_should_ignore_outside_roots() {
        assert!(should_ignore(Path::new("/elsewhere/a.js"), &roots()));
    }

    #[test]
    fn test_file_change_from_event() {
        let path = PathBuf::from("/project/src/index.js");
        let create = EventKind::Create(notify::event::CreateKind::File);
        assert_eq!(
            FileChange::from_event(&create, &path),
            Some(FileChange::Created(path.clone()))
        );
        let remove = EventKind::Remove(notify::event::RemoveKind::File);
        assert_eq!(
            FileChange::from_event(&remove, &path).map(|c| c.path().to_path_buf()),
            Some(path.clone())
        );
        assert_eq!(FileChange::from_event(&EventKind::Any, &path), None);
    }
}
