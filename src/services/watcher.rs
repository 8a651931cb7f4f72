use anyhow::Result;
use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::time::{Duration, SystemTime};
use tokio::sync::mpsc;

use crate::services::upload::is_accepted;

const DEBOUNCE_MS: u64 = 700;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEventKind {
    Created,
    Modified,
    Deleted,
}

#[derive(Debug, Clone)]
pub struct FileEvent {
    pub path: PathBuf,
    pub kind: FileEventKind,
}

/// Drop zone backed by a folder: files of an accepted type that land in it
/// are forwarded once their size has settled.
pub struct InboxWatcher {
    _watcher: RecommendedWatcher,
    folder: PathBuf,
}

impl InboxWatcher {
    pub fn start(folder: PathBuf, dropped: mpsc::UnboundedSender<PathBuf>) -> Result<Self> {
        let (tx, rx) = std_mpsc::channel();
        let watcher = create_watcher(&folder, tx)?;

        std::thread::spawn(move || {
            let mut forwarded: HashMap<PathBuf, (u64, Option<SystemTime>)> = HashMap::new();
            for event in rx {
                if let Some(path) = settle(event, &mut forwarded) {
                    if dropped.send(path).is_err() {
                        break;
                    }
                }
            }
        });

        tracing::info!(folder = %folder.display(), "Watching inbox");
        Ok(InboxWatcher {
            _watcher: watcher,
            folder,
        })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

fn create_watcher(
    path: &Path,
    tx: std_mpsc::Sender<FileEvent>,
) -> notify::Result<RecommendedWatcher> {
    let mut watcher = recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res {
            let kind = match event.kind {
                EventKind::Create(_) => FileEventKind::Created,
                EventKind::Modify(_) => FileEventKind::Modified,
                EventKind::Remove(_) => FileEventKind::Deleted,
                _ => return,
            };
            for path in event.paths {
                if is_accepted(&path) {
                    let _ = tx.send(FileEvent {
                        path,
                        kind: kind.clone(),
                    });
                }
            }
        }
    })?;

    watcher.watch(path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Waits for the file to stop growing and drops repeats of a file that was
/// already forwarded unchanged.
fn settle(
    event: FileEvent,
    forwarded: &mut HashMap<PathBuf, (u64, Option<SystemTime>)>,
) -> Option<PathBuf> {
    if event.kind == FileEventKind::Deleted {
        forwarded.remove(&event.path);
        tracing::debug!(path = %event.path.display(), "Inbox file removed");
        return None;
    }
    if !debounce_file_event(&event.path, DEBOUNCE_MS) {
        return None;
    }
    let metadata = std::fs::metadata(&event.path).ok()?;
    let fingerprint = (metadata.len(), metadata.modified().ok());
    if forwarded.get(&event.path) == Some(&fingerprint) {
        return None;
    }
    forwarded.insert(event.path.clone(), fingerprint);
    Some(event.path)
}

pub fn debounce_file_event(path: &Path, debounce_ms: u64) -> bool {
    let mut last_size = None;
    for _ in 0..3 {
        std::thread::sleep(Duration::from_millis(debounce_ms));
        if let Ok(metadata) = std::fs::metadata(path) {
            let size = metadata.len();
            if Some(size) == last_size {
                return size > 0;
            }
            last_size = Some(size);
        } else {
            return false;
        }
    }
    last_size.unwrap_or(0) > 0
}
