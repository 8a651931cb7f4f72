use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::services::api::ApiClient;
use crate::services::invoice_service::InvoiceService;
use crate::services::watcher::InboxWatcher;

pub struct AppState {
    pub config: AppConfig,
    pub service: Arc<InvoiceService>,
    watcher: Option<InboxWatcher>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = ApiClient::new(&config)?;
        Ok(AppState {
            config,
            service: Arc::new(InvoiceService::new(client)),
            watcher: None,
        })
    }

    /// Replaces any running inbox watcher with one on `folder`.
    pub fn start_inbox(
        &mut self,
        folder: PathBuf,
        dropped: mpsc::UnboundedSender<PathBuf>,
    ) -> Result<()> {
        self.watcher = None;
        std::fs::create_dir_all(&folder)?;
        self.watcher = Some(InboxWatcher::start(folder, dropped)?);
        Ok(())
    }

    pub fn inbox(&self) -> Option<&Path> {
        self.watcher.as_ref().map(|w| w.folder())
    }
}

/// Expands folders into the files they directly contain. Nothing is filtered
/// here, so the widget can report every file it refuses.
pub fn expand_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut expanded = Vec::new();
    for path in paths {
        if path.is_dir() {
            expanded.extend(scan_folder(&path));
        } else {
            expanded.push(path);
        }
    }
    expanded
}

pub fn scan_folder(folder: &Path) -> Vec<PathBuf> {
    let mut entries = walkdir::WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.path().to_path_buf())
        .collect::<Vec<_>>();
    entries.sort();
    entries
}
