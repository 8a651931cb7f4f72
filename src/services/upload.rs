//! Upload widget state: file selection, the cosmetic progress animation and
//! the lifecycle events the dashboard listens to.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::models::Invoice;
use crate::services::api::read_upload_file;
use crate::services::invoice_service::{Fetched, InvoiceSource};

pub const UPLOAD_REJECTED: &str = "Échec du téléchargement. Veuillez réessayer.";
pub const ACCEPTED_EXTENSIONS: [&str; 5] = ["pdf", "png", "jpg", "jpeg", "gif"];
pub const ACCEPTED_LABEL: &str = "PDF, JPG, JPEG, PNG, GIF";

const PROGRESS_STEP: u8 = 5;
const PROGRESS_CEILING: u8 = 90;
pub const PROGRESS_TICK: Duration = Duration::from_millis(200);
pub const RESET_DELAY: Duration = Duration::from_secs(2);

/// Timer-driven progress value. It knows nothing about bytes on the wire:
/// it creeps up to a ceiling while a request is pending and jumps to 100
/// when the request succeeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressAnimation {
    value: u8,
}

impl ProgressAnimation {
    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn advance(&mut self) {
        self.value = (self.value + PROGRESS_STEP).min(PROGRESS_CEILING);
    }

    pub fn finish(&mut self) {
        self.value = 100;
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("Type de fichier non accepté")]
    UnsupportedType,
    #[error("Trop de fichiers")]
    TooManyFiles,
    #[error("Fichier illisible ({0})")]
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub name: String,
    pub reason: RejectReason,
}

/// What renderers need to draw the widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadSnapshot {
    pub uploading: bool,
    pub progress: u8,
    pub files: Vec<SelectedFile>,
    pub rejections: Vec<Rejection>,
}

/// Lifecycle notifications, in the order they are emitted for one attempt:
/// `FilesSelected`, then `Succeeded` or `Failed`, then `Ended`.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    FilesSelected(Vec<SelectedFile>),
    Succeeded(Invoice),
    Failed(Option<String>),
    Ended,
}

pub fn is_accepted(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ACCEPTED_EXTENSIONS.iter().any(|a| ext.eq_ignore_ascii_case(a)))
        .unwrap_or(false)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

pub struct UploadWidget {
    max_files: usize,
    files: Vec<SelectedFile>,
    rejections: Vec<Rejection>,
    uploading: bool,
    animation: ProgressAnimation,
    snapshot: watch::Sender<UploadSnapshot>,
    reset_at: Option<Instant>,
    events: mpsc::UnboundedSender<UploadEvent>,
}

impl UploadWidget {
    pub fn new(max_files: usize, events: mpsc::UnboundedSender<UploadEvent>) -> Self {
        let (snapshot, _) = watch::channel(UploadSnapshot::default());
        UploadWidget {
            max_files,
            files: Vec::new(),
            rejections: Vec::new(),
            uploading: false,
            animation: ProgressAnimation::default(),
            snapshot,
            reset_at: None,
            events,
        }
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn rejections(&self) -> &[Rejection] {
        &self.rejections
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn progress_value(&self) -> u8 {
        self.animation.value()
    }

    pub fn snapshot(&self) -> UploadSnapshot {
        UploadSnapshot {
            uploading: self.uploading,
            progress: self.animation.value(),
            files: self.files.clone(),
            rejections: self.rejections.clone(),
        }
    }

    /// Live view of the widget for renderers running elsewhere.
    pub fn subscribe(&self) -> watch::Receiver<UploadSnapshot> {
        self.snapshot.subscribe()
    }

    fn publish(&self) {
        self.snapshot.send_replace(self.snapshot());
    }

    fn emit(&self, event: UploadEvent) {
        let _ = self.events.send(event);
    }

    /// Applies the type filter and the file-count limit. When more files
    /// than allowed are offered, all of them are rejected.
    pub fn select(&mut self, paths: Vec<PathBuf>) -> Vec<SelectedFile> {
        let mut accepted = Vec::new();
        let mut rejections = Vec::new();

        for path in paths {
            let name = display_name(&path);
            if !is_accepted(&path) {
                rejections.push(Rejection {
                    name,
                    reason: RejectReason::UnsupportedType,
                });
                continue;
            }
            match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() => accepted.push(SelectedFile {
                    path,
                    name,
                    size: meta.len(),
                }),
                Ok(_) => rejections.push(Rejection {
                    name,
                    reason: RejectReason::Unreadable("not a file".to_string()),
                }),
                Err(err) => rejections.push(Rejection {
                    name,
                    reason: RejectReason::Unreadable(err.to_string()),
                }),
            }
        }

        if accepted.len() > self.max_files {
            rejections.extend(accepted.drain(..).map(|file| Rejection {
                name: file.name,
                reason: RejectReason::TooManyFiles,
            }));
        }

        self.files = accepted.clone();
        self.rejections = rejections;
        self.publish();
        self.emit(UploadEvent::FilesSelected(accepted.clone()));
        accepted
    }

    /// Selection followed by an immediate upload of the first accepted file.
    /// Other accepted files stay listed but are not sent.
    pub async fn drop_files<S: InvoiceSource>(&mut self, source: &S, paths: Vec<PathBuf>) {
        let accepted = self.select(paths);
        if !accepted.is_empty() {
            self.upload_first(source).await;
        }
    }

    pub async fn upload_first<S: InvoiceSource>(&mut self, source: &S) {
        let Some(first) = self.files.first().cloned() else {
            return;
        };

        self.uploading = true;
        self.reset_at = None;
        self.animation.reset();
        self.publish();

        match read_upload_file(&first.path).await {
            Ok(file) => match self.animate_until(source.upload_invoice(file)).await {
                Fetched::Ok(invoice) => {
                    self.animation.finish();
                    self.publish();
                    self.reset_at = Some(Instant::now() + RESET_DELAY);
                    self.emit(UploadEvent::Succeeded(invoice));
                }
                Fetched::Empty | Fetched::Failed(_) => {
                    self.emit(UploadEvent::Failed(Some(UPLOAD_REJECTED.to_string())));
                }
            },
            Err(err) => {
                tracing::error!(file = %first.name, error = %err, "File upload error");
                self.emit(UploadEvent::Failed(Some(err.to_string())));
            }
        }

        self.uploading = false;
        self.publish();
        self.emit(UploadEvent::Ended);
    }

    async fn animate_until<F>(&mut self, upload: F) -> Fetched<Invoice>
    where
        F: Future<Output = Fetched<Invoice>>,
    {
        tokio::pin!(upload);
        let mut ticker = tokio::time::interval_at(Instant::now() + PROGRESS_TICK, PROGRESS_TICK);
        loop {
            tokio::select! {
                biased;
                outcome = &mut upload => return outcome,
                _ = ticker.tick() => {
                    self.animation.advance();
                    self.publish();
                }
            }
        }
    }

    /// Clears the selection and the progress once the post-success delay has
    /// passed. Returns true if anything was cleared.
    pub fn expire(&mut self) -> bool {
        match self.reset_at {
            Some(deadline) if Instant::now() >= deadline => {
                self.files.clear();
                self.rejections.clear();
                self.animation.reset();
                self.publish();
                self.reset_at = None;
                true
            }
            _ => false,
        }
    }
}
