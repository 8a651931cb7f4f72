use anyhow::{anyhow, Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::components::{render_invoice_table, render_upload_widget, TableOptions};
use crate::services::dashboard::UPLOAD_ERROR;
use crate::services::state::{expand_paths, AppState};
use crate::services::upload::{UploadEvent, UploadWidget, ACCEPTED_EXTENSIONS};

/// Runs the upload widget on the given paths. Folders are expanded to the
/// files they contain; only the first accepted file is sent.
pub async fn upload_files(state: &AppState, paths: Vec<PathBuf>) -> Result<()> {
    let paths = expand_paths(paths);
    if paths.is_empty() {
        return Err(anyhow!("No file to upload"));
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut widget = UploadWidget::new(state.config.max_files, event_tx);
    let mut view = widget.subscribe();

    let printer = tokio::spawn(async move {
        while view.changed().await.is_ok() {
            let snapshot = view.borrow_and_update().clone();
            if snapshot.uploading {
                print!("\rTéléchargement... {}%", snapshot.progress);
                let _ = std::io::stdout().flush();
            }
        }
    });

    widget.drop_files(state.service.as_ref(), paths).await;
    let snapshot = widget.snapshot();
    drop(widget);
    let _ = printer.await;
    println!();
    print!("{}", render_upload_widget(&snapshot, None));

    let mut outcome = Err(anyhow!("Aucun fichier accepté"));
    while let Ok(event) = event_rx.try_recv() {
        match event {
            UploadEvent::Succeeded(invoice) => {
                println!("Facture téléchargée avec succès : {}", invoice.filename);
                print!(
                    "{}",
                    render_invoice_table(
                        std::slice::from_ref(&invoice),
                        &TableOptions {
                            details: true,
                            ..TableOptions::default()
                        }
                    )
                );
                outcome = Ok(());
            }
            UploadEvent::Failed(message) => {
                outcome = Err(anyhow!(message.unwrap_or_else(|| UPLOAD_ERROR.to_string())));
            }
            UploadEvent::FilesSelected(_) | UploadEvent::Ended => {}
        }
    }
    outcome
}

/// Native multi-file picker restricted to the accepted formats.
pub async fn browse_and_upload(state: &AppState) -> Result<()> {
    let selection = tokio::task::spawn_blocking(|| {
        rfd::FileDialog::new()
            .set_title("Parcourir les fichiers")
            .add_filter("Factures", &ACCEPTED_EXTENSIONS[..])
            .pick_files()
    })
    .await
    .context("File dialog")?;

    match selection {
        Some(paths) if !paths.is_empty() => upload_files(state, paths).await,
        _ => {
            println!("Aucun fichier sélectionné");
            Ok(())
        }
    }
}
