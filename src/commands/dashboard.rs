use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::components::{
    render_banners, render_invoice_table, render_stats_cards, render_upload_widget,
    stats_summary_text, TableOptions,
};
use crate::config::AppConfig;
use crate::services::dashboard::{fetch_initial, Dashboard};
use crate::services::invoice_service::InvoiceSource;
use crate::services::state::AppState;
use crate::services::upload::{UploadEvent, UploadSnapshot, UploadWidget, RESET_DELAY};
use crate::utils::now_clock;

const REDRAW_EVERY: Duration = Duration::from_millis(500);
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const KEY_HELP: &str = "[e] fermer l'erreur  [s] fermer le succès  [q] quitter";

/// What a line typed in the live view asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    DismissError,
    DismissSuccess,
    Quit,
}

impl KeyCommand {
    pub fn parse(line: &str) -> Option<KeyCommand> {
        match line.trim().to_ascii_lowercase().as_str() {
            "e" => Some(KeyCommand::DismissError),
            "s" => Some(KeyCommand::DismissSuccess),
            "q" => Some(KeyCommand::Quit),
            _ => None,
        }
    }

    /// Applies the command. Returns false when the view should close.
    pub fn apply(self, dashboard: &mut Dashboard) -> bool {
        match self {
            KeyCommand::DismissError => dashboard.dismiss_error(),
            KeyCommand::DismissSuccess => dashboard.dismiss_success(),
            KeyCommand::Quit => return false,
        }
        true
    }
}

pub fn render_dashboard(
    config: &AppConfig,
    dashboard: &Dashboard,
    upload: &UploadSnapshot,
    inbox: Option<&Path>,
    details: bool,
) -> String {
    let mut out = format!("⚡ {} Dashboard | {}\n", config.app_title, now_clock());
    out.push_str(&format!(
        "Stats: {}\n\n",
        stats_summary_text(dashboard.stats(), dashboard.is_loading())
    ));
    out.push_str(&render_upload_widget(upload, inbox));
    out.push('\n');

    let banners = render_banners(dashboard);
    if !banners.is_empty() {
        out.push_str(&banners);
        out.push('\n');
    }

    let options = TableOptions {
        loading: dashboard.is_loading(),
        details,
        ..TableOptions::default()
    };
    out.push_str(&render_invoice_table(dashboard.invoices(), &options));
    out.push('\n');
    out.push_str(&render_stats_cards(dashboard.stats(), dashboard.is_loading()));
    out
}

/// Loads once and prints the dashboard.
pub async fn show_dashboard(state: &AppState, details: bool) -> Result<()> {
    let mut dashboard = Dashboard::new(state.config.banner_delay());
    dashboard.load(state.service.as_ref()).await;
    print!(
        "{}",
        render_dashboard(&state.config, &dashboard, &UploadSnapshot::default(), None, details)
    );
    Ok(())
}

/// Live dashboard fed by an inbox folder. Runs until Ctrl-C or `q`.
pub async fn run_dashboard(mut state: AppState, inbox: PathBuf, details: bool) -> Result<()> {
    let (dropped_tx, mut dropped_rx) = mpsc::unbounded_channel::<PathBuf>();
    state.start_inbox(inbox, dropped_tx)?;
    let inbox = state.inbox().map(Path::to_path_buf);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let widget = UploadWidget::new(state.config.max_files, event_tx);
    let upload_view = widget.subscribe();

    // One upload at a time: the widget lives on its own task and takes drops
    // in arrival order.
    let (files_tx, mut files_rx) = mpsc::unbounded_channel::<Vec<PathBuf>>();
    let worker_service = state.service.clone();
    tokio::spawn(async move {
        let mut widget = widget;
        loop {
            tokio::select! {
                paths = files_rx.recv() => match paths {
                    Some(paths) => widget.drop_files(worker_service.as_ref(), paths).await,
                    None => break,
                },
                _ = tokio::time::sleep(RESET_DELAY / 4) => {
                    widget.expire();
                }
            }
        }
    });

    let (stats_tx, mut stats_rx) = mpsc::unbounded_channel();
    let service = state.service.clone();
    let mut dashboard = Dashboard::new(state.config.banner_delay());
    let ticket = dashboard.begin_load();
    let initial = fetch_initial(service.as_ref());
    tokio::pin!(initial);
    let mut loaded = false;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut redraw = tokio::time::interval(REDRAW_EVERY);
    let mut keys = BufReader::new(tokio::io::stdin()).lines();
    let mut keys_open = true;

    loop {
        tokio::select! {
            (invoices, stats) = &mut initial, if !loaded => {
                loaded = true;
                dashboard.finish_load(ticket, invoices, stats);
            }
            Some(path) = dropped_rx.recv() => {
                tracing::info!(path = %path.display(), "File dropped in inbox");
                let _ = files_tx.send(vec![path]);
            }
            Some(event) = event_rx.recv() => match event {
                UploadEvent::FilesSelected(files) => {
                    if !files.is_empty() {
                        dashboard.on_upload_start();
                    }
                }
                UploadEvent::Succeeded(invoice) => {
                    let refresh = dashboard.on_upload_success(invoice);
                    let service = service.clone();
                    let stats_tx = stats_tx.clone();
                    tokio::spawn(async move {
                        let stats = service.invoice_stats().await;
                        let _ = stats_tx.send((refresh, stats));
                    });
                }
                UploadEvent::Failed(message) => dashboard.on_upload_error(message),
                UploadEvent::Ended => dashboard.on_upload_end(),
            },
            Some((refresh, stats)) = stats_rx.recv() => {
                dashboard.apply_stats_refresh(refresh, stats);
            }
            _ = redraw.tick() => {
                dashboard.expire_banners();
            }
            line = keys.next_line(), if keys_open => match line {
                Ok(Some(line)) => {
                    if let Some(command) = KeyCommand::parse(&line) {
                        if !command.apply(&mut dashboard) {
                            dashboard.unmount();
                            break;
                        }
                    }
                }
                Ok(None) | Err(_) => keys_open = false,
            },
            _ = &mut shutdown => {
                dashboard.unmount();
                break;
            }
        }

        let upload = upload_view.borrow().clone();
        print!(
            "{}{}{}\n",
            CLEAR_SCREEN,
            render_dashboard(&state.config, &dashboard, &upload, inbox.as_deref(), details),
            KEY_HELP
        );
    }

    tracing::info!("Dashboard closed");
    Ok(())
}
