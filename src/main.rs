use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use payrush::commands;
use payrush::components::render_landing;
use payrush::config::AppConfig;
use payrush::router::Route;
use payrush::services::state::AppState;

/// PayRush: invoice tracking from the terminal
#[derive(Parser)]
#[command(name = "payrush")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a view by path ("/" or "/dashboard")
    Open {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Show invoices and statistics
    Dashboard {
        /// Watch this folder and upload files dropped into it
        #[arg(short, long)]
        inbox: Option<PathBuf>,

        /// Show file name, size and upload date columns
        #[arg(short, long)]
        details: bool,
    },

    /// Upload an invoice (only the first accepted file is sent)
    Upload {
        /// Files or folders
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Pick invoices with the native file dialog and upload the first one
    Browse,

    /// Check that the backend is reachable
    Health,

    /// Print the active configuration
    Settings,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "payrush=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command.unwrap_or(Commands::Open {
        path: "/".to_string(),
    }) {
        Commands::Open { path } => match Route::resolve(&path)? {
            Route::Landing => print!("{}", render_landing(&config.app_title)),
            Route::Dashboard => {
                let inbox = config.inbox.clone();
                dashboard(config, inbox, false).await?
            }
        },
        Commands::Dashboard { inbox, details } => {
            let inbox = inbox.or_else(|| config.inbox.clone());
            dashboard(config, inbox, details).await?
        }
        Commands::Upload { files } => {
            let state = AppState::new(config)?;
            commands::invoices::upload_files(&state, files).await?
        }
        Commands::Browse => {
            let state = AppState::new(config)?;
            commands::invoices::browse_and_upload(&state).await?
        }
        Commands::Health => {
            let state = AppState::new(config)?;
            if !commands::settings::check_health(&state).await? {
                return Err(anyhow!("Backend unreachable"));
            }
        }
        Commands::Settings => print!("{}", commands::settings::render_settings(&config)),
    }

    Ok(())
}

async fn dashboard(config: AppConfig, inbox: Option<PathBuf>, details: bool) -> Result<()> {
    let state = AppState::new(config).context("Client setup")?;
    match inbox {
        Some(folder) => commands::dashboard::run_dashboard(state, folder, details).await,
        None => commands::dashboard::show_dashboard(&state, details).await,
    }
}
