use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod booking;
mod cli;
mod config;
mod tui;

use cli::Cli;
use config::Config;

#[tokio::main]
async fn main() {
    // Leave the alternate screen, if the form entered it, before reporting a panic
    std::panic::set_hook(Box::new(|panic_info| {
        tui::reset_terminal();
        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        std::process::exit(1);
    }));

    // A missing .env file is fine
    dotenvy::dotenv().ok();

    if let Err(e) = execute().await {
        error!("Application error: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn execute() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::init(cli.overrides()).await?;

    let log_file = if cli.is_interactive() {
        Some(config.log_file.clone().or_else(default_log_file))
    } else {
        None
    };
    init_logging(cli.debug, log_file)?;

    cli.execute(config).await
}

fn default_log_file() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("ozzirap").join("ozzirap.log"))
}

/// `log_file` is `Some` in interactive mode: `Some(None)` means nowhere to write
fn init_logging(debug: bool, log_file: Option<Option<PathBuf>>) -> Result<()> {
    let default_filter = if debug { "ozzirap=debug" } else { "ozzirap=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let writer = match log_file {
        None => BoxMakeWriter::new(std::io::stderr),
        Some(None) => BoxMakeWriter::new(std::io::sink),
        Some(Some(path)) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
            }
            let file = File::options()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}
