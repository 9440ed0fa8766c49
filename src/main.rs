//! CLI entry point for the add-on installer.

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use addon_installer::display::ProgressDisplay;
use addon_installer::download::HttpClient;
use addon_installer::install::{InstallOptions, Installer};
use addon_installer::resolver::build_resolver;

mod app_config;
mod cli;
mod deferred_log;

use cli::Args;
use deferred_log::DeferredLog;

/// Prefix of every progress line.
const PROGRESS_PREFIX: &str = "Installing";

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let stderr_log = init_tracing(&args)?;
    debug!(?args, "CLI arguments parsed");

    // Configuration errors end the process before any request is made.
    let config = app_config::load_config(&args.conf)?;
    debug!(?config, "configuration loaded");
    if args.noop {
        info!("NOOP mode: archives are fetched but not extracted");
    }

    let resolver = build_resolver(config.source, config.base_url.as_deref());
    let client =
        HttpClient::new_with_timeouts(config.connect_timeout_secs(), config.read_timeout_secs());
    let options = InstallOptions::new(&config.addons_path).with_noop(args.noop);

    println!("From {}", resolver.base_url());
    let display = Arc::new(ProgressDisplay::stdout(PROGRESS_PREFIX));
    let installer = Installer::new(client, resolver, display, options);

    // Terminal logs wait until the progress lines are final.
    if let Some(log) = &stderr_log {
        log.hold();
    }
    let report = installer.run(&config.addons).await;
    if let Some(log) = &stderr_log
        && let Err(e) = log.release()
    {
        warn!(error = %e, "failed to write deferred log output");
    }

    // Per-add-on failures are reported on their lines and in the log only.
    debug!(failed = report.failed(), "exiting");
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// Priority: `RUST_LOG` env var > quiet flag > verbose flag > default (warn)
///
/// Returns the stderr sink when logs go to the terminal, so the caller can
/// hold them back while progress lines are being redrawn.
fn init_tracing(args: &Args) -> Result<Option<DeferredLog<io::Stderr>>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_log_level()));

    match &args.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            let _ = tracing_subscriber::fmt()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_env_filter(filter)
                .try_init();
            Ok(None)
        }
        None => {
            let log = DeferredLog::stderr();
            let _ = tracing_subscriber::fmt()
                .with_writer(log.clone())
                .with_ansi(io::stderr().is_terminal())
                .with_env_filter(filter)
                .try_init();
            Ok(Some(log))
        }
    }
}
