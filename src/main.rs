use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Parser;
use rca_console::cli::{
    commands::run,
    config::{resolve_config, RunConfig},
    flags::Cli,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = resolve_config(&cli)?;

    init_tracing(&cfg, !cli.command.is_interactive())?;
    tracing::info!("rca-console {} starting", env!("CARGO_PKG_VERSION"));

    let outcome = run(cli, cfg).await;
    if let Err(err) = &outcome {
        tracing::error!("{:#}", err);
    }
    outcome
}

fn init_tracing(cfg: &RunConfig, stdout: bool) -> Result<()> {
    let level = match cfg.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_path = Path::new(&cfg.log_file);
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating log directory {}", parent.display()))?;
        }
    }
    if let Ok(meta) = fs::metadata(log_path) {
        if meta.len() > 1_000_000 {
            let rotated = log_path.with_extension("log.1");
            let _ = fs::rename(log_path, rotated);
        }
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(false);

    // Headless output goes to stdout, so diagnostics use stderr there.
    let console_layer = stdout.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("initializing tracing")
}
