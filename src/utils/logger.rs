use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system.
///
/// `RUST_LOG` wins over `level`. When `file` is set, logs are appended there so
/// they do not draw over the terminal UI; otherwise they go to stderr.
pub fn init_logger(level: &str, file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false) // Don't show module paths
        .with_thread_ids(false)
        .with_thread_names(false)
        .compact();

    match file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer.with_ansi(false).with_writer(Mutex::new(log_file)))
                .try_init()
                .context("Logger already initialized")?;
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer.with_writer(io::stderr))
                .try_init()
                .context("Logger already initialized")?;
        }
    }

    Ok(())
}
