//! Per-run log file setup
//!
//! Each helper writes its trace to `<outdir>/<script>.log`. [`init_logging`]
//! installs the subscriber for the current thread and hands back a
//! [`LoggingGuard`]; dropping the guard flushes the file and restores whatever
//! subscriber was active before.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

pub struct LoggingGuard {
    log_file: PathBuf,
    file: Arc<File>,
    _default: DefaultGuard,
}

impl LoggingGuard {
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
}

impl Drop for LoggingGuard {
    fn drop(&mut self) {
        let _ = self.file.sync_all();
    }
}

/// Build the filter from `RUST_LOG` when set, else from the configured level.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_logging(log_file: &Path, level: &str) -> Result<LoggingGuard> {
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;
    let file = Arc::new(file);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(Arc::clone(&file))
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .finish();

    let default = tracing::subscriber::set_default(subscriber);

    Ok(LoggingGuard {
        log_file: log_file.to_path_buf(),
        file,
        _default: default,
    })
}
