//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over the configured level. The terminal UI logs to a file
//! so output never lands on the alternate screen.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use pedigree_core::LogConfig;

fn filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Log to stderr (one-shot commands and the server).
pub fn init_stderr(config: &LogConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(config))
        .with_writer(std::io::stderr)
        .init();
}

/// Log to the configured file, creating its directory if needed.
pub fn init_file(config: &LogConfig) -> Result<()> {
    let path = config.file_path();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(config))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::info!("Logging to {}", path.display());
    Ok(())
}
