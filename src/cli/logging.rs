//! Logging initialization

use std::path::PathBuf;

/// Initialize logging based on debug flag.
/// Returns the log file path if debug logging is enabled.
///
/// Logs go to a file so the terminal UI keeps stdout/stderr to itself.
pub fn init_logging(debug: bool) -> anyhow::Result<Option<PathBuf>> {
    if !debug {
        return Ok(None);
    }

    let log_path = tempfile::Builder::new()
        .prefix("dockhand-")
        .suffix(".log")
        .tempfile()
        .and_then(|f| f.keep().map_err(|e| e.error))
        .map(|(_, path)| path)
        .unwrap_or_else(|_| std::env::temp_dir().join(format!("dockhand-{}.log", std::process::id())));

    let file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&log_path)
        .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", log_path.display(), e))?;

    tracing_subscriber::fmt()
        .with_writer(file)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    Ok(Some(log_path))
}
