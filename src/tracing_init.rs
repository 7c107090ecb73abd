//! Tracing initialization for the binaries.

use std::path::Path;
use std::sync::Mutex;

/// Initialize global tracing to `<data_dir>/../memory.log`, append mode.
///
/// The MCP server owns stdout for the protocol, so logs can only go to a
/// file (or stderr as a last resort). Multiple server instances may share
/// the file, hence append.
pub fn init_file_tracing(data_dir: &Path) {
    use tracing_subscriber::EnvFilter;

    let log_dir = data_dir.parent().unwrap_or(data_dir);
    std::fs::create_dir_all(log_dir).ok();
    let log_path = log_dir.join("memory.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_ansi(false);

    match log_file {
        Ok(file) => builder.with_writer(Mutex::new(file)).init(),
        Err(_) => builder.with_writer(std::io::stderr).init(),
    }
}

/// Initialize tracing to stderr, for the one-shot CLI subcommands.
pub fn init_stderr_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
