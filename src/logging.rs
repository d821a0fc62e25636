//! Installs the global tracing subscriber used by the binaries.

use std::{error::Error, fs::OpenOptions, path::Path, sync::Arc};

use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Log to stderr at `level` and append everything at DEBUG and above to `log_file`.
///
/// Stdout is left free for command output. The `RUST_LOG` environment
/// variable, if set, adds directives on top of `level` for the stderr log.
///
/// # Errors
/// Returns an error if `log_file` cannot be opened or a global subscriber is already set.
pub fn setup_logging(level: LevelFilter, log_file: &Path) -> Result<(), Box<dyn Error>> {
    let stderr_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr)
        .with_filter(stderr_filter);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .try_init()?;

    Ok(())
}
