//! Command line and environment configuration shared by the binaries.

use std::path::PathBuf;

use clap::Args;
use tracing_subscriber::filter::LevelFilter;

/// Where the database lives, which timezone "today" is in, and how much to log.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct Config {
    /// File path to the application SQLite database.
    #[arg(long, env = "FINANCE_DB_PATH", default_value = "finance.db")]
    pub db_path: PathBuf,

    /// Canonical timezone name used to decide today's date, e.g. "Pacific/Auckland".
    #[arg(long, env = "FINANCE_TIMEZONE", default_value = "Etc/UTC")]
    pub timezone: String,

    /// The most detailed level to log to stderr: off, error, warn, info, debug or trace.
    #[arg(long, env = "FINANCE_LOG_LEVEL", default_value = "info")]
    pub log_level: LevelFilter,

    /// File that every log line at DEBUG and above is appended to.
    #[arg(long, default_value = "debug.log")]
    pub log_file: PathBuf,
}
