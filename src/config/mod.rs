//! Command-line parsing and validation helpers.

#[cfg(test)]
mod tests;
mod validation;

use clap::Parser;
use std::path::PathBuf;

/// Default LIRC character device to capture from.
pub const DEFAULT_LIRC_DEVICE: &str = "/dev/lirc0";

/// Upper bound for --timeout-secs so a forgotten flag can't hang a session
/// for hours.
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// CLI options for the irdecode capture session. Validated values keep the
/// spawned capture utility safe.
#[derive(Debug, Parser, Clone)]
#[command(
    about = "Capture IR remote signals with mode2 and write a RAW_CODES lircd config",
    author,
    version
)]
pub struct AppConfig {
    /// LIRC device to capture from
    #[arg(long = "lirc-device", default_value = DEFAULT_LIRC_DEVICE)]
    pub lirc_device: String,

    /// Name of the remote control (use <location>.<device_type> with --database)
    #[arg(long, short = 'r')]
    pub remote: String,

    /// Keep raw mode2 output, one file per command, under this base path
    #[arg(long = "output-raw")]
    pub output_raw: Option<PathBuf>,

    /// Overwrite the config file instead of extending its commands
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// SQLite database receiving one lookup row per captured command
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Stop a capture after this many seconds (0 = wait for Ctrl-C)
    #[arg(long = "timeout-secs", default_value_t = 0)]
    pub timeout_secs: u64,

    /// Capture utility command line (split shell-style, may carry extra flags)
    #[arg(long = "mode2-cmd", env = "IRDECODE_MODE2_CMD", default_value = "mode2")]
    pub mode2_cmd: String,

    /// Enable JSON trace logging to a temp file
    #[arg(long = "logs", env = "IRDECODE_LOGS", default_value_t = false)]
    pub logs: bool,

    /// lircd configuration filename to write
    pub config_file: PathBuf,
}
