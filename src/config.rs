// src/config.rs
//! Command line surface and the resolved run configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

pub const DEFAULT_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 400;

/// Wait for a valid fixes JSON array on the clipboard and write it to a file
#[derive(Debug, Parser)]
#[command(
    name = "fixes-watcher",
    version,
    about = "Watch the clipboard for a valid fixes JSON array and publish it to a file",
    long_about = "Polls the clipboard until it holds a JSON array of \
                  {\"path\", \"content\"} objects, then atomically writes that exact \
                  text to --out and exits 0. Exits 1 on timeout and 2 on invalid \
                  invocation, which includes a missing --out and any unrecognized flag."
)]
pub struct Cli {
    /// Destination file for the captured JSON (required)
    #[arg(long, value_name = "PATH")]
    pub out: Option<String>,

    /// Seconds to wait before giving up; non-numeric values are ignored
    #[arg(long, value_name = "SECONDS", allow_hyphen_values = true)]
    pub timeout: Option<String>,

    /// Also append log lines to this file
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Clear the clipboard once before watching
    #[arg(long)]
    pub clear_clipboard: bool,

    /// Diagnostic verbosity on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(long, hide = true, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing --out <file>.")]
    MissingOut,
}

/// Resolved options for one run; never changes after startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub out: PathBuf,
    pub timeout: Duration,
    pub log: Option<PathBuf>,
    pub clear_clipboard: bool,
    pub poll_interval: Duration,
}

impl RunConfig {
    pub fn new(out: impl Into<PathBuf>) -> Self {
        Self {
            out: out.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log: None,
            clear_clipboard: false,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let out = cli
            .out
            .as_deref()
            .filter(|out| !out.trim().is_empty())
            .ok_or(ConfigError::MissingOut)?;

        Ok(Self {
            out: PathBuf::from(out),
            timeout: resolve_timeout(cli.timeout.as_deref()),
            log: cli.log.clone(),
            clear_clipboard: cli.clear_clipboard,
            poll_interval: Duration::from_millis(cli.poll_interval_ms.max(1)),
        })
    }
}

/// Parse `--timeout`: text that is not a 32-bit integer keeps the default,
/// values floor at 1s
pub fn resolve_timeout(raw: Option<&str>) -> Duration {
    let secs = raw
        .and_then(|raw| raw.trim().parse::<i32>().ok())
        .map(|secs| u64::from(secs.max(1).unsigned_abs()))
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}
