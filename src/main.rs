// src/main.rs
//! Fixes Watcher
//!
//! Bridges a chat-style workflow and an automated consumer: a human copies a
//! structured response, this tool notices it on the clipboard, checks it is a
//! well-formed fixes array and drops it on disk for the next stage.
//!
//! Exit status: 0 published, 1 timed out, 2 invalid invocation.

use std::process::ExitCode;

use clap::Parser;

use fixes_watcher::config::{Cli, ConfigError, RunConfig};
use fixes_watcher::core::{ExitStatus, Logger, SystemClipboard, Watcher};

/// Everything a run needs, resolved once at startup
struct WatcherApp {
    config: RunConfig,
    logger: Logger,
}

impl WatcherApp {
    fn new(cli: &Cli) -> Result<Self, ConfigError> {
        let config = RunConfig::from_cli(cli)?;

        Self::setup_logging(cli.verbose);
        tracing::debug!(?config, "configuration resolved");

        let mut logger = Logger::stdout();
        if let Some(path) = &config.log {
            logger = logger.with_log_file(path);
        }

        Ok(Self { config, logger })
    }

    async fn run(&self) -> ExitStatus {
        let mut watcher = Watcher::new(&self.config, SystemClipboard::new(), &self.logger);
        watcher.run().await.exit_status()
    }

    /// Diagnostics go to stderr so stdout carries only the watcher's own lines
    fn setup_logging(verbose: u8) {
        use tracing_subscriber::{fmt, EnvFilter};

        let level = match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        };

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(verbose > 1)
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let app = match WatcherApp::new(&cli) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{e}");
            return ExitStatus::InvalidInvocation.into();
        }
    };

    app.run().await.into()
}
