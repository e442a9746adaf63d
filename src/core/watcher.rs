// src/core/watcher.rs
//! The polling loop
//!
//! One run moves through a small state machine:
//!
//! ```text
//! Waiting ──(new content)──> Validating ──(valid)──> Publishing ──> Done(published)
//!    ^                            │                      │
//!    └──────(rejected / publish failed / empty / unchanged)
//! Waiting ──(deadline reached)──> Done(timed out)
//! ```
//!
//! Each tick does a bounded amount of work (one clipboard read, at most one
//! validation and one publish attempt), then the loop sleeps for the poll
//! interval. The sleep is the only suspension point.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::config::RunConfig;
use crate::core::clipboard::ClipboardSource;
use crate::core::logger::Logger;
use crate::detectors::ChangeDetector;
use crate::utils::publish;
use crate::validators::{validate_fixes, Rejection};

/// Process exit statuses; these values are the tool's public contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Published = 0,
    TimedOut = 1,
    InvalidInvocation = 2,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Terminal state of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Published(PathBuf),
    TimedOut,
}

impl Outcome {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Outcome::Published(_) => ExitStatus::Published,
            Outcome::TimedOut => ExitStatus::TimedOut,
        }
    }
}

/// What a single poll did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Nothing readable, or only whitespace
    Empty,
    /// Same content as the last processed snapshot
    Unchanged,
    Rejected(Rejection),
    PublishFailed,
    Published(PathBuf),
}

/// Counters for the end-of-run diagnostic summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    pub ticks: u64,
    pub validations: u64,
    pub rejections: u64,
    pub publish_failures: u64,
}

/// Decides when to log the remaining time
///
/// Reports at whole-second values that are multiples of [`Self::STEP_SECS`],
/// once per distinct value.
#[derive(Debug, Default)]
pub struct ProgressReporter {
    last_shown: Option<u64>,
}

impl ProgressReporter {
    pub const STEP_SECS: u64 = 5;

    pub fn observe(&mut self, remaining: Duration) -> Option<u64> {
        let secs = remaining.as_secs();
        if secs % Self::STEP_SECS != 0 || self.last_shown == Some(secs) {
            return None;
        }
        self.last_shown = Some(secs);
        Some(secs)
    }
}

/// Upper bound for a deadline when `now + timeout` does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// `now + timeout`, saturating to a far-future deadline on overflow
pub fn deadline_after(now: Instant, timeout: Duration) -> Instant {
    now.checked_add(timeout)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

pub struct Watcher<'a, C> {
    config: &'a RunConfig,
    logger: &'a Logger,
    clipboard: C,
    detector: ChangeDetector,
    progress: ProgressReporter,
    stats: WatchStats,
}

impl<'a, C: ClipboardSource> Watcher<'a, C> {
    pub fn new(config: &'a RunConfig, clipboard: C, logger: &'a Logger) -> Self {
        Self {
            config,
            logger,
            clipboard,
            detector: ChangeDetector::new(),
            progress: ProgressReporter::default(),
            stats: WatchStats::default(),
        }
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn stats(&self) -> WatchStats {
        self.stats
    }

    /// Watch until a valid payload is published or the timeout expires
    pub async fn run(&mut self) -> Outcome {
        self.logger.info(format_args!(
            "Watching clipboard for valid fixes JSON… (timeout {}s)",
            self.config.timeout.as_secs()
        ));
        self.logger.info(format_args!(
            "Output file (will overwrite on success): {}",
            self.config.out.display()
        ));

        if self.config.clear_clipboard {
            self.clipboard.clear();
            self.logger.info("Clipboard cleared at start.");
        }

        let deadline = deadline_after(Instant::now(), self.config.timeout);

        let outcome = loop {
            let now = Instant::now();
            if now >= deadline {
                self.logger.warn("Timeout waiting for valid fixes JSON.");
                break Outcome::TimedOut;
            }

            if let Some(secs) = self.progress.observe(deadline - now) {
                self.logger.info(format_args!("Time remaining: {secs}s"));
            }

            sleep(self.config.poll_interval).await;

            if let Tick::Published(path) = self.tick() {
                break Outcome::Published(path);
            }
        };

        tracing::debug!(?outcome, stats = ?self.stats, "watch finished");
        outcome
    }

    /// One poll: read, de-duplicate, validate, publish
    pub fn tick(&mut self) -> Tick {
        self.stats.ticks += 1;

        let text = match self.clipboard.read_text() {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Tick::Empty,
        };

        // Recorded before validating so a failed publish is not retried
        // until the clipboard content changes
        if !self.detector.observe(&text) {
            return Tick::Unchanged;
        }

        self.stats.validations += 1;
        let entries = match validate_fixes(&text) {
            Ok(entries) => entries,
            Err(rejection) => {
                self.stats.rejections += 1;
                self.logger
                    .warn(format_args!("Clipboard not valid JSON yet: {rejection}"));
                return Tick::Rejected(rejection);
            }
        };

        match publish(&self.config.out, &text) {
            Ok(()) => {
                tracing::debug!(entries, "fixes payload accepted");
                self.logger
                    .info(format_args!("Captured JSON → {}", self.config.out.display()));
                Tick::Published(self.config.out.clone())
            }
            Err(e) => {
                self.stats.publish_failures += 1;
                self.logger.error(format_args!("Failed to write JSON: {e}"));
                Tick::PublishFailed
            }
        }
    }
}
