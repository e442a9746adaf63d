// src/core/logger.rs
//! Operator-facing log lines
//!
//! Every line has the shape `[watcher] LEVEL HH:MM:SS  message` and goes to
//! the console and, optionally, to a log file. Logging is best effort: a
//! failed write is dropped and never interrupts the watch loop.
//!
//! Diagnostics use `tracing` instead and go to stderr, off unless `-v`.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::{Local, NaiveDateTime, NaiveTime};

const PREFIX: &str = "[watcher]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        })
    }
}

/// Format one log line (without the trailing newline)
pub fn format_line(level: Level, time: NaiveTime, message: &str) -> String {
    format!("{PREFIX} {level} {}  {message}", time.format("%H:%M:%S"))
}

/// First line of a fresh log file
pub fn header_line(started: NaiveDateTime) -> String {
    format!("{PREFIX} started {}", started.format("%Y-%m-%d %H:%M:%S"))
}

/// Console + optional file logger, created once per run and shared by reference
pub struct Logger {
    console: Mutex<Box<dyn Write + Send>>,
    file: Option<Mutex<File>>,
}

impl Logger {
    /// Logger that writes to stdout only
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn new(console: Box<dyn Write + Send>) -> Self {
        Self {
            console: Mutex::new(console),
            file: None,
        }
    }

    /// Also append every line to `path`
    ///
    /// The file is truncated and starts with a header line. If it cannot be
    /// prepared the logger silently stays console-only.
    pub fn with_log_file(mut self, path: &Path) -> Self {
        match open_log_file(path) {
            Ok(file) => self.file = Some(Mutex::new(file)),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "log file disabled");
            }
        }
        self
    }

    pub fn has_log_file(&self) -> bool {
        self.file.is_some()
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.write(Level::Info, &message.to_string());
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.write(Level::Warn, &message.to_string());
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.write(Level::Error, &message.to_string());
    }

    fn write(&self, level: Level, message: &str) {
        let line = format_line(level, Local::now().time(), message);

        if let Ok(mut console) = self.console.lock() {
            let _ = writeln!(console, "{line}");
            let _ = console.flush();
        }

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{line}");
            }
        }
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, format!("{}\n", header_line(Local::now().naive_local())))?;
    OpenOptions::new().append(true).open(path)
}

/// In-memory console sink for tests
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct Capture(std::sync::Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl Capture {
    pub(crate) fn logger() -> (Logger, Capture) {
        let capture = Capture::default();
        (Logger::new(Box::new(capture.clone())), capture)
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        let text = String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned();
        text.lines().map(str::to_owned).collect()
    }

    /// Lines with the prefix, level and timestamp stripped
    pub(crate) fn messages(&self) -> Vec<String> {
        self.lines()
            .iter()
            .filter_map(|line| line.split_once("  ").map(|(_, msg)| msg.to_owned()))
            .collect()
    }
}

#[cfg(test)]
impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
