// src/core/clipboard.rs
//! Clipboard access behind a small trait
//!
//! The watcher only ever needs "the current text, if any". Platform failures
//! (no display server, clipboard locked by another process, non-text content)
//! all collapse into `None` so the polling loop never has to care why a read
//! produced nothing.

use std::collections::VecDeque;

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Source of clipboard text snapshots
pub trait ClipboardSource {
    /// Current clipboard text, or `None` when unavailable for any reason
    fn read_text(&mut self) -> Option<String>;

    /// Empty the clipboard, best effort
    fn clear(&mut self);
}

/// The system clipboard via `arboard`
///
/// The handle is opened lazily and dropped after a failure, so a clipboard
/// that becomes available later in the run is picked up on a later tick.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut Clipboard> {
        if self.handle.is_none() {
            let clipboard = Clipboard::new().context("failed to open system clipboard")?;
            self.handle = Some(clipboard);
        }
        self.handle
            .as_mut()
            .context("system clipboard handle missing")
    }
}

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> Option<String> {
        let result = self
            .handle()
            .and_then(|clipboard| clipboard.get_text().context("failed to read clipboard text"));

        match result {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::trace!("clipboard read yielded nothing: {:#}", e);
                // Re-open on the next tick in case the backend went away
                self.handle = None;
                None
            }
        }
    }

    fn clear(&mut self) {
        let result = self
            .handle()
            .and_then(|clipboard| clipboard.clear().context("failed to clear clipboard"));

        if let Err(e) = result {
            tracing::debug!("clipboard clear ignored: {:#}", e);
            self.handle = None;
        }
    }
}

/// Replays a fixed sequence of snapshots, one per read
///
/// Once the script runs out the last snapshot keeps being returned, the way a
/// real clipboard keeps its content until something new is copied.
#[derive(Debug, Default)]
pub struct ScriptedClipboard {
    script: VecDeque<Option<String>>,
    current: Option<String>,
    reads: usize,
    clears: usize,
}

impl ScriptedClipboard {
    pub fn new<I, S>(snapshots: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            script: snapshots.into_iter().map(|s| s.map(Into::into)).collect(),
            ..Self::default()
        }
    }

    /// Clipboard that holds `text` for the whole run
    pub fn holding(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self::new([Some(text)])
    }

    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl ClipboardSource for ScriptedClipboard {
    fn read_text(&mut self) -> Option<String> {
        self.reads += 1;
        if let Some(next) = self.script.pop_front() {
            self.current = next;
        }
        self.current.clone()
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.current = None;
    }
}
