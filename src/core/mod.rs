// src/core/mod.rs
//! Core components: clipboard access, logging and the watch loop

pub mod clipboard;
pub mod logger;
pub mod watcher;

pub use clipboard::{ClipboardSource, ScriptedClipboard, SystemClipboard};
pub use logger::Logger;
pub use watcher::{ExitStatus, Outcome, ProgressReporter, Tick, WatchStats, Watcher};
