//! Fixes Watcher Library
//!
//! Polls the system clipboard for a strict "fixes" JSON payload (an array of
//! `{ "path", "content" }` objects), validates it and atomically writes the
//! first valid copy to a destination file.
//!
//! The pieces are usable on their own: [`validators::validate_fixes`] for the
//! schema check, [`detectors::ChangeDetector`] for snapshot de-duplication,
//! [`utils::publish`] for the atomic write, and [`core::Watcher`] to drive
//! them against any [`core::ClipboardSource`].

pub mod config;
pub mod core;
pub mod detectors;
pub mod utils;
pub mod validators;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Cli, ConfigError, RunConfig};
    pub use crate::core::{
        ClipboardSource, ExitStatus, Logger, Outcome, ScriptedClipboard, SystemClipboard, Tick,
        Watcher,
    };
    pub use crate::detectors::{ChangeDetector, Fingerprint};
    pub use crate::utils::{publish, PublishError};
    pub use crate::validators::{validate_fixes, Rejection};
}
