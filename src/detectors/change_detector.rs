// src/detectors/change_detector.rs
//! Content-hash based change detection for clipboard snapshots
//!
//! The clipboard is polled far more often than the user copies something new.
//! Fingerprinting each snapshot lets the watcher skip validation (and the
//! matching log line) while the content stays the same.

use std::fmt;

use sha2::{Digest, Sha256};

/// SHA-256 digest of a snapshot's UTF-8 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(text: &str) -> Self {
        Self(Sha256::digest(text.as_bytes()).into())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Remembers the fingerprint of the last processed snapshot
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last: Option<Fingerprint>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `snapshot` and report whether it differs from the previous one
    ///
    /// The new fingerprint is stored either way, so whatever happens to the
    /// snapshot afterwards it counts as processed.
    pub fn observe(&mut self, snapshot: &str) -> bool {
        let fingerprint = Fingerprint::of(snapshot);
        let changed = self.last != Some(fingerprint);
        if changed {
            tracing::trace!(%fingerprint, "clipboard content changed");
        }
        self.last = Some(fingerprint);
        changed
    }

    pub fn last(&self) -> Option<Fingerprint> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_has_identical_fingerprint() {
        let a = Fingerprint::of(r#"[{"path":"a","content":"b"}]"#);
        let b = Fingerprint::of(r#"[{"path":"a","content":"b"}]"#);
        assert_eq!(a, b);
    }

    #[test]
    fn whitespace_changes_the_fingerprint() {
        assert_ne!(Fingerprint::of("[]"), Fingerprint::of("[] "));
        assert_ne!(Fingerprint::of("[]\n"), Fingerprint::of("[]\r\n"));
    }

    #[test]
    fn display_is_lowercase_hex_sha256() {
        assert_eq!(
            Fingerprint::of("").to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn first_observation_is_a_change() {
        let mut detector = ChangeDetector::new();
        assert!(detector.last().is_none());
        assert!(detector.observe("x"));
        assert_eq!(detector.last(), Some(Fingerprint::of("x")));
    }

    #[test]
    fn repeated_snapshot_is_not_a_change() {
        let mut detector = ChangeDetector::new();
        assert!(detector.observe("one"));
        assert!(!detector.observe("one"));
        assert!(!detector.observe("one"));
        assert!(detector.observe("two"));
        // Only the immediately previous snapshot is remembered
        assert!(detector.observe("one"));
    }
}
