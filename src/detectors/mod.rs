// src/detectors/mod.rs
//! Change detection over polled clipboard content

pub mod change_detector;

pub use change_detector::{ChangeDetector, Fingerprint};
