// src/utils/mod.rs
//! Filesystem helpers

pub mod atomic_write;

pub use atomic_write::{publish, temp_path_for, PublishError};
