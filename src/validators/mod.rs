// src/validators/mod.rs
//! Payload validators

pub mod fixes_schema;

pub use fixes_schema::{validate_fixes, Rejection};
