//! Error types
//!
//! Emulation itself never fails: malformed input is dropped and addressing
//! is clamped. Errors only come from the surfaces around it, such as loading
//! configuration or serializing snapshots.

use std::io;
use thiserror::Error;

/// Crate error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration values that cannot describe a terminal
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for fallible operations
pub type Result<T> = std::result::Result<T, Error>;
