//! Error types shared across the crate.

use std::io;
use thiserror::Error;

/// Errors raised while reading a trip file
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read trip file {path}: {source}")]
    Io { path: String, source: io::Error },

    #[error("Invalid trip JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid trip JSON on line {line}: {source}")]
    JsonLine { line: usize, source: serde_json::Error },

    #[error("Invalid trip CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Trip CSV has no event type column (looked for {0:?})")]
    MissingEventColumn(&'static [&'static str]),

    #[error("Unknown trip file format")]
    UnknownFormat,
}

/// Errors raised when talking to a running playback task
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The driver task has exited and can no longer accept commands
    #[error("Playback task is no longer running")]
    DriverGone,
}
