//! Error types
//!
//! Errors that abort an operation. Rejected state transitions (play with an
//! empty recording, recording while playing, ...) are not errors; see
//! [`crate::session::Outcome`].

use thiserror::Error;

/// Errors that can occur while recording, replaying or persisting
#[derive(Error, Debug)]
pub enum ReplayError {
    /// The OS input hook could not be attached
    #[error("Input listener failed to attach: {0}")]
    ListenerFailed(String),

    /// A single cursor, button or scroll injection failed
    #[error("Input injection failed: {0}")]
    InjectionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed recording or settings document
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Platform error: {0}")]
    Platform(String),
}

/// Result type for recording and playback operations
pub type ReplayResult<T> = Result<T, ReplayError>;
