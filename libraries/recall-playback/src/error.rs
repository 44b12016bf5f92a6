//! Error types for review playback control

use thiserror::Error;

/// Playback control errors
///
/// Expected outcomes (a tag missing from the registry, an empty side,
/// an inline reference that does not parse) are not errors; they are
/// modeled as `Option` / no-ops at their call sites. Only failures of
/// the external media backend and configuration loading surface here.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The media backend is not available for this session
    #[error("Media backend unavailable")]
    BackendUnavailable,

    /// A backend property command failed
    #[error("Backend command failed: {0}")]
    Backend(String),

    /// Configuration document could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
