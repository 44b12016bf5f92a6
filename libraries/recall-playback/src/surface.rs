//! Surface commands
//!
//! Typed commands queued for the UI layer. The host drains them after each
//! controller call and applies them to whichever review surface is active
//! (reviewer, previewer, or card layout webview); the core never inspects
//! window state itself.

use serde::{Deserialize, Serialize};

use crate::types::Side;

/// Delay before highlight changes, in milliseconds
///
/// Avoids flicker when clips change rapidly.
pub const HIGHLIGHT_DELAY_MS: u64 = 100;

/// Commands emitted for the active review surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceCommand {
    /// Highlight the play button at (side, index)
    HighlightPlayButton {
        /// Side the control belongs to
        side: Side,
        /// Position within the side's effective sequence
        index: usize,
        /// Configured highlight color
        color: String,
        /// Delay before applying, in milliseconds
        delay_ms: u64,
    },

    /// Clear all play button highlights
    ClearHighlights {
        /// Delay before applying, in milliseconds
        delay_ms: u64,
    },

    /// Apply an additive adjustment to the visual playback-rate indicator
    AdjustRateIndicator {
        /// Rate delta as a fraction of nominal (0.10 = +10%)
        delta: f64,
    },

    /// Reset the visual playback-rate indicator to nominal
    ResetRateIndicator,

    /// Show a transient user-visible notification
    Notify {
        /// Message text
        message: String,
    },
}
