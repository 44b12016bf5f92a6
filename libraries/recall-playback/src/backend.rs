//! External media backend contract
//!
//! Abstracts the host's embedded media player (mpv on desktop). The core
//! issues fire-and-forget playback commands and fallible speed property
//! commands; it never manages the player process itself.

use crate::error::Result;
use crate::types::SoundTag;

/// Contract with the external media player
///
/// Playback commands are fire-and-forget: the backend is expected to act
/// on them asynchronously and report begin/end playing events back through
/// the host lifecycle. Speed property commands are fallible because they
/// round-trip to the player; the host checks backend availability once at
/// session start rather than per call.
pub trait MediaBackend: Send {
    /// Current speed multiplier (1.0 = nominal rate)
    fn get_speed(&self) -> Result<f64>;

    /// Adjust the speed multiplier by a relative delta
    fn add_speed(&mut self, delta: f64) -> Result<()>;

    /// Set an absolute speed multiplier
    fn set_speed(&mut self, value: f64) -> Result<()>;

    /// Replace the pending queue with the given clips and start playing
    ///
    /// Supersedes whatever was queued or playing; there is no cancel
    /// handshake.
    fn play_tags(&mut self, tags: Vec<SoundTag>);

    /// Append clips to the pending queue without interrupting playback
    fn enqueue_tags(&mut self, tags: Vec<SoundTag>);

    /// Play a single file reference immediately
    fn play_file(&mut self, filename: &str);

    /// Stop the current clip if one is playing
    fn stop_if_playing(&mut self);

    /// Start playing the head of the pending queue if nothing is playing
    fn play_next_if_idle(&mut self);

    /// Whether the player holds clips lined up to auto-play
    ///
    /// Non-empty pending queue selects the queue-interrupt navigation
    /// regime.
    fn has_pending(&self) -> bool;
}
