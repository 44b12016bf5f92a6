//! Core types for review playback control

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Side of a flashcard during review
///
/// Distinct clip sets may be declared for each side; the wire names
/// (`"q"` / `"a"`) are the ones embedded in surface commands and bridge
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Question side (front)
    #[serde(rename = "q")]
    Question,

    /// Answer side (back)
    #[serde(rename = "a")]
    Answer,
}

impl Side {
    /// Wire name used in bridge messages and control markup
    pub fn code(self) -> &'static str {
        match self {
            Side::Question => "q",
            Side::Answer => "a",
        }
    }

    /// Parse a wire name back into a side
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "q" => Some(Side::Question),
            "a" => Some(Side::Answer),
            _ => None,
        }
    }
}

/// One playable clip attached to a card side
///
/// Tags compare by value over the playable reference. The same filename
/// appearing twice in a sequence is two distinct entries distinguished
/// only by position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundTag {
    /// Reference the media backend can play (a filename or equivalent)
    pub filename: String,
}

impl SoundTag {
    /// Create a tag for the given playable reference
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }

    /// Placeholder tag used by the navigation sentinel
    pub fn placeholder() -> Self {
        Self {
            filename: String::new(),
        }
    }
}

/// The clip most recently reported as having begun playing
///
/// Anchor for relative navigation. Before any playback this holds a
/// harmless sentinel on the question side at index 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentSound {
    /// Side the clip belongs to
    pub side: Side,

    /// Position within the side's effective sequence
    pub index: usize,

    /// The clip itself
    pub tag: SoundTag,
}

impl CurrentSound {
    /// Deterministic pre-playback starting point
    pub fn sentinel() -> Self {
        Self {
            side: Side::Question,
            index: 0,
            tag: SoundTag::placeholder(),
        }
    }
}

impl Default for CurrentSound {
    fn default() -> Self {
        Self::sentinel()
    }
}

/// Configuration for the playback controller
///
/// Loaded from the host's JSON config document; every field falls back
/// to its default when absent so partial documents stay valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Speed adjustment step as a percentage of nominal rate (default: 10)
    pub speed_factor: u32,

    /// Highlight color applied to the active play button
    pub play_button_highlight_color: String,

    /// Shortcut for speeding playback up
    pub speed_up_shortcut: String,

    /// Shortcut for slowing playback down
    pub slow_down_shortcut: String,

    /// Shortcut for resetting playback speed
    pub reset_speed_shortcut: String,

    /// Shortcut for jumping to the next clip
    pub play_next_shortcut: String,

    /// Shortcut for jumping to the previous clip
    pub play_previous_shortcut: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed_factor: 10,
            play_button_highlight_color: "lightblue".to_string(),
            speed_up_shortcut: "Ctrl+=".to_string(),
            slow_down_shortcut: "Ctrl+-".to_string(),
            reset_speed_shortcut: "Ctrl+0".to_string(),
            play_next_shortcut: "Ctrl+Right".to_string(),
            play_previous_shortcut: "Ctrl+Left".to_string(),
        }
    }
}

impl PlaybackConfig {
    /// Parse configuration from the host's JSON config document
    pub fn from_json(document: &str) -> Result<Self> {
        Ok(serde_json::from_str(document)?)
    }

    /// Speed adjustment step expressed as a fraction of the nominal rate
    ///
    /// A `speed_factor` of 10 yields 0.10.
    pub fn speed_step(&self) -> f64 {
        f64::from(self.speed_factor) / 100.0
    }
}
