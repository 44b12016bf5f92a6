//! Recall - Review Playback Control
//!
//! Fine-grained audio playback control for flashcard review.
//!
//! This crate provides:
//! - Per-side tracking of the clips attached to the current card
//!   (declared at render time plus clips discovered in rendered text)
//! - Next/previous navigation between clips, with wraparound and
//!   mid-queue interruption
//! - Highlighting of the control for the clip currently playing
//! - Variable-speed playback control
//! - Rewriting of inline `[sound:...]` references into play buttons
//!
//! # Architecture
//!
//! `recall-playback` is host-agnostic:
//! - No dependency on the host's UI toolkit or webview
//! - No dependency on the media player process
//! - No audio decoding
//!
//! The external media player is provided via the [`MediaBackend`] trait;
//! instructions for the UI layer are queued as [`SurfaceCommand`]s and
//! drained by the host, which applies them to whichever review surface is
//! active. Everything runs on the host's single control thread.
//!
//! # Example
//!
//! ```rust
//! use recall_playback::{
//!     MediaBackend, PlaybackConfig, PlaybackController, Result, Side, SoundTag,
//! };
//!
//! // Implement MediaBackend for your player
//! struct MyPlayer {
//!     speed: f64,
//!     queue: Vec<SoundTag>,
//! }
//!
//! impl MediaBackend for MyPlayer {
//!     fn get_speed(&self) -> Result<f64> {
//!         Ok(self.speed)
//!     }
//!     fn add_speed(&mut self, delta: f64) -> Result<()> {
//!         self.speed += delta;
//!         Ok(())
//!     }
//!     fn set_speed(&mut self, value: f64) -> Result<()> {
//!         self.speed = value;
//!         Ok(())
//!     }
//!     fn play_tags(&mut self, tags: Vec<SoundTag>) {
//!         self.queue = tags;
//!     }
//!     fn enqueue_tags(&mut self, tags: Vec<SoundTag>) {
//!         self.queue.extend(tags);
//!     }
//!     fn play_file(&mut self, _filename: &str) {}
//!     fn stop_if_playing(&mut self) {}
//!     fn play_next_if_idle(&mut self) {}
//!     fn has_pending(&self) -> bool {
//!         !self.queue.is_empty()
//!     }
//! }
//!
//! let backend = MyPlayer { speed: 1.0, queue: Vec::new() };
//! let mut controller = PlaybackController::new(PlaybackConfig::default(), Box::new(backend));
//!
//! // Host announces the question side is about to render
//! controller.save_question_tags(vec![SoundTag::new("front.mp3")]);
//!
//! // Rendered text passes through annotation
//! let (html, added) = controller.annotate_text("Hint: [sound:hint.mp3]", Side::Question, false);
//! assert_eq!(added, vec![SoundTag::new("hint.mp3")]);
//! assert!(html.contains("replay-button"));
//!
//! // User actions
//! controller.play_next();
//! controller.speed_up().ok();
//!
//! // Host drains surface commands and applies them to the active webview
//! for command in controller.drain_commands() {
//!     // apply to webview
//!     let _ = command;
//! }
//! ```

mod annotate;
mod backend;
mod controller;
mod error;
mod surface;
mod tags;
pub mod types;

// Public exports
pub use annotate::BRIDGE_PREFIX;
pub use backend::MediaBackend;
pub use controller::{Action, PlaybackController};
pub use error::{PlaybackError, Result};
pub use surface::{SurfaceCommand, HIGHLIGHT_DELAY_MS};
pub use tags::{SoundTagList, SoundTagRegistry};
pub use types::{CurrentSound, PlaybackConfig, Side, SoundTag};
