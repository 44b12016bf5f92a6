//! Playback controller - core orchestration
//!
//! Owns the sound tag registry and the current-sound anchor for one review
//! session. The host routes its lifecycle events (side about to render,
//! began/ended playing, bridge messages, user actions) into the controller
//! on a single thread; the controller issues commands to the media backend
//! and queues typed commands for the active review surface.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    annotate::{self, BRIDGE_PREFIX},
    backend::MediaBackend,
    error::Result,
    surface::{SurfaceCommand, HIGHLIGHT_DELAY_MS},
    tags::SoundTagRegistry,
    types::{CurrentSound, PlaybackConfig, Side, SoundTag},
};

/// User-invokable playback actions
///
/// Rows for the host's menu and shortcut registration; the bindings
/// themselves are registered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Increase playback speed by the configured step
    SpeedUp,
    /// Decrease playback speed by the configured step
    SlowDown,
    /// Reset playback speed to nominal
    ResetSpeed,
    /// Jump to the next clip on the current side
    PlayNext,
    /// Jump to the previous clip on the current side
    PlayPrevious,
}

/// Session-scoped playback controller
///
/// Created once per review session and torn down with it. All state is
/// in-memory and rebuilt per render cycle; nothing is persisted.
pub struct PlaybackController {
    config: PlaybackConfig,
    registry: SoundTagRegistry,
    current: CurrentSound,
    backend: Box<dyn MediaBackend>,
    pending_commands: Vec<SurfaceCommand>,
}

impl PlaybackController {
    /// Create a controller for one review session
    pub fn new(config: PlaybackConfig, backend: Box<dyn MediaBackend>) -> Self {
        Self {
            config,
            registry: SoundTagRegistry::new(),
            current: CurrentSound::sentinel(),
            backend,
            pending_commands: Vec::new(),
        }
    }

    // ===== Render Lifecycle =====

    /// Host is about to render the question side with these declared tags
    pub fn save_question_tags(&mut self, tags: Vec<SoundTag>) {
        self.registry.set_declared(Side::Question, tags);
    }

    /// Host is about to render the answer side with these declared tags
    pub fn save_answer_tags(&mut self, tags: Vec<SoundTag>) {
        self.registry.set_declared(Side::Answer, tags);
    }

    // ===== Text Annotation =====

    /// Rewrite inline sound references in rendered review text
    ///
    /// Each `[sound:...]` marker becomes a play button numbered with the
    /// clip's final position in the side's effective sequence; the
    /// discovered tags are appended to the side's extra tags in match
    /// order. With `auto_play` the new tags also join the backend's
    /// pending queue, and playback is kicked off if the player is idle.
    ///
    /// Returns the rewritten text and the newly added tags.
    pub fn annotate_text(
        &mut self,
        text: &str,
        side: Side,
        auto_play: bool,
    ) -> (String, Vec<SoundTag>) {
        let base = self.registry.effective_len(side);
        let (rewritten, added) = annotate::rewrite_sound_refs(text, side, base);
        if added.is_empty() {
            return (rewritten, added);
        }

        debug!(side = side.code(), count = added.len(), "extra tags discovered");
        self.registry.append_extra(side, added.clone());
        if auto_play {
            self.backend.enqueue_tags(added.clone());
            self.backend.play_next_if_idle();
        }
        (rewritten, added)
    }

    // ===== Navigation =====

    /// Move playback `delta` clips relative to the current sound
    ///
    /// With clips pending in the backend, replaces the pending queue with
    /// the remainder of the current side starting at the target entry, so
    /// auto-advance momentum is preserved. With an idle backend, stops any
    /// playing clip and plays exactly the target entry, wrapping around in
    /// both directions; an empty side is a no-op.
    ///
    /// Navigation stays within the side that last reported a begin-playing
    /// event. When the host is configured to replay both sides' clips on
    /// the answer screen, this can confine next/previous to one side; that
    /// behavior is a known quirk of the original controller and is kept
    /// until the combined-side navigation semantics are decided.
    pub fn advance(&mut self, delta: isize) {
        let side = self.current.side;
        let tags = self.registry.effective(side);

        if self.backend.has_pending() {
            let start = self.current.index as isize + delta;
            let start = if start < 0 {
                // Negative start wraps from the end of the sequence
                (tags.len() as isize + start).max(0) as usize
            } else {
                start as usize
            };
            let remainder = tags.get(start..).unwrap_or(&[]).to_vec();
            debug!(side = side.code(), start, count = remainder.len(), "interrupting queue");
            self.backend.play_tags(remainder);
        } else {
            self.backend.stop_if_playing();
            if tags.is_empty() {
                return;
            }
            let len = tags.len() as isize;
            let index = (self.current.index as isize + delta).rem_euclid(len) as usize;
            debug!(side = side.code(), index, "playing single clip");
            self.backend.play_tags(vec![tags[index].clone()]);
        }
    }

    /// Jump to the next clip on the current side
    pub fn play_next(&mut self) {
        self.advance(1);
    }

    /// Jump to the previous clip on the current side
    pub fn play_previous(&mut self) {
        self.advance(-1);
    }

    // ===== Playback Lifecycle =====

    /// A clip began playing
    ///
    /// Looks the tag up in the registry; clips outside it (other UI audio)
    /// are ignored. On a hit, updates the current-sound anchor and queues a
    /// delayed highlight for the matching play button. This is the sole
    /// writer of the current-sound anchor.
    pub fn on_began_playing(&mut self, tag: &SoundTag) {
        let Some((side, index)) = self.registry.find(tag) else {
            return;
        };

        self.current = CurrentSound {
            side,
            index,
            tag: tag.clone(),
        };
        let color = self.config.play_button_highlight_color.clone();
        self.push_command(SurfaceCommand::HighlightPlayButton {
            side,
            index,
            color,
            delay_ms: HIGHLIGHT_DELAY_MS,
        });
    }

    /// Playback ended; queue a delayed highlight clear
    pub fn on_ended_playing(&mut self) {
        self.push_command(SurfaceCommand::ClearHighlights {
            delay_ms: HIGHLIGHT_DELAY_MS,
        });
    }

    // ===== Speed Control =====

    /// Current backend speed multiplier
    pub fn get_speed(&self) -> Result<f64> {
        self.backend.get_speed()
    }

    /// Adjust backend speed by a relative delta
    ///
    /// Queues a notification reporting the resulting speed.
    pub fn add_speed(&mut self, delta: f64) -> Result<f64> {
        self.backend.add_speed(delta)?;
        let speed = self.backend.get_speed()?;
        self.push_command(SurfaceCommand::Notify {
            message: format!("Audio Speed {delta:+}<br>Current Speed: {speed}"),
        });
        Ok(speed)
    }

    /// Set an absolute backend speed
    pub fn set_speed(&mut self, value: f64) -> Result<f64> {
        self.backend.set_speed(value)?;
        let speed = self.backend.get_speed()?;
        self.push_command(SurfaceCommand::Notify {
            message: format!("Reset Speed: {speed}"),
        });
        Ok(speed)
    }

    /// Reset speed to nominal and reset the visual rate indicator
    pub fn reset_speed(&mut self) -> Result<f64> {
        let speed = self.set_speed(1.0)?;
        self.push_command(SurfaceCommand::ResetRateIndicator);
        Ok(speed)
    }

    /// Speed up by the configured step
    pub fn speed_up(&mut self) -> Result<f64> {
        let step = self.config.speed_step();
        let speed = self.add_speed(step)?;
        self.push_command(SurfaceCommand::AdjustRateIndicator { delta: step });
        Ok(speed)
    }

    /// Slow down by the configured step
    pub fn slow_down(&mut self) -> Result<f64> {
        let step = self.config.speed_step();
        let speed = self.add_speed(-step)?;
        self.push_command(SurfaceCommand::AdjustRateIndicator { delta: -step });
        Ok(speed)
    }

    // ===== Bridge Messages =====

    /// Route a message received from a review surface
    ///
    /// Messages are prefixed with `recall_playback:`; anything else is not
    /// ours and returns `false`. The `play:{side}:{index}` subcommand plays
    /// the clip at that effective position directly. Recognized-but-unknown
    /// subcommands are consumed without action.
    pub fn handle_message(&mut self, message: &str) -> bool {
        let Some(rest) = message.strip_prefix(BRIDGE_PREFIX) else {
            return false;
        };
        let Some(rest) = rest.strip_prefix(':') else {
            return false;
        };

        let mut parts = rest.splitn(3, ':');
        match parts.next() {
            Some("play") => {
                let side = parts.next().and_then(Side::from_code);
                let index = parts.next().and_then(|raw| raw.parse::<usize>().ok());
                if let (Some(side), Some(index)) = (side, index) {
                    if let Some(tag) = self.registry.effective(side).get(index) {
                        debug!(side = side.code(), index, "bridge play request");
                        self.backend.play_file(&tag.filename);
                    }
                }
                true
            }
            _ => true,
        }
    }

    // ===== Actions =====

    /// Rows for the host's menu and shortcut registration
    ///
    /// Each row is (label, configured shortcut, action).
    pub fn actions(&self) -> Vec<(&'static str, String, Action)> {
        vec![
            (
                "Speed Up Audio",
                self.config.speed_up_shortcut.clone(),
                Action::SpeedUp,
            ),
            (
                "Slow Down Audio",
                self.config.slow_down_shortcut.clone(),
                Action::SlowDown,
            ),
            (
                "Reset Audio Speed",
                self.config.reset_speed_shortcut.clone(),
                Action::ResetSpeed,
            ),
            (
                "Play Next Audio",
                self.config.play_next_shortcut.clone(),
                Action::PlayNext,
            ),
            (
                "Play Previous Audio",
                self.config.play_previous_shortcut.clone(),
                Action::PlayPrevious,
            ),
        ]
    }

    /// Dispatch a user-invoked action
    pub fn invoke(&mut self, action: Action) -> Result<()> {
        match action {
            Action::SpeedUp => {
                self.speed_up()?;
            }
            Action::SlowDown => {
                self.slow_down()?;
            }
            Action::ResetSpeed => {
                self.reset_speed()?;
            }
            Action::PlayNext => self.play_next(),
            Action::PlayPrevious => self.play_previous(),
        }
        Ok(())
    }

    // ===== State Access =====

    /// Effective clip sequence for a side (declared followed by extra)
    ///
    /// The host uses this to overwrite the card's own tag lists so its
    /// replay-all command covers dynamically discovered clips too.
    pub fn effective_tags(&self, side: Side) -> Vec<SoundTag> {
        self.registry.effective(side)
    }

    /// The navigation anchor: last clip reported as having begun playing
    pub fn current_sound(&self) -> &CurrentSound {
        &self.current
    }

    /// Active configuration
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    // ===== Surface Commands =====

    /// Drain all commands queued for the active review surface
    ///
    /// Returns the commands queued since the last drain, in order. The
    /// host applies them to whichever webview is currently active.
    pub fn drain_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.pending_commands)
    }

    /// Check whether surface commands are waiting
    pub fn has_pending_commands(&self) -> bool {
        !self.pending_commands.is_empty()
    }

    fn push_command(&mut self, command: SurfaceCommand) {
        self.pending_commands.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::{BackendState, Call, RecordingBackend};
    use std::sync::{Arc, Mutex};

    fn tag(name: &str) -> SoundTag {
        SoundTag::new(name)
    }

    fn controller() -> (PlaybackController, Arc<Mutex<BackendState>>) {
        let (backend, state) = RecordingBackend::new();
        (
            PlaybackController::new(PlaybackConfig::default(), Box::new(backend)),
            state,
        )
    }

    fn playback_calls(state: &Arc<Mutex<BackendState>>) -> Vec<Call> {
        state.lock().unwrap().calls.clone()
    }

    // ===== Navigation: Idle Regime =====

    #[test]
    fn idle_next_wraps_to_first_clip() {
        let (mut controller, state) = controller();
        controller.save_question_tags(vec![tag("a.mp3"), tag("b.mp3"), tag("c.mp3")]);
        controller.on_began_playing(&tag("c.mp3"));
        state.lock().unwrap().calls.clear();

        controller.play_next();

        assert_eq!(
            playback_calls(&state),
            vec![Call::Stop, Call::PlayTags(vec![tag("a.mp3")])]
        );
    }

    #[test]
    fn idle_previous_wraps_to_last_clip() {
        let (mut controller, state) = controller();
        controller.save_question_tags(vec![tag("a.mp3"), tag("b.mp3"), tag("c.mp3")]);
        controller.on_began_playing(&tag("a.mp3"));
        state.lock().unwrap().calls.clear();

        controller.play_previous();

        assert_eq!(
            playback_calls(&state),
            vec![Call::Stop, Call::PlayTags(vec![tag("c.mp3")])]
        );
    }

    #[test]
    fn idle_advance_on_empty_side_plays_nothing() {
        let (mut controller, state) = controller();

        controller.play_next();

        // Stops any playing clip, but submits no playback
        assert_eq!(playback_calls(&state), vec![Call::Stop]);
    }

    // ===== Navigation: Queue-Interrupt Regime =====

    #[test]
    fn interrupt_next_submits_remaining_slice() {
        let (mut controller, state) = controller();
        controller.save_question_tags(vec![tag("a.mp3"), tag("b.mp3"), tag("c.mp3")]);
        controller.on_began_playing(&tag("a.mp3"));
        {
            let mut state = state.lock().unwrap();
            state.pending = vec![tag("b.mp3"), tag("c.mp3")];
            state.calls.clear();
        }

        controller.play_next();

        assert_eq!(
            playback_calls(&state),
            vec![Call::PlayTags(vec![tag("b.mp3"), tag("c.mp3")])]
        );
    }

    #[test]
    fn interrupt_next_from_last_clip_submits_empty_queue() {
        let (mut controller, state) = controller();
        controller.save_question_tags(vec![tag("a.mp3"), tag("b.mp3")]);
        controller.on_began_playing(&tag("b.mp3"));
        {
            let mut state = state.lock().unwrap();
            state.pending = vec![tag("b.mp3")];
            state.calls.clear();
        }

        controller.play_next();

        assert_eq!(playback_calls(&state), vec![Call::PlayTags(vec![])]);
    }

    #[test]
    fn interrupt_previous_from_first_clip_wraps_to_last() {
        let (mut controller, state) = controller();
        controller.save_question_tags(vec![tag("a.mp3"), tag("b.mp3"), tag("c.mp3")]);
        controller.on_began_playing(&tag("a.mp3"));
        {
            let mut state = state.lock().unwrap();
            state.pending = vec![tag("b.mp3")];
            state.calls.clear();
        }

        controller.play_previous();

        assert_eq!(
            playback_calls(&state),
            vec![Call::PlayTags(vec![tag("c.mp3")])]
        );
    }

    #[test]
    fn interrupt_covers_extra_tags_too() {
        let (mut controller, state) = controller();
        controller.save_question_tags(vec![tag("a.mp3")]);
        controller.annotate_text("[sound:x.mp3]", Side::Question, false);
        controller.on_began_playing(&tag("a.mp3"));
        {
            let mut state = state.lock().unwrap();
            state.pending = vec![tag("x.mp3")];
            state.calls.clear();
        }

        controller.play_next();

        assert_eq!(
            playback_calls(&state),
            vec![Call::PlayTags(vec![tag("x.mp3")])]
        );
    }

    // ===== Highlight Tracking =====

    #[test]
    fn began_playing_updates_anchor_and_queues_highlight() {
        let (mut controller, _state) = controller();
        controller.save_answer_tags(vec![tag("a.mp3"), tag("b.mp3")]);

        controller.on_began_playing(&tag("b.mp3"));

        assert_eq!(controller.current_sound().side, Side::Answer);
        assert_eq!(controller.current_sound().index, 1);
        assert_eq!(
            controller.drain_commands(),
            vec![SurfaceCommand::HighlightPlayButton {
                side: Side::Answer,
                index: 1,
                color: "lightblue".to_string(),
                delay_ms: HIGHLIGHT_DELAY_MS,
            }]
        );
    }

    #[test]
    fn began_playing_outside_registry_is_ignored() {
        let (mut controller, _state) = controller();
        controller.save_question_tags(vec![tag("a.mp3")]);

        controller.on_began_playing(&tag("ui-chime.mp3"));

        assert_eq!(*controller.current_sound(), CurrentSound::sentinel());
        assert!(!controller.has_pending_commands());
    }

    #[test]
    fn ended_playing_queues_highlight_clear() {
        let (mut controller, _state) = controller();

        controller.on_ended_playing();

        assert_eq!(
            controller.drain_commands(),
            vec![SurfaceCommand::ClearHighlights {
                delay_ms: HIGHLIGHT_DELAY_MS,
            }]
        );
    }

    #[test]
    fn drain_empties_the_command_queue() {
        let (mut controller, _state) = controller();
        controller.on_ended_playing();

        assert!(controller.has_pending_commands());
        controller.drain_commands();
        assert!(!controller.has_pending_commands());
        assert!(controller.drain_commands().is_empty());
    }

    // ===== Annotation =====

    #[test]
    fn annotate_numbers_controls_after_declared_tags() {
        let (mut controller, _state) = controller();
        controller.save_question_tags(vec![tag("a.mp3")]);

        let (rewritten, added) =
            controller.annotate_text("[sound:x.mp3] [sound:y.mp3]", Side::Question, false);

        assert_eq!(added, vec![tag("x.mp3"), tag("y.mp3")]);
        assert!(rewritten.contains("recall_playback:play:q:1"));
        assert!(rewritten.contains("recall_playback:play:q:2"));
        assert_eq!(
            controller.effective_tags(Side::Question),
            vec![tag("a.mp3"), tag("x.mp3"), tag("y.mp3")]
        );
    }

    #[test]
    fn annotate_with_auto_play_enqueues_and_kicks_playback() {
        let (mut controller, state) = controller();

        controller.annotate_text("[sound:x.mp3]", Side::Answer, true);

        assert_eq!(
            playback_calls(&state),
            vec![
                Call::EnqueueTags(vec![tag("x.mp3")]),
                Call::PlayNextIfIdle,
            ]
        );
    }

    #[test]
    fn annotate_without_references_touches_nothing() {
        let (mut controller, state) = controller();

        let (rewritten, added) = controller.annotate_text("plain text", Side::Question, true);

        assert_eq!(rewritten, "plain text");
        assert!(added.is_empty());
        assert!(playback_calls(&state).is_empty());
        assert!(controller.effective_tags(Side::Question).is_empty());
    }

    // ===== Speed Control =====

    #[test]
    fn speed_up_then_slow_down_restores_prior_speed() {
        let (mut controller, _state) = controller();

        let faster = controller.speed_up().unwrap();
        assert!((faster - 1.1).abs() < 1e-9);

        let restored = controller.slow_down().unwrap();
        assert!((restored - 1.0).abs() < 1e-9);
    }

    #[test]
    fn speed_up_queues_notification_and_indicator_adjust() {
        let (mut controller, _state) = controller();

        controller.speed_up().unwrap();

        let commands = controller.drain_commands();
        assert!(matches!(
            commands[0],
            SurfaceCommand::Notify { ref message } if message.starts_with("Audio Speed +0.1")
        ));
        assert_eq!(
            commands[1],
            SurfaceCommand::AdjustRateIndicator { delta: 0.1 }
        );
    }

    #[test]
    fn reset_speed_always_returns_to_nominal() {
        let (mut controller, state) = controller();
        state.lock().unwrap().speed = 2.5;

        let speed = controller.reset_speed().unwrap();

        assert_eq!(speed, 1.0);
        assert_eq!(state.lock().unwrap().speed, 1.0);
        let commands = controller.drain_commands();
        assert_eq!(commands.last(), Some(&SurfaceCommand::ResetRateIndicator));
    }

    // ===== Bridge Messages =====

    #[test]
    fn bridge_play_message_plays_effective_index() {
        let (mut controller, state) = controller();
        controller.save_question_tags(vec![tag("a.mp3")]);
        controller.annotate_text("[sound:x.mp3]", Side::Question, false);

        assert!(controller.handle_message("recall_playback:play:q:1"));

        assert_eq!(
            playback_calls(&state),
            vec![Call::PlayFile("x.mp3".to_string())]
        );
    }

    #[test]
    fn bridge_message_for_other_feature_is_not_handled() {
        let (mut controller, state) = controller();

        assert!(!controller.handle_message("other_feature:play:q:0"));
        assert!(playback_calls(&state).is_empty());
    }

    #[test]
    fn bridge_play_out_of_range_is_consumed_without_action() {
        let (mut controller, state) = controller();
        controller.save_question_tags(vec![tag("a.mp3")]);

        assert!(controller.handle_message("recall_playback:play:q:7"));
        assert!(controller.handle_message("recall_playback:unknown:stuff"));
        assert!(playback_calls(&state).is_empty());
    }

    // ===== Actions =====

    #[test]
    fn action_table_uses_configured_shortcuts() {
        let config = PlaybackConfig {
            play_next_shortcut: "Alt+N".to_string(),
            ..PlaybackConfig::default()
        };
        let (backend, _state) = RecordingBackend::new();
        let controller = PlaybackController::new(config, Box::new(backend));

        let actions = controller.actions();
        assert_eq!(actions.len(), 5);
        let next = actions
            .iter()
            .find(|(_, _, action)| *action == Action::PlayNext)
            .unwrap();
        assert_eq!(next.0, "Play Next Audio");
        assert_eq!(next.1, "Alt+N");
    }

    #[test]
    fn invoke_dispatches_navigation() {
        let (mut controller, state) = controller();
        controller.save_question_tags(vec![tag("a.mp3"), tag("b.mp3")]);

        controller.invoke(Action::PlayNext).unwrap();

        assert_eq!(
            playback_calls(&state),
            vec![Call::Stop, Call::PlayTags(vec![tag("b.mp3")])]
        );
    }

    // ===== End To End =====

    #[test]
    fn render_then_navigate_then_wrap() {
        let (mut controller, state) = controller();
        controller.save_question_tags(vec![tag("x.mp3"), tag("y.mp3")]);

        // next() from the sentinel anchor plays index 1
        controller.play_next();
        assert_eq!(
            playback_calls(&state),
            vec![Call::Stop, Call::PlayTags(vec![tag("y.mp3")])]
        );

        // the backend reports it began playing
        controller.on_began_playing(&tag("y.mp3"));
        assert_eq!(controller.current_sound().index, 1);

        // next() again wraps to index 0
        state.lock().unwrap().calls.clear();
        controller.play_next();
        assert_eq!(
            playback_calls(&state),
            vec![Call::Stop, Call::PlayTags(vec![tag("x.mp3")])]
        );
    }
}
