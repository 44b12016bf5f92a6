//! Inline sound reference rewriting
//!
//! Scans rendered review text for `[sound:...]` markers and replaces each
//! with an interactive play button whose bridge message carries the clip's
//! final position in the side's effective sequence.
//!
//! Scanning is pure: it computes indices against a snapshot of the current
//! effective length and returns the discovered tags. Appending them to the
//! registry (and any auto-play) happens afterwards in the controller, so
//! the embedded indices match post-mutation state exactly.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::types::{Side, SoundTag};

/// Prefix for bridge messages originating from our controls
pub const BRIDGE_PREFIX: &str = "recall_playback";

static SOUND_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[sound:(.*?)\]").expect("sound reference pattern"));

/// Rewrite inline sound references into play button controls
///
/// `base_index` is the length of the side's effective sequence before this
/// call; the n-th reference found (left to right) is numbered
/// `base_index + n`. Returns the rewritten text and the discovered tags in
/// match order. Text without well-formed references passes through
/// untouched.
pub(crate) fn rewrite_sound_refs(
    text: &str,
    side: Side,
    base_index: usize,
) -> (String, Vec<SoundTag>) {
    let mut added: Vec<SoundTag> = Vec::new();
    let rewritten = SOUND_REF_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let filename = &caps[1];
            let index = base_index + added.len();
            added.push(SoundTag::new(filename));
            play_button(side, index)
        })
        .into_owned();
    (rewritten, added)
}

/// Markup for one interactive play button
///
/// Clicking sends `recall_playback:play:{side}:{index}` over the bridge.
fn play_button(side: Side, index: usize) -> String {
    format!(
        r##"<a class="replay-button soundLink" href=# onclick="pycmd('{prefix}:play:{side}:{index}'); return false;">
    <svg class="playImage" viewBox="0 0 64 64" version="1.1">
        <circle cx="32" cy="32" r="29" />
        <path d="M56.502,32.301l-37.502,20.101l0.329,-40.804l37.173,20.703Z" />
    </svg>
</a>"##,
        prefix = BRIDGE_PREFIX,
        side = side.code(),
        index = index,
    )
}
