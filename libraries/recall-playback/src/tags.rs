//! Two-tier sound tag registry
//!
//! Tracks the clips known for the current card, split per side into:
//! - Declared tags: announced by the host when a side is about to render
//! - Extra tags: discovered by scanning rendered text for inline references
//!
//! The effective sequence for a side is always declared followed by extra,
//! concatenated at read time.

use tracing::debug;

use crate::types::{Side, SoundTag};

/// Ordered clip sequences, one per card side
///
/// Plain indexed storage: insertion order preserved, no sorting, no
/// de-duplication.
#[derive(Debug, Clone, Default)]
pub struct SoundTagList {
    question: Vec<SoundTag>,
    answer: Vec<SoundTag>,
}

impl SoundTagList {
    /// Create empty lists for both sides
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the sequence for a side
    pub fn side(&self, side: Side) -> &[SoundTag] {
        match side {
            Side::Question => &self.question,
            Side::Answer => &self.answer,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut Vec<SoundTag> {
        match side {
            Side::Question => &mut self.question,
            Side::Answer => &mut self.answer,
        }
    }

    /// Replace the sequence for a side
    pub fn set(&mut self, side: Side, tags: Vec<SoundTag>) {
        *self.side_mut(side) = tags;
    }

    /// Append tags to a side in order
    pub fn append(&mut self, side: Side, tags: impl IntoIterator<Item = SoundTag>) {
        self.side_mut(side).extend(tags);
    }

    /// Reset a side to empty
    pub fn clear(&mut self, side: Side) {
        self.side_mut(side).clear();
    }
}

/// Registry of the clips known for the current card
///
/// Declared and extra tags are kept in independent lists so declared tags
/// can be replaced wholesale without disturbing unrelated bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct SoundTagRegistry {
    declared: SoundTagList,
    extra: SoundTagList,
}

impl SoundTagRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the declared tags for a side
    ///
    /// Also resets the side's extra tags: dynamically discovered tags from
    /// a previous rendering are stale and must not persist into the next.
    /// Indices computed against the old effective sequence become invalid.
    pub fn set_declared(&mut self, side: Side, tags: Vec<SoundTag>) {
        debug!(side = side.code(), count = tags.len(), "declared tags set");
        self.declared.set(side, tags);
        self.extra.clear(side);
    }

    /// Append dynamically discovered tags to a side
    pub fn append_extra(&mut self, side: Side, tags: Vec<SoundTag>) {
        self.extra.append(side, tags);
    }

    /// Effective sequence for a side: declared followed by extra
    pub fn effective(&self, side: Side) -> Vec<SoundTag> {
        self.declared
            .side(side)
            .iter()
            .chain(self.extra.side(side).iter())
            .cloned()
            .collect()
    }

    /// Length of a side's effective sequence without materializing it
    pub fn effective_len(&self, side: Side) -> usize {
        self.declared.side(side).len() + self.extra.side(side).len()
    }

    /// Locate a tag within the effective sequences
    ///
    /// Scans the question side, then the answer side, and returns the side
    /// and position of the first value-equal match. `None` is an expected
    /// outcome: many playback events originate from clips outside the
    /// registry (other UI audio, for example).
    pub fn find(&self, tag: &SoundTag) -> Option<(Side, usize)> {
        for side in [Side::Question, Side::Answer] {
            let position = self
                .declared
                .side(side)
                .iter()
                .chain(self.extra.side(side).iter())
                .position(|t| t == tag);
            if let Some(index) = position {
                return Some((side, index));
            }
        }
        None
    }
}
