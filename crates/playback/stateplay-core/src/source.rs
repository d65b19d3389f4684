//! Playable clip sources: single-owner playheads over authored clips.

use crate::data::AnimationSlot;
use crate::error::PlaybackError;

/// One playable clip instance: the clip reference plus a playhead in seconds.
///
/// A source is owned by exactly one mixer slot at a time and is released by
/// dropping it with the slot; it is deliberately not `Clone`, so a playhead
/// can never be aliased.
#[derive(Debug)]
pub struct ClipSource {
    clip_name: String,
    length_s: f32,
    time_s: f32,
}

impl ClipSource {
    /// Create a source for a state's animation slot with the playhead at 0.
    /// Fails with `InvalidClip` when the slot has no clip assigned.
    pub fn create(state_name: &str, slot: &AnimationSlot) -> Result<Self, PlaybackError> {
        let clip = slot
            .clip
            .as_ref()
            .ok_or_else(|| PlaybackError::InvalidClip {
                state: state_name.to_string(),
            })?;
        Ok(Self {
            clip_name: clip.name.clone(),
            length_s: clip.length_s,
            time_s: 0.0,
        })
    }

    #[inline]
    pub fn clip_name(&self) -> &str {
        &self.clip_name
    }

    /// Playhead position in seconds.
    #[inline]
    pub fn current_time(&self) -> f32 {
        self.time_s
    }

    #[inline]
    pub fn set_time(&mut self, t: f32) {
        self.time_s = t;
    }

    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.time_s += dt;
    }

    /// Playhead divided by clip length. Non-positive lengths pin this to 0
    /// rather than dividing by zero.
    #[inline]
    pub fn normalized_time(&self) -> f32 {
        if self.length_s <= 0.0 {
            0.0
        } else {
            self.time_s / self.length_s
        }
    }
}
