//! Audio binding that follows the active animation state.

use serde::{Deserialize, Serialize};

use crate::data::AudioSlot;

/// The audio resource bound for the active state, as adapters should play it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AudioBinding {
    pub clip: String,
    /// Clamped to [0,1] at bind time.
    pub volume: f32,
    /// Mirrors the owning state's *animation* loop flag.
    pub looping: bool,
}

/// Binds one audio source to the active animation state.
///
/// Audio never crossfades: rebinding drops the previous binding outright and
/// creates a fresh one, so a state switch cuts audio on the same frame.
#[derive(Default, Debug)]
pub struct AudioSync {
    bound: Option<AudioBinding>,
}

impl AudioSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebind to the given state's audio, dropping whatever was bound before.
    /// States without an audio clip leave the output silent. Returns the new
    /// binding, if any.
    pub fn bind(&mut self, audio: &AudioSlot, looping: bool) -> Option<&AudioBinding> {
        self.bound = audio.clip.as_ref().map(|clip| AudioBinding {
            clip: clip.clone(),
            volume: audio.volume.clamp(0.0, 1.0),
            looping,
        });
        self.bound.as_ref()
    }

    /// Drop the bound source, if any. Safe to call repeatedly.
    pub fn unbind(&mut self) {
        self.bound = None;
    }

    /// The active binding, if any.
    #[inline]
    pub fn current(&self) -> Option<&AudioBinding> {
        self.bound.as_ref()
    }
}
