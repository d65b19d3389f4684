//! Output contracts from the playback core.
//!
//! Outputs carry the mixer pose for this tick plus a list of semantic
//! events. Adapters apply the mixer snapshot to the host rig and audio
//! output and transport events wherever the application wants them.

use serde::{Deserialize, Serialize};

use crate::audio::AudioBinding;

/// One connected mixer input for this tick.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MixerInput {
    pub clip: String,
    /// Playhead in seconds.
    pub time: f32,
    pub weight: f32,
}

/// Snapshot of the two-input mixer after a tick. `incoming` is only present
/// while a crossfade is in flight.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MixerSnapshot {
    #[serde(default)]
    pub current: Option<MixerInput>,
    #[serde(default)]
    pub incoming: Option<MixerInput>,
}

/// Discrete semantic signals emitted during stepping.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub enum CoreEvent {
    /// A state was adopted from idle (hard cut, no outgoing clip).
    PlaybackStarted { state: String },
    /// A crossfade toward `to` began.
    TransitionStarted {
        from: String,
        to: String,
        duration: f32,
    },
    /// The crossfade resolved; `to` is now the stable source.
    TransitionCompleted { to: String },
    /// A cue on the active state fired.
    CueFired { state: String, cue: String, time: f32 },
    /// A looping state wrapped back to normalized time 0.
    LoopRestarted { state: String },
    /// A non-looping state completed its pass.
    PlaybackEnded { state: String },
    /// Audio was rebound to the active state.
    AudioBound { binding: AudioBinding },
    /// Audio was cut to silence (state without an audio clip, or teardown).
    AudioUnbound,
}

/// Outputs returned by `PlaybackEngine::tick()`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub mixer: MixerSnapshot,
    #[serde(default)]
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.mixer = MixerSnapshot::default();
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mixer.current.is_none() && self.mixer.incoming.is_none() && self.events.is_empty()
    }
}
