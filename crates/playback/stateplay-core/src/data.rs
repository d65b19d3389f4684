//! Authored animation state data: states, clips, audio, and cue events.
//!
//! Everything here is plain serde data so external tooling can persist a
//! state table as JSON. The one exception is the optional per-event action,
//! which is code rather than data and is skipped by serde.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a playable animation clip with its authored length.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClipRef {
    pub name: String,
    /// Clip length in seconds. The normalization denominator: a zero-length
    /// clip never advances normalized time.
    #[serde(rename = "length")]
    pub length_s: f32,
}

impl ClipRef {
    pub fn new(name: impl Into<String>, length_s: f32) -> Self {
        Self {
            name: name.into(),
            length_s,
        }
    }
}

/// The animation half of a state: which clip to display and whether it loops.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnimationSlot {
    #[serde(default)]
    pub clip: Option<ClipRef>,
    #[serde(default, rename = "loop")]
    pub looping: bool,
}

/// The audio half of a state. Volume is clamped to [0,1] at bind time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AudioSlot {
    #[serde(default)]
    pub clip: Option<String>,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

impl Default for AudioSlot {
    fn default() -> Self {
        Self {
            clip: None,
            volume: default_volume(),
        }
    }
}

fn default_volume() -> f32 {
    1.0
}

/// User code attached to a cue event, run synchronously from `tick`.
pub type EventAction = Box<dyn FnMut()>;

/// A timed cue on a state: a diagnostic name, a normalized trigger time, and
/// an optional action. The trigger time is clamped to [0,1] when the timeline
/// adopts it; the per-pass fired latch lives on the timeline entry.
#[derive(Default, Serialize, Deserialize)]
pub struct AnimationEvent {
    pub name: String,
    pub time: f32,
    #[serde(skip)]
    pub action: Option<EventAction>,
}

impl AnimationEvent {
    pub fn new(name: impl Into<String>, time: f32) -> Self {
        Self {
            name: name.into(),
            time,
            action: None,
        }
    }

    /// Attach the action to run when this cue fires.
    pub fn with_action(mut self, action: impl FnMut() + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }
}

impl fmt::Debug for AnimationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationEvent")
            .field("name", &self.name)
            .field("time", &self.time)
            .field("action", &self.action.as_ref().map(|_| "FnMut"))
            .finish()
    }
}

/// An authored state: a named bundle of one animation clip, loop flag, one
/// audio clip, and an ordered list of cue events.
///
/// States are owned by the engine's library; playback only ever references
/// them. An ad hoc override state may also be passed to
/// `PlaybackEngine::play_override` under an authored name.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnimationState {
    /// Unique lookup key within the library (first match wins).
    pub name: String,
    #[serde(default)]
    pub animation: AnimationSlot,
    #[serde(default)]
    pub audio: AudioSlot,
    #[serde(default)]
    pub events: Vec<AnimationEvent>,
    /// Arbitrary authoring-tool payload (unused by core logic but preserved).
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl AnimationState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_clip(mut self, clip: ClipRef, looping: bool) -> Self {
        self.animation = AnimationSlot {
            clip: Some(clip),
            looping,
        };
        self
    }

    pub fn with_audio(mut self, clip: impl Into<String>, volume: f32) -> Self {
        self.audio = AudioSlot {
            clip: Some(clip.into()),
            volume,
        };
        self
    }

    pub fn with_event(mut self, event: AnimationEvent) -> Self {
        self.events.push(event);
        self
    }
}
