//! Stateplay playback core (engine-agnostic)
//!
//! Drives named animation states (clip + loop flag + synchronized audio +
//! timed cue events) for a single animated actor, with linear crossfade
//! transitions between states. The host calls [`PlaybackEngine::tick`] once
//! per frame and applies the returned mixer snapshot and events to its own
//! rig and audio output; everything else is synchronous method calls on one
//! logical thread.

pub mod audio;
pub mod blender;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod ids;
pub mod library;
pub mod outputs;
pub mod source;
pub mod timeline;

// Re-exports for consumers (adapters)
pub use audio::{AudioBinding, AudioSync};
pub use blender::TransitionBlender;
pub use config::Config;
pub use data::{AnimationEvent, AnimationSlot, AnimationState, AudioSlot, ClipRef, EventAction};
pub use engine::PlaybackEngine;
pub use error::PlaybackError;
pub use ids::{IdAllocator, StateId};
pub use library::StateLibrary;
pub use outputs::{CoreEvent, MixerInput, MixerSnapshot, Outputs};
pub use source::ClipSource;
pub use timeline::EventTimeline;

/// Playback core result type.
pub type Result<T> = std::result::Result<T, PlaybackError>;
