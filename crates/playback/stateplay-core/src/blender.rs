//! Two-slot crossfade mixer for clip sources.

use crate::source::ClipSource;

/// Mixer phase. The slots live inside the variants, so an incoming source
/// can only exist while a blend is actually in flight.
#[derive(Debug, Default)]
enum MixPhase {
    /// Nothing connected (fresh graph, or after teardown).
    #[default]
    Idle,
    /// One source at full weight.
    Stable { current: ClipSource },
    /// Crossfading `current` out and `next` in over `duration` seconds.
    Blending {
        current: ClipSource,
        next: ClipSource,
        duration: f32,
        progress: f32,
    },
}

/// Owns the two mixer slots and drives linear crossfade weights.
#[derive(Debug, Default)]
pub struct TransitionBlender {
    phase: MixPhase,
}

impl TransitionBlender {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a crossfade is in flight.
    #[inline]
    pub fn is_blending(&self) -> bool {
        matches!(self.phase, MixPhase::Blending { .. })
    }

    /// True when any source is connected.
    #[inline]
    pub fn has_source(&self) -> bool {
        !matches!(self.phase, MixPhase::Idle)
    }

    /// Connect `source` alone at full weight, dropping anything held before.
    pub fn cut_to(&mut self, source: ClipSource) {
        self.phase = MixPhase::Stable { current: source };
    }

    /// Start crossfading toward `next` over `duration` seconds.
    ///
    /// A request while a blend is already in flight is dropped (the incoming
    /// source with it); from `Idle` this degrades to a hard cut since there
    /// is nothing to fade from. Non-positive durations still route through
    /// the blending phase and resolve on the next tick.
    pub fn begin_transition(&mut self, next: ClipSource, duration: f32) {
        match std::mem::take(&mut self.phase) {
            MixPhase::Idle => self.phase = MixPhase::Stable { current: next },
            MixPhase::Stable { current } => {
                self.phase = MixPhase::Blending {
                    current,
                    next,
                    duration,
                    progress: 0.0,
                };
            }
            blending @ MixPhase::Blending { .. } => {
                log::debug!("transition requested while one is in flight; ignoring");
                self.phase = blending;
            }
        }
    }

    /// Advance both playheads and the blend weight by `dt` seconds.
    ///
    /// Completing a blend promotes the incoming source to the stable slot and
    /// drops the outgoing one; returns true on the tick that promotes.
    pub fn tick(&mut self, dt: f32) -> bool {
        match std::mem::take(&mut self.phase) {
            MixPhase::Idle => false,
            MixPhase::Stable { mut current } => {
                current.advance(dt);
                self.phase = MixPhase::Stable { current };
                false
            }
            MixPhase::Blending {
                mut current,
                mut next,
                duration,
                progress,
            } => {
                current.advance(dt);
                next.advance(dt);
                // A non-positive duration is an instantaneous cut; skip the
                // division so progress never sees dt / 0.
                let progress = progress + if duration > 0.0 { dt / duration } else { 1.0 };
                if progress >= 1.0 {
                    self.phase = MixPhase::Stable { current: next };
                    true
                } else {
                    self.phase = MixPhase::Blending {
                        current,
                        next,
                        duration,
                        progress,
                    };
                    false
                }
            }
        }
    }

    /// Blend weights as (current, next).
    #[inline]
    pub fn weights(&self) -> (f32, f32) {
        match &self.phase {
            MixPhase::Idle => (0.0, 0.0),
            MixPhase::Stable { .. } => (1.0, 0.0),
            MixPhase::Blending { progress, .. } => {
                let next = progress.clamp(0.0, 1.0);
                (1.0 - next, next)
            }
        }
    }

    /// Slot contents as (current, next).
    #[inline]
    pub fn slots(&self) -> (Option<&ClipSource>, Option<&ClipSource>) {
        match &self.phase {
            MixPhase::Idle => (None, None),
            MixPhase::Stable { current } => (Some(current), None),
            MixPhase::Blending { current, next, .. } => (Some(current), Some(next)),
        }
    }

    /// The displayed source: the incoming clip while blending, else the
    /// stable one. Cue firing and loop handling follow this source.
    #[inline]
    pub fn active(&self) -> Option<&ClipSource> {
        match &self.phase {
            MixPhase::Idle => None,
            MixPhase::Stable { current } => Some(current),
            MixPhase::Blending { next, .. } => Some(next),
        }
    }

    #[inline]
    pub fn active_mut(&mut self) -> Option<&mut ClipSource> {
        match &mut self.phase {
            MixPhase::Idle => None,
            MixPhase::Stable { current } => Some(current),
            MixPhase::Blending { next, .. } => Some(next),
        }
    }

    /// Disconnect and drop both slots. Idempotent.
    pub fn clear(&mut self) {
        self.phase = MixPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AnimationSlot, ClipRef};

    fn source(name: &str, length_s: f32) -> ClipSource {
        let slot = AnimationSlot {
            clip: Some(ClipRef::new(name, length_s)),
            looping: false,
        };
        ClipSource::create(name, &slot).unwrap()
    }

    #[test]
    fn linear_weights_and_promotion() {
        let mut blender = TransitionBlender::new();
        blender.cut_to(source("a", 1.0));
        blender.begin_transition(source("b", 1.0), 0.5);
        assert!(blender.is_blending());
        assert_eq!(blender.weights(), (1.0, 0.0));

        assert!(!blender.tick(0.25));
        let (wc, wn) = blender.weights();
        assert!((wc - 0.5).abs() < 1e-6 && (wn - 0.5).abs() < 1e-6);

        assert!(blender.tick(0.25));
        assert!(!blender.is_blending());
        assert_eq!(blender.weights(), (1.0, 0.0));
        assert_eq!(blender.active().unwrap().clip_name(), "b");
        assert!(blender.slots().1.is_none());
    }

    #[test]
    fn reentrant_transition_is_dropped() {
        let mut blender = TransitionBlender::new();
        blender.cut_to(source("a", 1.0));
        blender.begin_transition(source("b", 1.0), 1.0);
        blender.tick(0.25);

        blender.begin_transition(source("c", 1.0), 1.0);
        let (_, wn) = blender.weights();
        assert!((wn - 0.25).abs() < 1e-6, "progress must be untouched");
        assert_eq!(blender.active().unwrap().clip_name(), "b");
    }

    #[test]
    fn zero_duration_resolves_on_next_tick() {
        let mut blender = TransitionBlender::new();
        blender.cut_to(source("a", 1.0));
        blender.begin_transition(source("b", 1.0), 0.0);
        assert!(blender.is_blending());
        assert!(blender.tick(0.016));
        assert_eq!(blender.active().unwrap().clip_name(), "b");
        assert_eq!(blender.weights(), (1.0, 0.0));
    }

    #[test]
    fn begin_from_idle_degrades_to_cut() {
        let mut blender = TransitionBlender::new();
        blender.begin_transition(source("a", 1.0), 0.5);
        assert!(!blender.is_blending());
        assert_eq!(blender.weights(), (1.0, 0.0));
    }

    #[test]
    fn displayed_source_is_the_incoming_clip() {
        let mut blender = TransitionBlender::new();
        blender.cut_to(source("a", 1.0));
        blender.begin_transition(source("b", 2.0), 1.0);
        assert_eq!(blender.active().unwrap().clip_name(), "b");
    }
}
