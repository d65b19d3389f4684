//! PlaybackEngine: the per-actor orchestrator that owns the blend graph.
//!
//! Tick order per frame:
//! 1. If a state is active, feed the cue timeline with the displayed clip's
//!    normalized time, then handle loop restart.
//! 2. Advance the crossfade mixer (weights and playheads).
//!
//! Cues and loop handling always follow the *displayed* clip (the incoming
//! one while a crossfade is in flight), regardless of blend weight.

use crate::audio::AudioSync;
use crate::blender::TransitionBlender;
use crate::config::Config;
use crate::data::{AnimationState, AudioSlot};
use crate::error::PlaybackError;
use crate::ids::{IdAllocator, StateId};
use crate::library::StateLibrary;
use crate::outputs::{CoreEvent, MixerInput, MixerSnapshot, Outputs};
use crate::source::ClipSource;
use crate::timeline::EventTimeline;

/// Which state drives playback right now.
#[derive(Debug, Default)]
enum ActiveState {
    #[default]
    None,
    Authored(StateId),
    /// Ad hoc state supplied via `play_override`, adopted under an authored
    /// name for the duration of its pass.
    Override(Box<AnimationState>),
}

/// Per-actor playback engine: owns the state library, the two-slot mixer,
/// the audio binding, and the cue timeline. Created once per actor and torn
/// down once via [`PlaybackEngine::destroy`].
#[derive(Debug)]
pub struct PlaybackEngine {
    cfg: Config,
    ids: IdAllocator,
    states: StateLibrary,
    blender: TransitionBlender,
    audio: AudioSync,
    timeline: EventTimeline,
    active: ActiveState,
    /// Set once a non-looping pass has reported completion.
    pass_reported: bool,
    /// Events raised since the last tick, delivered by the next one.
    pending: Vec<CoreEvent>,
    outputs: Outputs,
}

impl PlaybackEngine {
    /// Create a new engine with the given config.
    pub fn new(cfg: Config) -> Self {
        Self {
            timeline: EventTimeline::with_capacity(cfg.cue_capacity),
            cfg,
            ids: IdAllocator::new(),
            states: StateLibrary::new(),
            blender: TransitionBlender::new(),
            audio: AudioSync::new(),
            active: ActiveState::None,
            pass_reported: false,
            pending: Vec::new(),
            outputs: Outputs::default(),
        }
    }

    /// Load an authored state, returning its id. Playback stays name-keyed;
    /// the id is for editing and introspection.
    pub fn add_state(&mut self, state: AnimationState) -> StateId {
        let id = self.ids.alloc_state();
        self.states.insert(id, state);
        id
    }

    #[inline]
    pub fn state(&self, id: StateId) -> Option<&AnimationState> {
        self.states.get(id)
    }

    /// Name lookup over the authored table (first match wins).
    #[inline]
    pub fn find_state(&self, name: &str) -> Option<StateId> {
        self.states.find_by_name(name)
    }

    #[inline]
    pub fn library(&self) -> &StateLibrary {
        &self.states
    }

    /// Name of the state driving playback, if any.
    pub fn active_state_name(&self) -> Option<&str> {
        match &self.active {
            ActiveState::None => None,
            ActiveState::Authored(id) => self.states.get(*id).map(|s| s.name.as_str()),
            ActiveState::Override(state) => Some(state.name.as_str()),
        }
    }

    /// True while a crossfade is in flight.
    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.blender.is_blending()
    }

    /// Normalized playhead of the displayed clip; 0 when idle.
    pub fn normalized_time(&self) -> f32 {
        self.blender
            .active()
            .map(|source| source.normalized_time())
            .unwrap_or(0.0)
    }

    /// True iff `name` is the active state and its current pass has not
    /// completed. Looping states stay playing once active.
    pub fn is_playing(&self, name: &str) -> bool {
        self.active_state_name() == Some(name) && self.normalized_time() < 1.0
    }

    /// Switch playback to the authored state `name`, crossfading over
    /// `transition` seconds (non-positive means a hard cut on the next tick).
    ///
    /// Re-entrancy guard: the request is silently dropped while the same
    /// state is still inside its pass, or while a crossfade is in flight.
    /// On error nothing about playback changes.
    pub fn play(&mut self, name: &str, transition: f32) -> Result<(), PlaybackError> {
        if self.is_playing(name) {
            log::debug!("play('{name}') ignored: state already active in its pass");
            return Ok(());
        }
        if self.blender.is_blending() {
            log::debug!("play('{name}') ignored: transition in flight");
            return Ok(());
        }
        let Some(id) = self.states.find_by_name(name) else {
            return Err(PlaybackError::StateNotFound {
                name: name.to_string(),
            });
        };

        let (source, looping, audio) = match self.states.get(id) {
            Some(state) => (
                ClipSource::create(&state.name, &state.animation)?,
                state.animation.looping,
                state.audio.clone(),
            ),
            None => {
                return Err(PlaybackError::StateNotFound {
                    name: name.to_string(),
                })
            }
        };

        // Adopting a state rebuilds the cue schedule, which also clears the
        // outgoing state's fired latches.
        if let Some(state) = self.states.get(id) {
            self.timeline.register(&state.events);
        }
        self.connect(source, name, transition);
        self.rebind_audio(&audio, looping);
        self.active = ActiveState::Authored(id);
        self.pass_reported = false;
        Ok(())
    }

    /// Play a caller-supplied one-off state under the authored name `name`.
    ///
    /// The authored state must exist (the lookup validates the name and
    /// supplies identity) and the override must carry an animation clip;
    /// otherwise the previous playback state is left untouched.
    pub fn play_override(
        &mut self,
        name: &str,
        mut override_state: AnimationState,
        transition: f32,
    ) -> Result<(), PlaybackError> {
        if self.is_playing(name) {
            log::debug!("play_override('{name}') ignored: state already active in its pass");
            return Ok(());
        }
        if self.blender.is_blending() {
            log::debug!("play_override('{name}') ignored: transition in flight");
            return Ok(());
        }
        if self.states.find_by_name(name).is_none() {
            return Err(PlaybackError::StateNotFound {
                name: name.to_string(),
            });
        }
        if override_state.animation.clip.is_none() {
            return Err(PlaybackError::OverrideMissingClip {
                name: name.to_string(),
            });
        }

        // The override plays under the authored identity.
        override_state.name = name.to_string();
        let source = ClipSource::create(&override_state.name, &override_state.animation)?;
        self.timeline.register(&override_state.events);
        let looping = override_state.animation.looping;
        let audio = override_state.audio.clone();
        self.connect(source, name, transition);
        self.rebind_audio(&audio, looping);
        self.active = ActiveState::Override(Box::new(override_state));
        self.pass_reported = false;
        Ok(())
    }

    /// Advance one frame, returning the mixer snapshot and events to apply.
    pub fn tick(&mut self, dt: f32) -> &Outputs {
        self.outputs.clear();

        // 1) Cues, then loop restart, against the displayed clip's time.
        if !matches!(self.active, ActiveState::None) {
            self.process_cues();
            self.process_loop();
        }

        // 2) Advance weights and playheads.
        if self.blender.tick(dt) {
            if let Some(to) = self.active_state_name().map(str::to_string) {
                self.pending.push(CoreEvent::TransitionCompleted { to });
            }
        }

        self.flush_events();
        self.snapshot_mixer();
        &self.outputs
    }

    /// Tear down the blend graph: drop both mixer slots, the audio binding,
    /// the cue schedule, and the active state. Safe to call more than once.
    pub fn destroy(&mut self) {
        self.blender.clear();
        self.audio.unbind();
        self.timeline.clear();
        self.active = ActiveState::None;
        self.pass_reported = false;
        self.pending.clear();
        self.outputs.clear();
    }

    /// Route a freshly created source into the mixer and queue the matching
    /// signal: a crossfade when something is already connected, a hard cut
    /// from idle.
    fn connect(&mut self, source: ClipSource, to: &str, transition: f32) {
        if self.blender.has_source() {
            let from = self.active_state_name().unwrap_or_default().to_string();
            self.blender.begin_transition(source, transition);
            self.pending.push(CoreEvent::TransitionStarted {
                from,
                to: to.to_string(),
                duration: transition.max(0.0),
            });
        } else {
            self.blender.cut_to(source);
            self.pending.push(CoreEvent::PlaybackStarted {
                state: to.to_string(),
            });
        }
    }

    fn rebind_audio(&mut self, audio: &AudioSlot, looping: bool) {
        let binding = self.audio.bind(audio, looping).cloned();
        match binding {
            Some(binding) => self.pending.push(CoreEvent::AudioBound { binding }),
            None => self.pending.push(CoreEvent::AudioUnbound),
        }
    }

    /// Fire due cues: queue the `CueFired` signal, then run the user action.
    /// Actions execute synchronously; a panic propagates out of `tick` with
    /// the fired latch already set.
    fn process_cues(&mut self) {
        let u = match self.blender.active() {
            Some(source) => source.normalized_time(),
            None => return,
        };
        let state_name = match self.active_state_name() {
            Some(name) => name.to_string(),
            None => return,
        };

        let timeline = &mut self.timeline;
        let states = &mut self.states;
        let active = &mut self.active;
        let pending = &mut self.pending;
        timeline.on_tick(u, |source_idx, cue, time| {
            pending.push(CoreEvent::CueFired {
                state: state_name.clone(),
                cue: cue.to_string(),
                time,
            });
            let event = match active {
                ActiveState::None => None,
                ActiveState::Authored(id) => states
                    .get_mut(*id)
                    .and_then(|state| state.events.get_mut(source_idx)),
                ActiveState::Override(state) => state.events.get_mut(source_idx),
            };
            if let Some(event) = event {
                if let Some(action) = event.action.as_mut() {
                    action();
                }
            }
        });
    }

    /// Wrap a looping pass back to 0 and re-arm its cues; report the end of
    /// a non-looping pass exactly once.
    fn process_loop(&mut self) {
        let u = match self.blender.active() {
            Some(source) => source.normalized_time(),
            None => return,
        };
        if u < 1.0 {
            return;
        }
        let Some(state_name) = self.active_state_name().map(str::to_string) else {
            return;
        };

        if self.active_looping() {
            if let Some(source) = self.blender.active_mut() {
                source.set_time(0.0);
            }
            self.timeline.reset_all();
            self.pending
                .push(CoreEvent::LoopRestarted { state: state_name });
        } else if !self.pass_reported {
            self.pass_reported = true;
            self.pending
                .push(CoreEvent::PlaybackEnded { state: state_name });
        }
    }

    fn active_looping(&self) -> bool {
        match &self.active {
            ActiveState::None => false,
            ActiveState::Authored(id) => self
                .states
                .get(*id)
                .map(|state| state.animation.looping)
                .unwrap_or(false),
            ActiveState::Override(state) => state.animation.looping,
        }
    }

    fn flush_events(&mut self) {
        if self.pending.len() > self.cfg.max_events_per_tick {
            log::warn!(
                "dropping {} playback events past the per-tick cap",
                self.pending.len() - self.cfg.max_events_per_tick
            );
            self.pending.truncate(self.cfg.max_events_per_tick);
        }
        self.outputs.events.append(&mut self.pending);
    }

    fn snapshot_mixer(&mut self) {
        let (current_weight, incoming_weight) = self.blender.weights();
        let (current, incoming) = self.blender.slots();
        self.outputs.mixer = MixerSnapshot {
            current: current.map(|source| MixerInput {
                clip: source.clip_name().to_string(),
                time: source.current_time(),
                weight: current_weight,
            }),
            incoming: incoming.map(|source| MixerInput {
                clip: source.clip_name().to_string(),
                time: source.current_time(),
                weight: incoming_weight,
            }),
        };
    }
}
