use std::cell::RefCell;
use std::rc::Rc;

use stateplay_core::{
    AnimationEvent, AnimationState, ClipRef, Config, CoreEvent, PlaybackEngine, PlaybackError,
};

fn clip_state(name: &str, length_s: f32, looping: bool) -> AnimationState {
    AnimationState::new(name).with_clip(ClipRef::new(format!("{name}.anim"), length_s), looping)
}

fn engine_with(states: Vec<AnimationState>) -> PlaybackEngine {
    let mut engine = PlaybackEngine::new(Config::default());
    for state in states {
        engine.add_state(state);
    }
    engine
}

fn counter() -> (Rc<RefCell<u32>>, impl FnMut()) {
    let count = Rc::new(RefCell::new(0u32));
    let handle = Rc::clone(&count);
    (count, move || *handle.borrow_mut() += 1)
}

fn cue_count(events: &[CoreEvent], cue: &str) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, CoreEvent::CueFired { cue: c, .. } if c == cue))
        .count()
}

/// it should fire each cue exactly once per pass and re-arm on loop restart
#[test]
fn looping_state_fires_cues_once_per_pass() {
    let (steps, on_step) = counter();
    let (plants, on_plant) = counter();
    let state = clip_state("run", 1.0, true)
        .with_event(AnimationEvent::new("step", 0.25).with_action(on_step))
        .with_event(AnimationEvent::new("plant", 0.5).with_action(on_plant));
    let mut engine = engine_with(vec![state]);

    engine.play("run", 0.0).unwrap();
    let mut fired = Vec::new();
    for _ in 0..5 {
        fired.extend(engine.tick(0.3).events.iter().cloned());
    }
    // One full pass: t reaches 1.2, wraps, and the schedule re-arms.
    assert_eq!(*steps.borrow(), 1);
    assert_eq!(*plants.borrow(), 1);
    assert!(fired
        .iter()
        .any(|event| matches!(event, CoreEvent::LoopRestarted { state } if state == "run")));

    // Next pass re-fires the early cue.
    let out = engine.tick(0.3);
    assert_eq!(cue_count(&out.events, "step"), 1);
    assert_eq!(*steps.borrow(), 2);
    assert_eq!(*plants.borrow(), 1);
}

/// it should stop reporting is_playing once a non-looping pass completes
#[test]
fn non_looping_state_completes_and_never_refires() {
    let (hits, on_hit) = counter();
    let state = clip_state("attack", 0.5, false)
        .with_event(AnimationEvent::new("hit", 1.0).with_action(on_hit));
    let mut engine = engine_with(vec![state]);

    engine.play("attack", 0.0).unwrap();
    assert!(engine.is_playing("attack"));

    let mut events = Vec::new();
    for _ in 0..6 {
        events.extend(engine.tick(0.25).events.iter().cloned());
    }
    assert!(!engine.is_playing("attack"));
    assert_eq!(*hits.borrow(), 1);
    assert_eq!(cue_count(&events, "hit"), 1);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, CoreEvent::PlaybackEnded { .. }))
            .count(),
        1
    );
}

/// it should treat play of the already-active state as a no-op
#[test]
fn replaying_active_state_is_a_noop() {
    let mut engine = engine_with(vec![clip_state("idle", 2.0, false)]);
    engine.play("idle", 0.0).unwrap();
    engine.tick(0.8);
    let before = engine.normalized_time();

    engine.play("idle", 0.0).unwrap();
    assert!((engine.normalized_time() - before).abs() < 1e-6);
    let out = engine.tick(0.0);
    assert!(
        !out.events
            .iter()
            .any(|event| matches!(event, CoreEvent::PlaybackStarted { .. })),
        "a no-op play must not restart playback"
    );
}

/// it should restart a non-looping state after its pass has completed
#[test]
fn finished_state_can_be_replayed() {
    let mut engine = engine_with(vec![clip_state("attack", 0.5, false)]);
    engine.play("attack", 0.0).unwrap();
    for _ in 0..4 {
        engine.tick(0.25);
    }
    assert!(!engine.is_playing("attack"));

    engine.play("attack", 0.0).unwrap();
    engine.tick(0.0);
    assert!(engine.is_playing("attack"));
}

/// it should surface StateNotFound and InvalidClip without touching playback
#[test]
fn error_paths_leave_playback_unchanged() {
    let mut engine = engine_with(vec![
        clip_state("idle", 1.0, true),
        AnimationState::new("ghost"), // authored, but no clip assigned
    ]);

    assert_eq!(
        engine.play("missing", 0.0),
        Err(PlaybackError::StateNotFound {
            name: "missing".to_string()
        })
    );

    engine.play("idle", 0.0).unwrap();
    engine.tick(0.5);

    assert_eq!(
        engine.play("ghost", 0.2),
        Err(PlaybackError::InvalidClip {
            state: "ghost".to_string()
        })
    );
    assert!(engine.is_playing("idle"));
    assert!(!engine.is_transitioning());
    assert!((engine.normalized_time() - 0.5).abs() < 1e-6);
}

/// it should adopt an override under the authored name
#[test]
fn override_plays_under_authored_identity() {
    let (hits, on_hit) = counter();
    let mut engine = engine_with(vec![clip_state("attack", 1.0, false)]);

    let override_state = AnimationState::new("attack_sword")
        .with_clip(ClipRef::new("attack_sword.anim", 0.5), false)
        .with_event(AnimationEvent::new("hit", 0.5).with_action(on_hit));
    engine.play_override("attack", override_state, 0.0).unwrap();

    assert!(engine.is_playing("attack"));
    let out = engine.tick(0.25);
    assert_eq!(
        out.mixer.current.as_ref().map(|input| input.clip.as_str()),
        Some("attack_sword.anim")
    );

    engine.tick(0.25); // u = 0.5: the override's cue fires
    assert_eq!(*hits.borrow(), 1);
}

/// it should reject an override without a clip and keep the previous state
#[test]
fn override_without_clip_is_rejected() {
    let mut engine = engine_with(vec![clip_state("idle", 1.0, true), clip_state("attack", 1.0, false)]);
    engine.play("idle", 0.0).unwrap();
    engine.tick(0.25);

    let result = engine.play_override("attack", AnimationState::new("bare"), 0.0);
    assert_eq!(
        result,
        Err(PlaybackError::OverrideMissingClip {
            name: "attack".to_string()
        })
    );
    assert!(engine.is_playing("idle"));

    let valid = AnimationState::new("x").with_clip(ClipRef::new("x.anim", 1.0), false);
    assert_eq!(
        engine.play_override("missing", valid, 0.0),
        Err(PlaybackError::StateNotFound {
            name: "missing".to_string()
        })
    );
    assert!(engine.is_playing("idle"));
}

/// it should mirror the animation loop flag on the audio binding and cut on switch
#[test]
fn audio_rebinds_per_state_change() {
    let war_cry = clip_state("charge", 1.0, true).with_audio("war_cry.ogg", 1.4);
    let silent = clip_state("sneak", 1.0, false);
    let mut engine = engine_with(vec![war_cry, silent]);

    engine.play("charge", 0.0).unwrap();
    let out = engine.tick(0.0);
    let binding = out
        .events
        .iter()
        .find_map(|event| match event {
            CoreEvent::AudioBound { binding } => Some(binding.clone()),
            _ => None,
        })
        .expect("audio bound on first tick after play");
    assert_eq!(binding.clip, "war_cry.ogg");
    assert_eq!(binding.volume, 1.0, "volume is clamped to [0,1]");
    assert!(binding.looping, "audio mirrors the animation loop flag");

    // Switching to a state without audio cuts to silence, no fade.
    engine.play("sneak", 0.0).unwrap();
    let out = engine.tick(0.0);
    assert!(out
        .events
        .iter()
        .any(|event| matches!(event, CoreEvent::AudioUnbound)));
}

/// it should deliver play-time signals on the next tick
#[test]
fn play_signals_arrive_with_the_next_tick() {
    let mut engine = engine_with(vec![clip_state("idle", 1.0, true)]);
    engine.play("idle", 0.0).unwrap();

    let out = engine.tick(0.0);
    assert!(out
        .events
        .iter()
        .any(|event| matches!(event, CoreEvent::PlaybackStarted { state } if state == "idle")));

    // Second tick: the signal is not repeated.
    let out = engine.tick(0.0);
    assert!(!out
        .events
        .iter()
        .any(|event| matches!(event, CoreEvent::PlaybackStarted { .. })));
}

/// it should hold normalized time at zero for zero-length clips
#[test]
fn zero_length_clip_is_guarded() {
    let (fired, on_fire) = counter();
    let state = clip_state("pose", 0.0, true)
        .with_event(AnimationEvent::new("snap", 0.0).with_action(on_fire));
    let mut engine = engine_with(vec![state]);

    engine.play("pose", 0.0).unwrap();
    for _ in 0..3 {
        engine.tick(1.0);
    }
    assert_eq!(engine.normalized_time(), 0.0);
    assert!(engine.is_playing("pose"));
    // The time-0 cue fires once; the pass never wraps, so it never re-arms.
    assert_eq!(*fired.borrow(), 1);
}

/// it should keep a cue latched when its action panics
#[test]
fn panicking_action_cannot_double_fire() {
    let (fired, on_fire) = counter();
    let mut count_then_panic = Some(on_fire);
    let state = clip_state("trap", 1.0, false).with_event(
        AnimationEvent::new("boom", 0.5).with_action(move || {
            if let Some(action) = count_then_panic.as_mut() {
                action();
            }
            panic!("cue action failed");
        }),
    );
    let mut engine = engine_with(vec![state]);
    engine.play("trap", 0.0).unwrap();
    engine.tick(0.5);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        engine.tick(0.5);
    }));
    assert!(result.is_err(), "the action's panic propagates out of tick");

    // The latch was set before the action ran: no second invocation.
    engine.tick(0.5);
    assert_eq!(*fired.borrow(), 1);
}

/// it should expose authored states through ids and name lookup
#[test]
fn library_introspection() {
    let mut engine = engine_with(vec![clip_state("idle", 1.0, true)]);
    let id = engine.add_state(clip_state("run", 1.0, true));
    assert_eq!(engine.find_state("run"), Some(id));
    assert_eq!(engine.state(id).map(|s| s.name.as_str()), Some("run"));
    assert_eq!(engine.library().len(), 2);

    engine.play("run", 0.0).unwrap();
    assert_eq!(engine.active_state_name(), Some("run"));
}

/// it should tear down idempotently
#[test]
fn destroy_is_idempotent() {
    let mut engine = engine_with(vec![clip_state("idle", 1.0, true).with_audio("hum.ogg", 0.5)]);
    engine.play("idle", 0.0).unwrap();
    engine.tick(0.25);

    engine.destroy();
    engine.destroy();

    assert!(!engine.is_playing("idle"));
    assert!(!engine.is_transitioning());
    let out = engine.tick(0.25);
    assert!(out.is_empty());
}
