//! Cue scheduling over one normalized playback pass.

use std::cmp::Ordering;

use crate::data::AnimationEvent;

/// One scheduled cue with its fired latch for the current pass.
#[derive(Clone, Debug)]
struct Entry {
    /// Index of the cue in the owning state's authored event list.
    source: usize,
    name: String,
    time: f32,
    fired: bool,
}

/// Ordered cue schedule for the active state.
///
/// Entries are kept stable-sorted by trigger time, so ties fire in authoring
/// order, and each entry fires at most once between resets.
#[derive(Default, Debug)]
pub struct EventTimeline {
    entries: Vec<Entry>,
}

impl EventTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Replace the schedule with the given authored cues. Trigger times are
    /// clamped to [0,1] and every fired latch starts clear.
    pub fn register(&mut self, events: &[AnimationEvent]) {
        self.entries.clear();
        self.entries
            .extend(events.iter().enumerate().map(|(source, event)| Entry {
                source,
                name: event.name.clone(),
                time: event.time.clamp(0.0, 1.0),
                fired: false,
            }));
        self.entries
            .sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));
    }

    /// Fire every unfired cue with `time <= u`, in ascending time order.
    ///
    /// The sink receives (source index, cue name, trigger time) and runs
    /// synchronously on the calling thread. The latch is set before the sink
    /// runs, so a panicking sink propagates to the caller without ever
    /// letting a cue double-fire.
    pub fn on_tick(&mut self, u: f32, mut sink: impl FnMut(usize, &str, f32)) {
        for entry in &mut self.entries {
            if entry.time > u {
                break;
            }
            if entry.fired {
                continue;
            }
            entry.fired = true;
            sink(entry.source, &entry.name, entry.time);
        }
    }

    /// Clear every fired latch, arming the schedule for the next pass.
    pub fn reset_all(&mut self) {
        for entry in &mut self.entries {
            entry.fired = false;
        }
    }

    /// Empty the schedule entirely.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
