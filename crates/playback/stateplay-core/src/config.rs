//! Core configuration for the playback engine.

use serde::{Deserialize, Serialize};

/// Configuration for engine sizing and diagnostics.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Initial capacity hint for the cue timeline.
    pub cue_capacity: usize,
    /// Maximum semantic events delivered per tick; the rest are dropped with
    /// a warning.
    pub max_events_per_tick: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cue_capacity: 16,
            max_events_per_tick: 256,
        }
    }
}
