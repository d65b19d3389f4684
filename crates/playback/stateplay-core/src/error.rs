//! Error types for the playback core.

use serde::{Deserialize, Serialize};

/// Errors surfaced by playback operations.
///
/// All of these are report-only: the engine leaves playback state untouched
/// when an operation fails, so the caller may log the error and carry on.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PlaybackError {
    /// A state was adopted without a resolvable animation clip.
    #[error("invalid animation clip for state '{state}'")]
    InvalidClip { state: String },

    /// No authored state matches the requested name.
    #[error("animation state '{name}' not found")]
    StateNotFound { name: String },

    /// An override state was supplied without an animation clip.
    #[error("override for state '{name}' has no animation clip")]
    OverrideMissingClip { name: String },
}

impl PlaybackError {
    /// Get error category for logging/metrics.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidClip { .. } => "clip",
            Self::StateNotFound { .. } => "lookup",
            Self::OverrideMissingClip { .. } => "override",
        }
    }
}
