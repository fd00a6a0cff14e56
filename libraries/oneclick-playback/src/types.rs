//! Core types for playback control

use oneclick_core::{PlaylistId, TrackUri};
use serde::{Deserialize, Serialize};

/// What happens to a playlist's cursor when another playlist was pressed last
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchPolicy {
    /// Keep the cursor; coming back continues with the next unplayed track
    #[default]
    Resume,

    /// Rewind the cursor to the first track
    Restart,
}

/// What a press does once every track of the playlist has been played
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndPolicy {
    /// Do nothing on the service (the indicator still restarts)
    #[default]
    Stop,

    /// Loop back to the first track
    Wrap,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Cursor handling on playlist switch (default: Resume)
    pub on_switch: SwitchPolicy,

    /// Behaviour past the last track (default: Stop)
    pub at_end: EndPolicy,
}

/// Result of a successful trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A track was started on the device
    Started {
        playlist: PlaylistId,
        track: TrackUri,
        /// Zero-based index of `track` in the playlist
        position: usize,
        total: usize,
    },

    /// Nothing left to play under `EndPolicy::Stop`
    Exhausted { playlist: PlaylistId, total: usize },
}

impl TriggerOutcome {
    /// The started track, if any
    pub fn track(&self) -> Option<&TrackUri> {
        match self {
            Self::Started { track, .. } => Some(track),
            Self::Exhausted { .. } => None,
        }
    }

    /// The playlist this outcome belongs to
    pub fn playlist(&self) -> &PlaylistId {
        match self {
            Self::Started { playlist, .. } | Self::Exhausted { playlist, .. } => playlist,
        }
    }
}
