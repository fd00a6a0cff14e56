//! Error types for playback control

use oneclick_core::{OneClickError, PlaylistId, TrackUri};
use thiserror::Error;

/// Per-trigger playback errors
///
/// These never poison controller state: a failed fetch caches nothing and a
/// failed start leaves the cursor where it was.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Fetching the playlist's tracks failed
    #[error("Failed to fetch tracks of playlist {playlist}: {source}")]
    Fetch {
        playlist: PlaylistId,
        source: OneClickError,
    },

    /// The service refused to start the track
    #[error("Failed to start {track}: {source}")]
    Start {
        track: TrackUri,
        source: OneClickError,
    },
}

impl PlaybackError {
    /// The underlying service error
    pub fn service_error(&self) -> &OneClickError {
        match self {
            Self::Fetch { source, .. } | Self::Start { source, .. } => source,
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
