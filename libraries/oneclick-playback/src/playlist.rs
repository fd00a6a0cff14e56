//! Per-playlist position state
//!
//! A playlist's tracks are fetched once and then walked with a cursor:
//!
//! ```text
//! tracks:  [ t0 ][ t1 ][ t2 ][ t3 ]
//!                       ^
//!                     cursor (next track to play)
//! ```

use crate::types::EndPolicy;
use oneclick_core::TrackUri;

/// Cached track list and cursor of one playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistState {
    /// Track URIs in playlist order
    tracks: Vec<TrackUri>,

    /// Index of the next track to play
    cursor: usize,
}

impl PlaylistState {
    /// Create state for a freshly fetched track list
    pub fn new(tracks: Vec<TrackUri>) -> Self {
        Self { tracks, cursor: 0 }
    }

    /// All tracks of the playlist
    pub fn tracks(&self) -> &[TrackUri] {
        &self.tracks
    }

    /// Index of the next track to play
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the playlist has no tracks at all
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Whether every track has been played
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.tracks.len()
    }

    /// Position and URI of the track the next press would play
    ///
    /// Does not move the cursor. Returns `None` when there is nothing to play
    /// under `at_end`.
    pub fn peek_next(&self, at_end: EndPolicy) -> Option<(usize, &TrackUri)> {
        let position = if self.cursor < self.tracks.len() {
            self.cursor
        } else {
            match at_end {
                EndPolicy::Stop => return None,
                EndPolicy::Wrap => 0,
            }
        };
        self.tracks.get(position).map(|track| (position, track))
    }

    /// Move the cursor past `position`
    pub(crate) fn advance_past(&mut self, position: usize) {
        self.cursor = (position + 1).min(self.tracks.len());
    }

    /// Rewind the cursor to the first track
    pub(crate) fn rewind(&mut self) {
        self.cursor = 0;
    }
}
