//! Playback controller - turns triggers into track starts
//!
//! Owns every playlist's position state. The controller is driven by a
//! single dispatch loop, so it takes `&mut self` and needs no locking; no
//! lock of any kind is held while the streaming service is called.

use crate::{
    error::{PlaybackError, Result},
    playlist::PlaylistState,
    types::{PlaybackConfig, SwitchPolicy, TriggerOutcome},
};
use oneclick_core::{DeviceId, PlaybackSource, PlaylistId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Maps playlist triggers to single-track playback requests
pub struct PlaybackController {
    source: Arc<dyn PlaybackSource>,
    device: DeviceId,
    config: PlaybackConfig,
    playlists: HashMap<PlaylistId, PlaylistState>,
    current: Option<PlaylistId>,
}

impl PlaybackController {
    /// Create a controller that plays on `device`
    pub fn new(source: Arc<dyn PlaybackSource>, device: DeviceId, config: PlaybackConfig) -> Self {
        Self {
            source,
            device,
            config,
            playlists: HashMap::new(),
            current: None,
        }
    }

    /// Device all playback goes to
    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    /// Controller configuration
    pub fn config(&self) -> PlaybackConfig {
        self.config
    }

    /// Playlist of the most recent trigger
    pub fn current_playlist(&self) -> Option<&PlaylistId> {
        self.current.as_ref()
    }

    /// Cached state of a playlist, if it has been fetched
    pub fn playlist(&self, id: &PlaylistId) -> Option<&PlaylistState> {
        self.playlists.get(id)
    }

    /// Play the next track of `playlist`
    ///
    /// The track list is fetched on first reference only; a failed fetch
    /// caches nothing, so the next press fetches again. The cursor moves
    /// only after the service accepted the track.
    pub async fn trigger(&mut self, playlist: &PlaylistId) -> Result<TriggerOutcome> {
        let switching = self.current.as_ref() != Some(playlist);
        self.current = Some(playlist.clone());

        let state = match self.playlists.entry(playlist.clone()) {
            Entry::Occupied(entry) => {
                let state = entry.into_mut();
                if switching && self.config.on_switch == SwitchPolicy::Restart {
                    debug!(playlist = %playlist, "Switched playlist, rewinding");
                    state.rewind();
                }
                state
            }
            Entry::Vacant(entry) => {
                debug!(playlist = %playlist, "Fetching playlist tracks");
                let tracks = self
                    .source
                    .fetch_playlist_tracks(playlist)
                    .await
                    .map_err(|source| PlaybackError::Fetch {
                        playlist: playlist.clone(),
                        source,
                    })?;
                info!(playlist = %playlist, tracks = tracks.len(), "Cached playlist");
                entry.insert(PlaylistState::new(tracks))
            }
        };

        let total = state.len();
        let Some((position, track)) = state.peek_next(self.config.at_end) else {
            info!(playlist = %playlist, total, "Playlist exhausted, nothing to start");
            return Ok(TriggerOutcome::Exhausted {
                playlist: playlist.clone(),
                total,
            });
        };
        let track = track.clone();

        self.source
            .start_playback(&self.device, &track)
            .await
            .map_err(|source| PlaybackError::Start {
                track: track.clone(),
                source,
            })?;
        state.advance_past(position);

        info!(
            playlist = %playlist,
            track = %track,
            position = position + 1,
            total,
            "Playback started"
        );

        Ok(TriggerOutcome::Started {
            playlist: playlist.clone(),
            track,
            position,
            total,
        })
    }
}
