//! `PlaybackSource` implementation on top of the Web API client.

use crate::client::SpotifyClient;
use crate::playlists::playlist_id;
use async_trait::async_trait;
use oneclick_core::{DeviceId, PlaybackSource, PlaylistId, TrackUri};
use tracing::{debug, info, warn};

#[async_trait]
impl PlaybackSource for SpotifyClient {
    /// First device whose name starts with `name`
    async fn resolve_device(&self, name: &str) -> oneclick_core::Result<Option<DeviceId>> {
        let devices = self.devices().await?;

        for device in devices.into_iter().filter(|d| d.name.starts_with(name)) {
            match device.id {
                Some(id) => {
                    info!(device = %device.name, id = %id, "Resolved playback device");
                    return Ok(Some(DeviceId::new(id)));
                }
                None => warn!(device = %device.name, "Matching device is restricted, skipping"),
            }
        }

        debug!(name = %name, "No playback device matched");
        Ok(None)
    }

    async fn set_volume(&self, percent: u8, device: &DeviceId) -> oneclick_core::Result<()> {
        SpotifyClient::set_volume(self, percent.min(100), device.as_str()).await?;
        Ok(())
    }

    async fn fetch_playlist_tracks(
        &self,
        playlist: &PlaylistId,
    ) -> oneclick_core::Result<Vec<TrackUri>> {
        let id = playlist_id(playlist.as_str())?;
        let uris = self.playlist_tracks(&id).await?;
        Ok(uris.into_iter().map(TrackUri::new).collect())
    }

    async fn start_playback(&self, device: &DeviceId, track: &TrackUri) -> oneclick_core::Result<()> {
        self.play(device.as_str(), track.as_str()).await?;
        Ok(())
    }
}
