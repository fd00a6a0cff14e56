/// Collaborator traits for OneClick Player
use crate::error::Result;
use crate::types::{DeviceId, LampId, Level, PlaylistId, TrackUri};
use async_trait::async_trait;

/// Remote music-streaming service.
///
/// Implemented by `oneclick-spotify` on top of the Spotify Web API. Every
/// operation may fail with a transport or authorization error.
#[async_trait]
pub trait PlaybackSource: Send + Sync {
    /// Look up a playback device by its human-readable name
    ///
    /// Returns `Ok(None)` when no device matches.
    async fn resolve_device(&self, name: &str) -> Result<Option<DeviceId>>;

    /// Set the volume (0-100) of a device
    async fn set_volume(&self, percent: u8, device: &DeviceId) -> Result<()>;

    /// Fetch the ordered track URIs of a playlist
    async fn fetch_playlist_tracks(&self, playlist: &PlaylistId) -> Result<Vec<TrackUri>>;

    /// Start playing a single track on a device
    async fn start_playback(&self, device: &DeviceId, track: &TrackUri) -> Result<()>;
}

/// Ordered bank of two-state lamps.
///
/// Writes are synchronous and fast (a register or sysfs write), so the
/// trait is not async. There is no read capability.
pub trait IndicatorDriver: Send + Sync {
    /// Claim `lamp` as a digital output
    ///
    /// Must be called once per lamp before `set_lamp`.
    fn configure_output(&self, lamp: LampId) -> Result<()>;

    /// Drive `lamp` to `level`
    fn set_lamp(&self, lamp: LampId, level: Level) -> Result<()>;
}
