//! Player endpoints: devices, volume, playback.

use crate::client::ensure_success;
use crate::error::{Result, SpotifyError};
use crate::types::{Device, DevicesResponse, PlayRequest};
use reqwest::header::CONTENT_LENGTH;
use reqwest::Client;
use tracing::debug;

/// Player client for the Spotify Web API.
pub struct PlayerClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: &'a str,
}

impl<'a> PlayerClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// List available Connect devices.
    pub async fn devices(&self) -> Result<Vec<Device>> {
        let url = format!("{}/me/player/devices", self.base_url);
        debug!(url = %url, "Fetching devices");

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.access_token)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let devices: DevicesResponse = response
            .json()
            .await
            .map_err(|e| SpotifyError::ParseError(format!("devices response: {}", e)))?;

        debug!(count = devices.devices.len(), "Fetched devices");
        Ok(devices.devices)
    }

    /// Set the volume of `device_id`.
    pub async fn set_volume(&self, percent: u8, device_id: &str) -> Result<()> {
        let url = format!("{}/me/player/volume", self.base_url);
        debug!(device = %device_id, percent, "Setting volume");

        let response = self
            .http
            .put(&url)
            .bearer_auth(self.access_token)
            .query(&[("volume_percent", percent.to_string().as_str()), ("device_id", device_id)])
            .header(CONTENT_LENGTH, 0_u64)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Start playing `track_uri` on `device_id`, replacing whatever plays.
    pub async fn play(&self, device_id: &str, track_uri: &str) -> Result<()> {
        let url = format!("{}/me/player/play", self.base_url);
        debug!(device = %device_id, track = %track_uri, "Starting playback");

        let response = self
            .http
            .put(&url)
            .bearer_auth(self.access_token)
            .query(&[("device_id", device_id)])
            .json(&PlayRequest { uris: [track_uri] })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}
