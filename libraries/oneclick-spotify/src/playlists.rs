//! Playlist endpoints and playlist reference parsing.

use crate::client::ensure_success;
use crate::error::{Result, SpotifyError};
use crate::types::PlaylistTracksPage;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Items requested per page (the Web API maximum).
const PAGE_LIMIT: &str = "100";

/// Playlist client for the Spotify Web API.
pub struct PlaylistClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: &'a str,
}

impl<'a> PlaylistClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// Every track URI of `playlist_id`, following `next` links.
    ///
    /// Items without a track URI (removed or unavailable tracks) are skipped.
    pub async fn track_uris(&self, playlist_id: &str) -> Result<Vec<String>> {
        let mut url = Url::parse(&format!(
            "{}/playlists/{}/tracks",
            self.base_url, playlist_id
        ))
        .map_err(|e| SpotifyError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("offset", "0")
            .append_pair("limit", PAGE_LIMIT)
            .append_pair("fields", "items(track(uri)),next");

        let mut uris = Vec::new();
        let mut skipped = 0_usize;
        let mut next = Some(url.to_string());

        while let Some(page_url) = next {
            debug!(url = %page_url, "Fetching playlist page");
            let response = self
                .http
                .get(&page_url)
                .bearer_auth(self.access_token)
                .send()
                .await?;
            let response = ensure_success(response).await?;

            let page: PlaylistTracksPage = response
                .json()
                .await
                .map_err(|e| SpotifyError::ParseError(format!("playlist page: {}", e)))?;

            for item in page.items {
                match item.track.and_then(|track| track.uri) {
                    Some(uri) => uris.push(uri),
                    None => skipped += 1,
                }
            }
            next = page.next;
        }

        debug!(playlist = %playlist_id, tracks = uris.len(), skipped, "Fetched playlist tracks");
        Ok(uris)
    }
}

/// Bare playlist ID from a `spotify:playlist:` URI, an open.spotify.com link
/// or an ID.
pub fn playlist_id(reference: &str) -> Result<String> {
    let reference = reference.trim();
    let invalid = || SpotifyError::InvalidPlaylist(reference.to_string());

    let id = if reference.starts_with("spotify:") {
        // Also covers the legacy spotify:user:<user>:playlist:<id> form
        let mut parts = reference.split(':');
        parts
            .by_ref()
            .find(|part| *part == "playlist")
            .and_then(|_| parts.next())
            .ok_or_else(invalid)?
    } else if reference.starts_with("http://") || reference.starts_with("https://") {
        let url = Url::parse(reference).map_err(|_| invalid())?;
        let mut segments = url.path_segments().ok_or_else(invalid)?;
        let id = segments
            .by_ref()
            .find(|segment| *segment == "playlist")
            .and_then(|_| segments.next())
            .ok_or_else(invalid)?;
        return validate(id).map(str::to_string).ok_or_else(invalid);
    } else {
        reference
    };

    validate(id).map(str::to_string).ok_or_else(invalid)
}

fn validate(id: &str) -> Option<&str> {
    (!id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())).then_some(id)
}
