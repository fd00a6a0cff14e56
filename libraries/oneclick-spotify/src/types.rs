//! Types for Spotify Web API requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Seconds before expiry at which an access token is refreshed.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// Configuration for talking to Spotify.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Redirect URI registered for the application
    pub redirect_uri: String,
    /// Space-separated OAuth scopes
    pub scope: String,
    /// Path of the JSON token cache
    pub token_cache: PathBuf,
    /// Web API base URL, without trailing slash
    pub api_base: String,
    /// Accounts service base URL, without trailing slash
    pub accounts_base: String,
}

impl SpotifyConfig {
    pub const DEFAULT_API_BASE: &'static str = "https://api.spotify.com/v1";
    pub const DEFAULT_ACCOUNTS_BASE: &'static str = "https://accounts.spotify.com";
    pub const DEFAULT_SCOPE: &'static str = "user-read-playback-state user-modify-playback-state";

    /// Create a config with the default scope, cache path and endpoints.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scope: Self::DEFAULT_SCOPE.to_string(),
            token_cache: PathBuf::from(".cache-default"),
            api_base: Self::DEFAULT_API_BASE.to_string(),
            accounts_base: Self::DEFAULT_ACCOUNTS_BASE.to_string(),
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_token_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_cache = path.into();
        self
    }

    /// Point the client at other endpoints (used against mock servers).
    pub fn with_base_urls(
        mut self,
        api_base: impl Into<String>,
        accounts_base: impl Into<String>,
    ) -> Self {
        self.api_base = api_base.into();
        self.accounts_base = accounts_base.into();
        self
    }
}

// =============================================================================
// Token Types
// =============================================================================

/// Cached OAuth token, stored as JSON.
///
/// Field names match the cache files written by spotipy, so an existing
/// `.cache-<username>` keeps working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub access_token: String,
    pub token_type: String,
    /// Token validity in seconds, as issued
    pub expires_in: i64,
    #[serde(default)]
    pub scope: String,
    /// Unix timestamp after which the access token is invalid
    pub expires_at: i64,
    pub refresh_token: Option<String>,
}

impl TokenInfo {
    /// Whether the access token expires within `EXPIRY_MARGIN_SECS` of `now`.
    pub fn is_expiring(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - now.timestamp() < EXPIRY_MARGIN_SECS
    }

    /// Build from a token endpoint response.
    ///
    /// Refresh responses may omit the refresh token; the previous one stays
    /// valid in that case.
    pub(crate) fn from_response(
        response: TokenResponse,
        previous_refresh_token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            expires_at: now.timestamp() + response.expires_in,
            access_token: response.access_token,
            token_type: response.token_type,
            expires_in: response.expires_in,
            scope: response.scope.unwrap_or_default(),
            refresh_token: response
                .refresh_token
                .or_else(|| previous_refresh_token.map(str::to_string)),
        }
    }
}

/// Response from the accounts token endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub scope: Option<String>,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
}

// =============================================================================
// Player Types
// =============================================================================

/// A Spotify Connect device.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Device {
    /// Absent for restricted devices
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub volume_percent: Option<u8>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DevicesResponse {
    pub devices: Vec<Device>,
}

/// Body for starting playback.
#[derive(Debug, Serialize)]
pub(crate) struct PlayRequest<'a> {
    pub uris: [&'a str; 1],
}

// =============================================================================
// Playlist Types
// =============================================================================

/// One page of playlist items.
#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistTracksPage {
    pub items: Vec<PlaylistItem>,
    /// Absolute URL of the next page
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItem {
    /// Null for removed or unavailable tracks
    pub track: Option<PlaylistTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistTrack {
    pub uri: Option<String>,
}

// =============================================================================
// Error Types
// =============================================================================

/// Web API error body: `{"error": {"status": 404, "message": "..."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}

/// Accounts service error body: `{"error": "invalid_grant", "error_description": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct OAuthErrorBody {
    pub error: String,
    pub error_description: Option<String>,
}
