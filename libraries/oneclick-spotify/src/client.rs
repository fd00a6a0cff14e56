//! Main Spotify client.

use crate::auth::{code_from_redirect, AuthClient};
use crate::cache::TokenCache;
use crate::error::{Result, SpotifyError};
use crate::player::PlayerClient;
use crate::playlists::PlaylistClient;
use crate::types::{ApiErrorEnvelope, Device, SpotifyConfig, TokenInfo};
use chrono::Utc;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

/// Client for the Spotify Web API.
///
/// Holds the OAuth token, refreshes it shortly before it expires and writes
/// every new token back to the cache file.
pub struct SpotifyClient {
    http: Client,
    config: Arc<SpotifyConfig>,
    cache: TokenCache,
    token: Arc<RwLock<Option<TokenInfo>>>,
}

impl SpotifyClient {
    /// Create a client, loading any cached token.
    pub fn new(config: SpotifyConfig) -> Result<Self> {
        let api_base = normalize_base(&config.api_base)?;
        let accounts_base = normalize_base(&config.accounts_base)?;
        let config = SpotifyConfig {
            api_base,
            accounts_base,
            ..config
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("OneClickPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = TokenCache::new(&config.token_cache);
        let token = match cache.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(path = %cache.path().display(), error = %e, "Ignoring unreadable token cache");
                None
            }
        };

        Ok(Self {
            http,
            config: Arc::new(config),
            cache,
            token: Arc::new(RwLock::new(token)),
        })
    }

    pub fn config(&self) -> &SpotifyConfig {
        &self.config
    }

    /// Check if the client holds a token.
    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Current token, if any.
    pub async fn token(&self) -> Option<TokenInfo> {
        self.token.read().await.clone()
    }

    /// URL the user opens to grant access.
    pub fn authorize_url(&self) -> Result<Url> {
        AuthClient::new(&self.http, &self.config).authorize_url()
    }

    /// Finish the authorization flow from the URL the browser was redirected to.
    ///
    /// The new token is stored and written to the cache.
    pub async fn complete_authorization(&self, redirected: &str) -> Result<TokenInfo> {
        let code = code_from_redirect(redirected)?;
        let token = AuthClient::new(&self.http, &self.config)
            .exchange_code(&code)
            .await?;

        self.cache.save(&token)?;
        *self.token.write().await = Some(token.clone());
        Ok(token)
    }

    /// Access token, refreshed first if it is about to expire.
    pub async fn access_token(&self) -> Result<String> {
        {
            let token = self.token.read().await;
            match token.as_ref() {
                None => return Err(SpotifyError::AuthRequired),
                Some(token) if !token.is_expiring(Utc::now()) => {
                    return Ok(token.access_token.clone());
                }
                Some(_) => {}
            }
        }

        Ok(self.refresh_token().await?.access_token)
    }

    /// Refresh the access token and persist the result.
    pub async fn refresh_token(&self) -> Result<TokenInfo> {
        let mut token = self.token.write().await;
        let refresh_token = token
            .as_ref()
            .ok_or(SpotifyError::AuthRequired)?
            .refresh_token
            .clone()
            .ok_or_else(|| SpotifyError::TokenRefreshFailed("no refresh token cached".into()))?;

        let fresh = AuthClient::new(&self.http, &self.config)
            .refresh(&refresh_token)
            .await?;

        if let Err(e) = self.cache.save(&fresh) {
            warn!(path = %self.cache.path().display(), error = %e, "Failed to persist refreshed token");
        }
        info!(expires_at = fresh.expires_at, "Access token refreshed");

        *token = Some(fresh.clone());
        Ok(fresh)
    }

    /// List the user's Connect devices.
    pub async fn devices(&self) -> Result<Vec<Device>> {
        let token = self.access_token().await?;
        PlayerClient::new(&self.http, &self.config.api_base, &token)
            .devices()
            .await
    }

    /// Set a device's volume (0-100).
    pub async fn set_volume(&self, percent: u8, device_id: &str) -> Result<()> {
        let token = self.access_token().await?;
        PlayerClient::new(&self.http, &self.config.api_base, &token)
            .set_volume(percent, device_id)
            .await
    }

    /// Play a single track on a device.
    pub async fn play(&self, device_id: &str, track_uri: &str) -> Result<()> {
        let token = self.access_token().await?;
        PlayerClient::new(&self.http, &self.config.api_base, &token)
            .play(device_id, track_uri)
            .await
    }

    /// Every track URI of a playlist, in playlist order.
    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<String>> {
        let token = self.access_token().await?;
        PlaylistClient::new(&self.http, &self.config.api_base, &token)
            .track_uris(playlist_id)
            .await
    }
}

fn normalize_base(url: &str) -> Result<String> {
    let trimmed = url.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(SpotifyError::InvalidUrl("URL cannot be empty".into()));
    }
    let parsed = Url::parse(trimmed).map_err(|e| SpotifyError::InvalidUrl(format!("{}: {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SpotifyError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Turn a non-success Web API response into an error.
pub(crate) async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);
        warn!(retry_after_secs, "Rate limited by Spotify");
        return Err(SpotifyError::RateLimited { retry_after_secs });
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body,
    };
    debug!(status = %status, error = %message, "Spotify API error");

    Err(SpotifyError::Api {
        status: status.as_u16(),
        message,
    })
}
