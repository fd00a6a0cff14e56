//! Authorization-code flow against the Spotify accounts service.

use crate::error::{Result, SpotifyError};
use crate::types::{OAuthErrorBody, SpotifyConfig, TokenInfo, TokenResponse};
use chrono::Utc;
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

/// Authorization client for the Spotify accounts service.
pub struct AuthClient<'a> {
    http: &'a Client,
    config: &'a SpotifyConfig,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, config: &'a SpotifyConfig) -> Self {
        Self { http, config }
    }

    /// URL the user opens to grant access.
    pub fn authorize_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/authorize", self.config.accounts_base))
            .map_err(|e| SpotifyError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("scope", &self.config.scope);
        Ok(url)
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenInfo> {
        debug!("Exchanging authorization code");
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        match self.request_token(&form, None).await {
            Ok(token) => {
                info!(scope = %token.scope, "Authorization complete");
                Ok(token)
            }
            Err(SpotifyError::TokenRefreshFailed(message)) => {
                Err(SpotifyError::AuthorizationFailed(message))
            }
            Err(e) => Err(e),
        }
    }

    /// Obtain a new access token using the refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenInfo> {
        debug!("Refreshing access token");
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        self.request_token(&form, Some(refresh_token)).await
    }

    async fn request_token(
        &self,
        form: &[(&str, &str)],
        previous_refresh_token: Option<&str>,
    ) -> Result<TokenInfo> {
        let url = format!("{}/api/token", self.config.accounts_base);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(form)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let token: TokenResponse = response.json().await.map_err(|e| {
                SpotifyError::ParseError(format!("token response: {}", e))
            })?;
            Ok(TokenInfo::from_response(
                token,
                previous_refresh_token,
                Utc::now(),
            ))
        } else if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<OAuthErrorBody>(&body) {
                Ok(err) => err.error_description.unwrap_or(err.error),
                Err(_) => body,
            };
            warn!(status = %status, error = %message, "Token request rejected");
            Err(SpotifyError::TokenRefreshFailed(message))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(SpotifyError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Extract the authorization code from the URL the browser was redirected to.
pub fn code_from_redirect(redirected: &str) -> Result<String> {
    let url = Url::parse(redirected.trim())
        .map_err(|e| SpotifyError::InvalidUrl(format!("{}: {}", redirected.trim(), e)))?;

    let mut code = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "error" => return Err(SpotifyError::AuthorizationFailed(value.into_owned())),
            "code" => code = Some(value.into_owned()),
            _ => {}
        }
    }

    code.ok_or_else(|| {
        SpotifyError::AuthorizationFailed("redirect URL carries no authorization code".into())
    })
}
