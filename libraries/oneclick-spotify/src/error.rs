//! Error types for the Spotify client.

use oneclick_core::OneClickError;
use thiserror::Error;

/// Errors that can occur when talking to Spotify.
#[derive(Error, Debug)]
pub enum SpotifyError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Web API returned an error response
    #[error("Spotify API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// No cached token; run the authorization flow first
    #[error("Authorization required")]
    AuthRequired,

    /// Authorization code could not be obtained or exchanged
    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Token refresh failed
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// Rate limited by Spotify
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// Invalid base or redirect URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Playlist reference is not a URI, share link or bare ID
    #[error("Invalid playlist reference: {0}")]
    InvalidPlaylist(String),

    /// Failed to parse a response or the token cache
    #[error("Failed to parse {0}")]
    ParseError(String),

    /// Token cache read/write failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpotifyError {
    /// Whether Spotify rejected our credentials
    pub fn is_auth(&self) -> bool {
        match self {
            Self::AuthRequired | Self::AuthorizationFailed(_) | Self::TokenRefreshFailed(_) => {
                true
            }
            Self::Api { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }
}

/// Result type for Spotify client operations.
pub type Result<T> = std::result::Result<T, SpotifyError>;

impl From<SpotifyError> for OneClickError {
    fn from(err: SpotifyError) -> Self {
        if err.is_auth() {
            return OneClickError::authorization(err.to_string());
        }
        match err {
            SpotifyError::InvalidPlaylist(_) | SpotifyError::InvalidUrl(_) => {
                OneClickError::invalid_input(err.to_string())
            }
            _ => OneClickError::transport(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_become_authorization_errors() {
        let err: OneClickError = SpotifyError::Api {
            status: 401,
            message: "The access token expired".into(),
        }
        .into();
        assert!(matches!(err, OneClickError::Authorization(_)));

        let err: OneClickError = SpotifyError::AuthRequired.into();
        assert!(matches!(err, OneClickError::Authorization(_)));
    }

    #[test]
    fn other_failures_become_transport_errors() {
        let err: OneClickError = SpotifyError::Api {
            status: 502,
            message: "Bad gateway".into(),
        }
        .into();
        assert!(matches!(err, OneClickError::Transport(ref m) if m.contains("502")));

        let err: OneClickError = SpotifyError::RateLimited { retry_after_secs: 3 }.into();
        assert!(matches!(err, OneClickError::Transport(_)));
    }

    #[test]
    fn bad_playlist_reference_is_invalid_input() {
        let err: OneClickError = SpotifyError::InvalidPlaylist("nope!".into()).into();
        assert!(matches!(err, OneClickError::InvalidInput(_)));
    }
}
