//! JSON token cache on disk.

use crate::error::{Result, SpotifyError};
use crate::types::TokenInfo;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Token cache file, one per Spotify user.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached token; a missing file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<TokenInfo>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No token cache");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let token = serde_json::from_str(&contents).map_err(|e| {
            SpotifyError::ParseError(format!(
                "token cache {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(token))
    }

    /// Overwrite the cache with `token`.
    pub fn save(&self, token: &TokenInfo) -> Result<()> {
        let json = serde_json::to_string(token)
            .map_err(|e| SpotifyError::ParseError(format!("token: {}", e)))?;
        std::fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), expires_at = token.expires_at, "Token cache written");
        Ok(())
    }
}
