/// Player configuration
use crate::error::{AppError, Result};
use config::{Config, ConfigError, Environment, File};
use oneclick_core::{LampId, PlaylistId};
use oneclick_indicator::{BlinkPattern, PreemptionTiming};
use oneclick_playback::{EndPolicy, PlaybackConfig, SwitchPolicy};
use oneclick_spotify::SpotifyConfig;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default settings file, resolved against the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "settings.toml";

/// Environment variable prefix; `ONECLICK__SPEAKER__NAME` sets `speaker.name`
pub const ENV_PREFIX: &str = "ONECLICK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub spotify: SpotifySettings,
    pub speaker: SpeakerSettings,
    pub buttons: Vec<ButtonBinding>,
    /// Lamps in progress-bar order
    pub lamps: Vec<LampId>,
    pub pattern: BlinkPattern,
    pub timing: PreemptionTiming,
    pub debounce: Duration,
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub username: String,
    pub scope: String,
    pub token_cache: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerSettings {
    /// Device name prefix
    pub name: String,
    pub default_volume: u8,
}

/// One input line and the playlist it starts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ButtonBinding {
    pub pin: u8,
    pub playlist: PlaylistId,
}

impl Settings {
    /// Load from `path` (any format `config` understands) overlaid by
    /// `ONECLICK__*` environment variables
    pub fn load(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Self::from_config(&config)
    }

    /// Validate and convert an already built configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let username = optional(config, "spotify.username", "default".to_string())?;
        let token_cache = optional(
            config,
            "spotify.token_cache",
            PathBuf::from(format!(".cache-{}", username)),
        )?;
        let spotify = SpotifySettings {
            client_id: required(config, "spotify.client_id")?,
            client_secret: required(config, "spotify.client_secret")?,
            redirect_uri: required(config, "spotify.redirect_uri")?,
            scope: optional(
                config,
                "spotify.scope",
                SpotifyConfig::DEFAULT_SCOPE.to_string(),
            )?,
            username,
            token_cache,
        };

        let volume: i64 = required(config, "speaker.default_volume")?;
        let default_volume = u8::try_from(volume)
            .ok()
            .filter(|v| *v <= 100)
            .ok_or_else(|| {
                AppError::Config(format!(
                    "speaker.default_volume must be between 0 and 100, got {}",
                    volume
                ))
            })?;
        let speaker = SpeakerSettings {
            name: required(config, "speaker.name")?,
            default_volume,
        };

        let buttons: Vec<ButtonBinding> = required(config, "buttons")?;
        if buttons.is_empty() {
            return Err(AppError::Config("buttons must not be empty".into()));
        }
        let mut pins = HashSet::new();
        if let Some(duplicate) = buttons.iter().find(|b| !pins.insert(b.pin)) {
            return Err(AppError::Config(format!(
                "GPIO{} is bound to more than one button",
                duplicate.pin
            )));
        }

        let lamp_pins: Vec<u8> = required(config, "indicator.lamps")?;
        if lamp_pins.is_empty() {
            return Err(AppError::Config("indicator.lamps must not be empty".into()));
        }
        if let Some(pin) = lamp_pins.iter().find(|pin| pins.contains(pin)) {
            return Err(AppError::Config(format!(
                "GPIO{} is used by both a button and a lamp",
                pin
            )));
        }

        let defaults = BlinkPattern::default();
        let pattern = BlinkPattern {
            start_delay: millis(config, "indicator.start_delay_ms", defaults.start_delay)?,
            half_toggle: millis(config, "indicator.half_toggle_ms", defaults.half_toggle)?,
            toggles_per_lamp: optional(
                config,
                "indicator.toggles_per_lamp",
                defaults.toggles_per_lamp,
            )?,
        };
        if pattern.half_toggle.is_zero() || pattern.toggles_per_lamp == 0 {
            return Err(AppError::Config(
                "indicator.half_toggle_ms and indicator.toggles_per_lamp must be positive".into(),
            ));
        }

        let defaults = PreemptionTiming::default();
        let timing = PreemptionTiming {
            ack_timeout: millis(config, "indicator.ack_timeout_ms", defaults.ack_timeout)?,
            grace: millis(config, "indicator.grace_ms", defaults.grace)?,
        };

        let playback = PlaybackConfig {
            on_switch: optional(config, "playback.on_switch", SwitchPolicy::default())?,
            at_end: optional(config, "playback.at_end", EndPolicy::default())?,
        };

        Ok(Self {
            spotify,
            speaker,
            buttons,
            lamps: lamp_pins.into_iter().map(LampId::new).collect(),
            pattern,
            timing,
            debounce: millis(config, "input.debounce_ms", Duration::from_millis(1500))?,
            playback,
        })
    }

    /// Client configuration for the Spotify Web API
    pub fn spotify_config(&self) -> SpotifyConfig {
        SpotifyConfig::new(
            &self.spotify.client_id,
            &self.spotify.client_secret,
            &self.spotify.redirect_uri,
        )
        .with_scope(&self.spotify.scope)
        .with_token_cache(&self.spotify.token_cache)
    }

    /// Input lines in configuration order
    pub fn button_pins(&self) -> Vec<u8> {
        self.buttons.iter().map(|b| b.pin).collect()
    }
}

fn required<T: DeserializeOwned>(config: &Config, key: &str) -> Result<T> {
    config.get(key).map_err(|e| match e {
        ConfigError::NotFound(_) => AppError::MissingKey(key.to_string()),
        other => AppError::Config(format!("{}: {}", key, other)),
    })
}

fn optional<T: DeserializeOwned>(config: &Config, key: &str, default: T) -> Result<T> {
    match config.get(key) {
        Ok(value) => Ok(value),
        Err(ConfigError::NotFound(_)) => Ok(default),
        Err(e) => Err(AppError::Config(format!("{}: {}", key, e))),
    }
}

fn millis(config: &Config, key: &str, default: Duration) -> Result<Duration> {
    let ms: u64 = optional(config, key, default.as_millis() as u64)?;
    Ok(Duration::from_millis(ms))
}
